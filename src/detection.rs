//! Divisive community detection is supplied from outside; this module only
//! defines the seam and a precomputed implementation.

use crate::graph::UndirectedGraph;
use crate::partition::PartitionSequence;
use crate::util::open_with_backoff;
use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::io::BufReader;
use std::path::Path;

/// Produces a coarsest-to-finest partition sequence of a graph's nodes.
pub trait DivisiveDetector {
    fn partitions(&self, graph: &UndirectedGraph) -> Result<PartitionSequence>;
}

impl<F> DivisiveDetector for F
where
    F: Fn(&UndirectedGraph) -> Result<PartitionSequence>,
{
    fn partitions(&self, graph: &UndirectedGraph) -> Result<PartitionSequence> {
        self(graph)
    }
}

/// A partition sequence computed elsewhere (for example by a Girvan-Newman run
/// in another toolkit) and replayed against the graph it was computed on.
#[derive(Clone, Debug, Default)]
pub struct PrecomputedPartitions {
    sequence: PartitionSequence,
}

impl PrecomputedPartitions {
    pub fn new(sequence: PartitionSequence) -> Self {
        Self { sequence }
    }

    /// Load `[[[leaf, ...], ...], ...]`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let f = open_with_backoff(path).with_context(|| format!("open {}", path.display()))?;
        let sequence: PartitionSequence = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse partition sequence {}", path.display()))?;
        tracing::info!(path = %path.display(), partitions = sequence.len(), "loaded partition sequence");
        Ok(Self { sequence })
    }

    pub fn sequence(&self) -> &PartitionSequence {
        &self.sequence
    }
}

impl DivisiveDetector for PrecomputedPartitions {
    fn partitions(&self, graph: &UndirectedGraph) -> Result<PartitionSequence> {
        let leaves = self.sequence.leaves();
        let nodes: BTreeSet<&str> = graph.nodes().collect();
        if leaves != nodes {
            let unknown = leaves.difference(&nodes).count();
            let uncovered = nodes.difference(&leaves).count();
            bail!("partition sequence does not match graph nodes ({unknown} unknown, {uncovered} uncovered)");
        }
        Ok(self.sequence.clone())
    }
}
