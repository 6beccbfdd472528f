//! Standard hierarchical-clustering linkage: `N` ordered leaf labels plus
//! `N - 1` rows of `(left, right, height, leaf_count)`.

use crate::config::DEFAULT_IO_BUFFER;
use crate::error::HierarchyError;
use crate::heights::assign_heights;
use crate::merge_tree::{build_merge_tree, MergeTree};
use crate::partition::{normalize, PartitionSequence};
use crate::util::{create_with_backoff, replace_file_atomic_backoff};
use ahash::AHashMap;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::Path;

/// One merge. Indices below `N` are leaves; index `N + k` is the cluster made by row `k`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(usize, usize, f64, usize)", into = "(usize, usize, f64, usize)")]
pub struct LinkageRow {
    pub left: usize,
    pub right: usize,
    pub height: f64,
    pub leaf_count: usize,
}

impl From<(usize, usize, f64, usize)> for LinkageRow {
    fn from((left, right, height, leaf_count): (usize, usize, f64, usize)) -> Self {
        Self { left, right, height, leaf_count }
    }
}

impl From<LinkageRow> for (usize, usize, f64, usize) {
    fn from(r: LinkageRow) -> Self {
        (r.left, r.right, r.height, r.leaf_count)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dendrogram {
    pub labels: Vec<String>,
    pub rows: Vec<LinkageRow>,
}

impl Dendrogram {
    pub fn leaf_count(&self) -> usize {
        self.labels.len()
    }

    /// Write `{"labels": [...], "rows": [[l, r, h, n], ...]}` through a temp file.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        self.write_json_buffered(path, DEFAULT_IO_BUFFER)
    }

    pub fn write_json_buffered(&self, path: &Path, write_buf: usize) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let tmp = path.with_extension("json.inprogress");
        let out = create_with_backoff(&tmp).with_context(|| format!("create {}", tmp.display()))?;
        let mut w = BufWriter::with_capacity(write_buf, out);
        serde_json::to_writer(&mut w, self).with_context(|| format!("serialize dendrogram to {}", tmp.display()))?;
        w.write_all(b"\n")?;
        w.flush()?;
        drop(w);
        replace_file_atomic_backoff(&tmp, path)?;
        tracing::info!(path = %path.display(), leaves = self.labels.len(), rows = self.rows.len(), "dendrogram written");
        Ok(())
    }
}

fn leaf_label(members: &[String]) -> String {
    members.join("+")
}

/// Emit linkage rows bottom-up.
///
/// Leaves get indices `0..N` in label order. Internal nodes are emitted by
/// ascending subtree size, then ascending height, each taking the next index
/// from `N` upward.
pub fn emit_linkage(tree: &MergeTree, heights: &[Option<f64>]) -> Result<Dendrogram, HierarchyError> {
    let mut leaves: Vec<(String, usize)> =
        tree.leaf_ids().map(|id| (leaf_label(tree.node(id).subset()), id)).collect();
    leaves.sort();

    let n = leaves.len();
    let mut index_of: AHashMap<usize, usize> = AHashMap::with_capacity(tree.len());
    for (idx, (_, id)) in leaves.iter().enumerate() {
        index_of.insert(*id, idx);
    }

    let mut internal: Vec<(usize, f64, usize)> = Vec::with_capacity(n.saturating_sub(1));
    for id in tree.internal_ids() {
        let size = tree.node(id).subset().len();
        let h = heights
            .get(id)
            .copied()
            .flatten()
            .ok_or(HierarchyError::DegenerateRankGroup { size })?;
        internal.push((size, h, id));
    }
    internal.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let mut rows = Vec::with_capacity(internal.len());
    for (_, height, id) in internal {
        let node = tree.node(id);
        let Some((a, b)) = node.children() else { continue };
        let (Some(&left), Some(&right)) = (index_of.get(&a), index_of.get(&b)) else {
            return Err(HierarchyError::disconnected(format!(
                "subset {:?} merged before its children",
                node.subset()
            )));
        };
        index_of.insert(id, n + rows.len());
        rows.push(LinkageRow { left, right, height, leaf_count: node.leaves().len() });
    }

    debug_assert!(rows.windows(2).all(|w| w[0].height < w[1].height));
    debug_assert!(rows.last().map_or(true, |r| r.leaf_count == n));
    Ok(Dendrogram { labels: leaves.into_iter().map(|(label, _)| label).collect(), rows })
}

/// Normalize, build the merge tree, assign heights and emit. Nothing is
/// produced when any stage fails.
pub fn build_dendrogram(sequence: &PartitionSequence) -> Result<Dendrogram, HierarchyError> {
    let registry = normalize(sequence)?;
    let tree = build_merge_tree(&registry)?;
    let heights = assign_heights(&tree, &registry)?;
    let dendrogram = emit_linkage(&tree, &heights)?;
    tracing::debug!(leaves = dendrogram.labels.len(), rows = dendrogram.rows.len(), "linkage emitted");
    Ok(dendrogram)
}
