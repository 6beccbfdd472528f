//! Community co-activity graph: communities are linked by the number of actors
//! they share.

use crate::activity::CommunityActorSets;
use crate::graph::UndirectedGraph;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Size of the intersection of two sorted sets, walking both once.
pub fn shared_actor_count(a: &BTreeSet<String>, b: &BTreeSet<String>) -> u64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if small.is_empty() {
        return 0;
    }
    small.iter().filter(|x| large.contains(*x)).count() as u64
}

/// Build the co-activity graph with every community as a node and an edge of
/// weight `|actors(i) ∩ actors(j)|` wherever that count is positive.
pub fn build_coactivity_graph(sets: &CommunityActorSets) -> UndirectedGraph {
    build_coactivity_graph_with_progress(sets, None)
}

/// Like [`build_coactivity_graph`], ticking `pb` once per community row.
pub fn build_coactivity_graph_with_progress(sets: &CommunityActorSets, pb: Option<&ProgressBar>) -> UndirectedGraph {
    let rows: Vec<(&str, &BTreeSet<String>)> = sets.iter().map(|(c, a)| (c.as_str(), a)).collect();
    let n = rows.len();

    // row i holds the edges (i, j) for j > i
    let row_edges: Vec<Vec<(usize, usize, u64)>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let (_, actors_i) = rows[i];
            let mut out = Vec::new();
            if !actors_i.is_empty() {
                for j in (i + 1)..n {
                    let w = shared_actor_count(actors_i, rows[j].1);
                    if w > 0 {
                        out.push((i, j, w));
                    }
                }
            }
            if let Some(pb) = pb {
                pb.inc(1);
            }
            out
        })
        .collect();

    let mut graph = UndirectedGraph::new();
    for (community, _) in &rows {
        graph.add_node(*community);
    }
    for (i, j, w) in row_edges.into_iter().flatten() {
        graph.add_edge(rows[i].0, rows[j].0, w);
    }
    tracing::debug!(nodes = graph.node_count(), edges = graph.edge_count(), "co-activity graph built");
    graph
}
