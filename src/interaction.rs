//! Directed reply graph between actors: `child -> parent` weighted by how many
//! distinct replies the child wrote to the parent's records.

use crate::activity::RecordIndex;
use crate::graph::DirectedGraph;
use crate::records::ActivityRecord;
use ahash::AHashSet;
use std::collections::BTreeMap;

/// Length of the type prefix on parent references (`t1_`, `t3_`).
pub const PARENT_PREFIX_LEN: usize = 3;

/// Strip the type prefix (three characters) from a parent reference. `None` when
/// nothing follows the prefix.
pub fn strip_type_prefix(parent_ref: &str) -> Option<&str> {
    parent_ref
        .char_indices()
        .nth(PARENT_PREFIX_LEN)
        .map(|(at, _)| &parent_ref[at..])
}

/// Author of the record a parent reference points at. `t1_` looks among
/// comments and `t3_` among submissions; any other prefix searches both.
pub fn resolve_parent<'a>(index: &'a RecordIndex, parent_ref: &str) -> Option<&'a str> {
    let id = strip_type_prefix(parent_ref)?;
    match &parent_ref[..parent_ref.len() - id.len()] {
        "t1_" => index.comment_author(id),
        "t3_" => index.submission_author(id),
        _ => index.actor_of(id),
    }
}

/// Build the reply graph over every actor in `index`.
///
/// Replies whose parent cannot be resolved are dropped. A reply record is counted
/// once per record id, so duplicated rows do not inflate weights.
pub fn build_interaction_graph(replies: &[ActivityRecord], index: &RecordIndex) -> DirectedGraph {
    let mut counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    let mut seen: AHashSet<&str> = AHashSet::with_capacity(replies.len());
    let mut unresolved = 0u64;

    for reply in replies {
        let parent_actor = reply
            .parent_id
            .as_deref()
            .and_then(|parent_ref| resolve_parent(index, parent_ref));
        let Some(parent_actor) = parent_actor else {
            unresolved += 1;
            continue;
        };
        if !seen.insert(reply.id.as_str()) {
            continue;
        }
        *counts.entry((reply.actor.as_str(), parent_actor)).or_insert(0) += 1;
    }

    let mut graph = DirectedGraph::new();
    for actor in index.actors() {
        graph.add_node(actor.as_str());
    }
    for ((child, parent), w) in counts {
        graph.add_edge(child, parent, w);
    }
    if unresolved > 0 {
        tracing::debug!(unresolved, "replies with unresolvable parents dropped");
    }
    graph
}
