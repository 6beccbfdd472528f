//! Binary merge tree recovered from a subset registry: a subset's children are
//! the two registered, disjoint subsets whose union it is.

use crate::error::HierarchyError;
use crate::partition::{disjoint_sorted, union_sorted, SubsetRegistry};
use rayon::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct MergeNode {
    subset: Vec<String>,
    children: Option<(usize, usize)>,
    parent: Option<usize>,
    leaves: Vec<usize>,
}

impl MergeNode {
    pub fn subset(&self) -> &[String] {
        &self.subset
    }

    pub fn children(&self) -> Option<(usize, usize)> {
        self.children
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Ids of the leaf nodes beneath this node (itself when it is a leaf).
    pub fn leaves(&self) -> &[usize] {
        &self.leaves
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Node ids are the registry's subset ids.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeTree {
    nodes: Vec<MergeNode>,
    root: usize,
}

impl MergeTree {
    pub fn root(&self) -> usize {
        self.root
    }

    pub fn node(&self, id: usize) -> &MergeNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (usize, &MergeNode)> {
        self.nodes.iter().enumerate()
    }

    pub fn leaf_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes().filter(|(_, n)| n.is_leaf()).map(|(id, _)| id)
    }

    pub fn internal_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes().filter(|(_, n)| !n.is_leaf()).map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Every `(i, j, c)` with `i < j`, `S_i ∩ S_j = ∅` and `S_i ∪ S_j = S_c`, ordered by `(i, j)`.
fn qualifying_pairs(registry: &SubsetRegistry) -> Vec<(usize, usize, usize)> {
    let n = registry.len();
    let universe_len = registry.universe().len();
    let rows: Vec<Vec<(usize, usize, usize)>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let a = registry.subset(i);
            let mut out = Vec::new();
            for j in (i + 1)..n {
                let b = registry.subset(j);
                if a.len() + b.len() > universe_len || !disjoint_sorted(a, b) {
                    continue;
                }
                if let Some(c) = registry.id_of(&union_sorted(a, b)) {
                    out.push((i, j, c));
                }
            }
            out
        })
        .collect();
    rows.into_iter().flatten().collect()
}

/// Reconstruct the merge tree.
///
/// When several pairs decompose the same subset, the first pair in ascending
/// `(i, j)` id order is kept and the others are logged and ignored. Singleton
/// subsets are always leaves.
///
/// # Errors
/// [`HierarchyError::DisconnectedHierarchy`] when the registry is empty, a subset
/// would get two parents, or the parentless subsets are not exactly the universe.
pub fn build_merge_tree(registry: &SubsetRegistry) -> Result<MergeTree, HierarchyError> {
    if registry.is_empty() {
        return Err(HierarchyError::disconnected("no subsets registered"));
    }
    let mut nodes: Vec<MergeNode> = registry
        .iter()
        .map(|(id, s)| MergeNode { subset: s.to_vec(), children: None, parent: None, leaves: vec![id] })
        .collect();

    for (i, j, c) in qualifying_pairs(registry) {
        if nodes[c].subset.len() <= 1 {
            continue;
        }
        match nodes[c].children {
            None => nodes[c].children = Some((i, j)),
            Some(kept) => tracing::warn!(
                parent = c,
                kept = ?kept,
                ignored = ?(i, j),
                "ambiguous decomposition; keeping the first pair"
            ),
        }
    }

    for c in 0..nodes.len() {
        let Some((a, b)) = nodes[c].children else { continue };
        for child in [a, b] {
            if let Some(other) = nodes[child].parent {
                return Err(HierarchyError::disconnected(format!(
                    "subset {:?} is a child of both {:?} and {:?}",
                    nodes[child].subset, nodes[other].subset, nodes[c].subset
                )));
            }
            nodes[child].parent = Some(c);
        }
    }

    let roots: Vec<usize> = (0..nodes.len()).filter(|&id| nodes[id].parent.is_none()).collect();
    let root = match roots.as_slice() {
        [root] => *root,
        _ => {
            let shown: Vec<&[String]> = roots.iter().take(8).map(|&id| nodes[id].subset.as_slice()).collect();
            return Err(HierarchyError::disconnected(format!(
                "{} subsets have no parent: {:?}",
                roots.len(),
                shown
            )));
        }
    };
    if nodes[root].subset.as_slice() != registry.universe() {
        return Err(HierarchyError::disconnected(format!(
            "root {:?} is not the full universe",
            nodes[root].subset
        )));
    }

    // children are strictly smaller than their parent, so ascending size is a valid bottom-up order
    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by_key(|&id| nodes[id].subset.len());
    for id in order {
        if let Some((a, b)) = nodes[id].children {
            let mut leaves = nodes[a].leaves.clone();
            leaves.extend_from_slice(&nodes[b].leaves);
            nodes[id].leaves = leaves;
        }
    }

    Ok(MergeTree { nodes, root })
}
