//! Merge heights: an integer part from the subtree size and a fractional part
//! from the subset's rank among registered subsets of that size.

use crate::error::HierarchyError;
use crate::merge_tree::MergeTree;
use crate::partition::SubsetRegistry;
use std::collections::BTreeMap;

/// Share of the unit interval used to separate same-size merges. Below 1 so a
/// merge never reaches the next size's base height.
pub const RANK_SPREAD: f64 = 0.8;

/// Height of every internal node (`None` for leaves), indexed by node id.
///
/// For a node covering `n` leaves with rank `r`:
/// `n + RANK_SPREAD * (r - min_n) / max(1, max_n - min_n)`.
///
/// # Errors
/// [`HierarchyError::DegenerateRankGroup`] if no registered subset has size `n`.
pub fn assign_heights(tree: &MergeTree, registry: &SubsetRegistry) -> Result<Vec<Option<f64>>, HierarchyError> {
    let mut groups: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    for (id, subset) in registry.iter() {
        let r = registry.rank(id);
        groups
            .entry(subset.len())
            .and_modify(|(lo, hi)| {
                *lo = (*lo).min(r);
                *hi = (*hi).max(r);
            })
            .or_insert((r, r));
    }

    let mut heights = vec![None; tree.len()];
    for id in tree.internal_ids() {
        let n = tree.node(id).subset().len();
        let &(lo, hi) = groups.get(&n).ok_or(HierarchyError::DegenerateRankGroup { size: n })?;
        let r = registry.rank(id);
        let span = (hi - lo).max(1) as f64;
        heights[id] = Some(n as f64 + RANK_SPREAD * (r - lo) as f64 / span);
    }
    Ok(heights)
}
