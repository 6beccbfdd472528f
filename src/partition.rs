//! Partition sequences produced by divisive community detection, and their
//! normalization into a registry of distinct subsets.
//!
//! A sequence runs from the coarsest partition (ideally the whole universe as
//! one part) to the finest (ideally all singletons). Each step either repeats
//! the previous partition or splits exactly one part into two.

use crate::error::HierarchyError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Canonical subset: members sorted ascending, no duplicates.
pub type Subset = Vec<String>;

/// One partition of the leaf universe into disjoint, non-empty parts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Partition {
    parts: Vec<Vec<String>>,
}

impl Partition {
    pub fn new<P, I, S>(parts: P) -> Self
    where
        P: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { parts: parts.into_iter().map(|p| p.into_iter().map(Into::into).collect()).collect() }
    }

    pub fn parts(&self) -> &[Vec<String>] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Partitions ordered from coarsest to finest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionSequence {
    partitions: Vec<Partition>,
}

impl PartitionSequence {
    pub fn new(partitions: Vec<Partition>) -> Self {
        Self { partitions }
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn push(&mut self, partition: Partition) {
        self.partitions.push(partition);
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Every leaf named by the sequence.
    pub fn leaves(&self) -> BTreeSet<&str> {
        self.partitions.iter().flat_map(|p| p.parts.iter().flatten()).map(String::as_str).collect()
    }
}

impl FromIterator<Partition> for PartitionSequence {
    fn from_iter<I: IntoIterator<Item = Partition>>(iter: I) -> Self {
        Self { partitions: iter.into_iter().collect() }
    }
}

/// True when two sorted subsets share no member. Stops at the first common member.
pub fn disjoint_sorted(a: &[String], b: &[String]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => return false,
        }
    }
    true
}

/// Sorted union of two sorted, disjoint subsets.
pub fn union_sorted(a: &[String], b: &[String]) -> Subset {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] <= b[j] {
            out.push(a[i].clone());
            i += 1;
        } else {
            out.push(b[j].clone());
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

/// Distinct subsets with stable integer ids.
///
/// Ids double as ranks: a subset registered later ranks higher. Subsets of the
/// same size are ordered by rank when merge heights are assigned.
#[derive(Clone, Debug, Default)]
pub struct SubsetRegistry {
    subsets: Vec<Subset>,
    ids: AHashMap<Subset, usize>,
    universe: Subset,
}

impl SubsetRegistry {
    /// Register arbitrary subsets in the given order. Members are canonicalized;
    /// repeats keep their first id. The universe is the union of all members.
    pub fn from_subsets<I, P, S>(subsets: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut reg = Self::default();
        let mut universe = BTreeSet::new();
        for s in subsets {
            let subset = canonical(s.into_iter().map(Into::into).collect());
            universe.extend(subset.iter().cloned());
            reg.register(subset);
        }
        reg.universe = universe.into_iter().collect();
        reg
    }

    fn register(&mut self, subset: Subset) -> usize {
        if let Some(&id) = self.ids.get(&subset) {
            return id;
        }
        let id = self.subsets.len();
        self.ids.insert(subset.clone(), id);
        self.subsets.push(subset);
        id
    }

    pub fn id_of(&self, subset: &[String]) -> Option<usize> {
        self.ids.get(subset).copied()
    }

    pub fn subset(&self, id: usize) -> &[String] {
        &self.subsets[id]
    }

    pub fn rank(&self, id: usize) -> usize {
        id
    }

    pub fn rank_of(&self, subset: &[String]) -> Option<usize> {
        self.id_of(subset).map(|id| self.rank(id))
    }

    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.subsets.iter().enumerate().map(|(id, s)| (id, s.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }
}

fn canonical(mut members: Vec<String>) -> Subset {
    members.sort();
    members.dedup();
    members
}

/// Canonical parts of one partition, sorted by key. Checks the parts are
/// non-empty and pairwise disjoint, and (after the first step) that they cover
/// exactly `universe`.
fn canonical_parts(
    step: usize,
    partition: &Partition,
    universe: Option<&BTreeSet<String>>,
) -> Result<Vec<Subset>, HierarchyError> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for part in partition.parts() {
        if part.is_empty() {
            return Err(HierarchyError::malformed(step, "partition contains an empty part"));
        }
        for leaf in part {
            if !seen.insert(leaf.as_str()) {
                return Err(HierarchyError::malformed(step, format!("leaf {leaf:?} appears more than once")));
            }
        }
    }
    if let Some(universe) = universe {
        if let Some(extra) = seen.iter().find(|l| !universe.contains(**l)) {
            return Err(HierarchyError::malformed(step, format!("leaf {extra:?} is not in the universe")));
        }
        if let Some(missing) = universe.iter().find(|l| !seen.contains(l.as_str())) {
            return Err(HierarchyError::malformed(step, format!("leaf {missing:?} is missing")));
        }
    }
    let mut parts: Vec<Subset> = partition.parts().iter().map(|p| canonical(p.clone())).collect();
    parts.sort();
    Ok(parts)
}

/// `next` must equal `prev` or replace one part of `prev` by two parts whose union it is.
fn check_single_split(step: usize, prev: &[Subset], next: &[Subset]) -> Result<(), HierarchyError> {
    if prev == next {
        return Ok(());
    }
    let prev_set: BTreeSet<&Subset> = prev.iter().collect();
    let next_set: BTreeSet<&Subset> = next.iter().collect();
    let removed: Vec<&Subset> = prev_set.difference(&next_set).copied().collect();
    let added: Vec<&Subset> = next_set.difference(&prev_set).copied().collect();
    match (removed.as_slice(), added.as_slice()) {
        ([parent], [a, b]) if disjoint_sorted(a, b) && union_sorted(a, b) == **parent => Ok(()),
        _ => Err(HierarchyError::malformed(
            step,
            format!(
                "expected one part split in two, found {} part(s) replaced by {}",
                removed.len(),
                added.len()
            ),
        )),
    }
}

/// Validate a partition sequence and register its distinct subsets.
///
/// Subsets are registered scanning from the finest partition back to the
/// coarsest, parts of one partition in canonical order, so subsets that survive
/// into finer partitions rank lower. The universe always ranks highest and is
/// added even when no partition holds it as a single part.
///
/// # Errors
/// [`HierarchyError::MalformedSequence`] when the sequence is empty, a partition
/// is not a partition of the first partition's leaves, or two consecutive
/// partitions are not related by a single split.
pub fn normalize(sequence: &PartitionSequence) -> Result<SubsetRegistry, HierarchyError> {
    let first = sequence
        .partitions()
        .first()
        .ok_or_else(|| HierarchyError::malformed(0, "sequence is empty"))?;
    let first_parts = canonical_parts(0, first, None)?;
    if first_parts.is_empty() {
        return Err(HierarchyError::malformed(0, "first partition has no parts"));
    }
    let universe: BTreeSet<String> = first_parts.iter().flatten().cloned().collect();

    let mut steps = vec![first_parts];
    for (step, partition) in sequence.partitions().iter().enumerate().skip(1) {
        let parts = canonical_parts(step, partition, Some(&universe))?;
        if let Some(prev) = steps.last() {
            check_single_split(step, prev, &parts)?;
        }
        steps.push(parts);
    }

    let mut reg = SubsetRegistry::default();
    for parts in steps.into_iter().rev() {
        for part in parts {
            reg.register(part);
        }
    }
    reg.universe = universe.into_iter().collect();
    reg.register(reg.universe.clone());
    tracing::debug!(subsets = reg.len(), leaves = reg.universe.len(), "partition sequence normalized");
    Ok(reg)
}
