//! Per-community actor sets and the record-id → actor index.

use crate::records::ActivityRecord;
use ahash::AHashMap;
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

/// Distinct actors active in each community (submissions ∪ comments).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommunityActorSets {
    sets: BTreeMap<String, BTreeSet<String>>,
}

impl CommunityActorSets {
    /// Declare a community, possibly with no actors (it becomes an isolated node).
    pub fn insert_community(&mut self, community: impl Into<String>) {
        self.sets.entry(community.into()).or_default();
    }

    pub fn insert(&mut self, community: impl Into<String>, actor: impl Into<String>) {
        self.sets.entry(community.into()).or_default().insert(actor.into());
    }

    pub fn actors(&self, community: &str) -> Option<&BTreeSet<String>> {
        self.sets.get(community)
    }

    pub fn communities(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, BTreeSet<String>> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl<C, A> FromIterator<(C, A)> for CommunityActorSets
where
    C: Into<String>,
    A: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (C, A)>>(iter: I) -> Self {
        let mut sets = Self::default();
        for (c, a) in iter {
            sets.insert(c, a);
        }
        sets
    }
}

/// Union the actors of both streams per community.
pub fn resolve_actor_sets(submissions: &[ActivityRecord], comments: &[ActivityRecord]) -> CommunityActorSets {
    submissions
        .iter()
        .chain(comments)
        .map(|r| (r.community.as_str(), r.actor.as_str()))
        .collect()
}

/// Maps record ids of each stream to their authors and remembers every actor seen.
///
/// Submission and comment ids are numbered independently, so the same id can
/// name one record in each stream. Each stream keeps its own map.
#[derive(Clone, Debug, Default)]
pub struct RecordIndex {
    submissions: AHashMap<String, String>,
    comments: AHashMap<String, String>,
    actors: BTreeSet<String>,
}

fn index_stream(records: &[ActivityRecord], actors: &mut BTreeSet<String>) -> (AHashMap<String, String>, usize) {
    let mut by_id = AHashMap::with_capacity(records.len());
    let mut conflicts = 0usize;
    for r in records {
        match by_id.get(r.id.as_str()) {
            Some(existing) if existing != &r.actor => conflicts += 1,
            Some(_) => {}
            None => {
                by_id.insert(r.id.clone(), r.actor.clone());
            }
        }
        actors.insert(r.actor.clone());
    }
    (by_id, conflicts)
}

impl RecordIndex {
    /// Within a stream the first record claiming an id wins.
    pub fn from_streams(submissions: &[ActivityRecord], comments: &[ActivityRecord]) -> Self {
        let mut actors = BTreeSet::new();
        let (submissions, sub_conflicts) = index_stream(submissions, &mut actors);
        let (comments, comment_conflicts) = index_stream(comments, &mut actors);
        let conflicts = sub_conflicts + comment_conflicts;
        if conflicts > 0 {
            tracing::debug!(conflicts, "record ids claimed by more than one actor; kept the first");
        }
        Self { submissions, comments, actors }
    }

    pub fn submission_author(&self, id: &str) -> Option<&str> {
        self.submissions.get(id).map(String::as_str)
    }

    pub fn comment_author(&self, id: &str) -> Option<&str> {
        self.comments.get(id).map(String::as_str)
    }

    /// Author of `record_id` in either stream, submissions first.
    pub fn actor_of(&self, record_id: &str) -> Option<&str> {
        self.submission_author(record_id).or_else(|| self.comment_author(record_id))
    }

    pub fn actors(&self) -> &BTreeSet<String> {
        &self.actors
    }

    pub fn len(&self) -> usize {
        self.submissions.len() + self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty() && self.comments.is_empty()
    }
}
