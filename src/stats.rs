//! Descriptive statistics over an activity batch.

use crate::records::{ActivityBatch, ActivityRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_TOP_N: usize = 5;

/// A submission ranked by its reported comment count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubmissionSummary {
    pub id: String,
    pub community: String,
    pub domain: Option<String>,
    pub num_comments: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ActivityStats {
    pub unique_communities: usize,
    /// Communities with the most distinct actors.
    pub top_communities_by_actors: Vec<(String, u64)>,
    /// Communities by the summed `num_comments` of their submissions.
    pub top_communities_by_comments: Vec<(String, u64)>,
    pub mean_actors_per_community: f64,
    pub top_actors_by_submissions: Vec<(String, u64)>,
    pub top_actors_by_comments: Vec<(String, u64)>,
    /// Actors active in the most distinct communities.
    pub top_actors_by_communities: Vec<(String, u64)>,
    /// Correlation of per-actor submission and comment counts; `None` when
    /// either count is constant across actors.
    pub submission_comment_correlation: Option<f64>,
    /// Submissions explicitly marked `over_18: false`, by `num_comments`.
    pub top_sfw_submissions_by_comments: Vec<SubmissionSummary>,
}

impl ActivityStats {
    pub fn from_batch(batch: &ActivityBatch) -> Self {
        Self::from_batch_top(batch, DEFAULT_TOP_N)
    }

    pub fn from_batch_top(batch: &ActivityBatch, top_n: usize) -> Self {
        let all = || batch.submissions.iter().chain(batch.comments.iter());

        let mut actors_by_community: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        let mut communities_by_actor: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for r in all() {
            actors_by_community.entry(&r.community).or_default().insert(&r.actor);
            communities_by_actor.entry(&r.actor).or_default().insert(&r.community);
        }

        let mean_actors_per_community = if actors_by_community.is_empty() {
            0.0
        } else {
            let total: usize = actors_by_community.values().map(BTreeSet::len).sum();
            total as f64 / actors_by_community.len() as f64
        };

        let mut comments_by_community: BTreeMap<&str, u64> = BTreeMap::new();
        for r in &batch.submissions {
            *comments_by_community.entry(&r.community).or_insert(0) += r.num_comments.unwrap_or(0);
        }

        let submissions = count_by_actor(&batch.submissions);
        let comments = count_by_actor(&batch.comments);

        Self {
            unique_communities: actors_by_community.len(),
            top_communities_by_actors: top(actors_by_community.iter().map(|(k, v)| (*k, v.len() as u64)), top_n),
            top_communities_by_comments: top(comments_by_community.into_iter(), top_n),
            mean_actors_per_community,
            top_actors_by_submissions: top(submissions.iter().map(|(k, v)| (*k, *v)), top_n),
            top_actors_by_comments: top(comments.iter().map(|(k, v)| (*k, *v)), top_n),
            top_actors_by_communities: top(communities_by_actor.iter().map(|(k, v)| (*k, v.len() as u64)), top_n),
            submission_comment_correlation: submission_comment_correlation(&submissions, &comments),
            top_sfw_submissions_by_comments: top_sfw_submissions(&batch.submissions, top_n),
        }
    }
}

/// Records with `over_18` missing are left out along with NSFW ones. Ties
/// break by community, then id.
fn top_sfw_submissions(submissions: &[ActivityRecord], n: usize) -> Vec<SubmissionSummary> {
    let mut sfw: Vec<&ActivityRecord> = submissions.iter().filter(|r| r.over_18 == Some(false)).collect();
    sfw.sort_by(|a, b| {
        b.num_comments
            .unwrap_or(0)
            .cmp(&a.num_comments.unwrap_or(0))
            .then_with(|| a.community.cmp(&b.community))
            .then_with(|| a.id.cmp(&b.id))
    });
    sfw.into_iter()
        .take(n)
        .map(|r| SubmissionSummary {
            id: r.id.clone(),
            community: r.community.clone(),
            domain: r.domain.clone(),
            num_comments: r.num_comments.unwrap_or(0),
        })
        .collect()
}

fn count_by_actor(records: &[ActivityRecord]) -> BTreeMap<&str, u64> {
    let mut counts = BTreeMap::new();
    for r in records {
        *counts.entry(r.actor.as_str()).or_insert(0u64) += 1;
    }
    counts
}

/// Count descending, then key ascending.
fn top<'a>(counts: impl Iterator<Item = (&'a str, u64)>, n: usize) -> Vec<(String, u64)> {
    let mut v: Vec<(&str, u64)> = counts.collect();
    v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    v.into_iter().take(n).map(|(k, c)| (k.to_string(), c)).collect()
}

/// Pearson correlation over the union of actors; an actor absent from one side counts 0.
fn submission_comment_correlation(submissions: &BTreeMap<&str, u64>, comments: &BTreeMap<&str, u64>) -> Option<f64> {
    let actors: BTreeSet<&str> = submissions.keys().chain(comments.keys()).copied().collect();
    let pairs: Vec<(f64, f64)> = actors
        .iter()
        .map(|a| {
            let s = submissions.get(a).copied().unwrap_or(0) as f64;
            let c = comments.get(a).copied().unwrap_or(0) as f64;
            (s, c)
        })
        .collect();
    pearson(&pairs)
}

pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x * var_y).sqrt())
}
