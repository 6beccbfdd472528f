use serde::{Deserialize, Serialize};

/// One act of participation: `actor` posted record `id` in `community`.
///
/// Comment records also carry the raw `parent_id` reference (`t1_<comment>` or
/// `t3_<submission>`); submissions leave it empty. Submissions may carry the
/// listing metadata (`num_comments`, `over_18`, `domain`) used by the statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub community: String,
    pub actor: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_utc: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_comments: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over_18: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl ActivityRecord {
    pub fn submission(community: impl Into<String>, actor: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            community: community.into(),
            actor: actor.into(),
            id: id.into(),
            parent_id: None,
            created_utc: None,
            num_comments: None,
            over_18: None,
            domain: None,
        }
    }

    pub fn comment(
        community: impl Into<String>,
        actor: impl Into<String>,
        id: impl Into<String>,
        parent_id: impl Into<String>,
    ) -> Self {
        Self {
            community: community.into(),
            actor: actor.into(),
            id: id.into(),
            parent_id: Some(parent_id.into()),
            created_utc: None,
            num_comments: None,
            over_18: None,
            domain: None,
        }
    }

    pub fn with_listing(mut self, num_comments: u64, over_18: bool, domain: impl Into<String>) -> Self {
        self.num_comments = Some(num_comments);
        self.over_18 = Some(over_18);
        self.domain = Some(domain.into());
        self
    }
}

/// Both record streams of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityBatch {
    pub submissions: Vec<ActivityRecord>,
    pub comments: Vec<ActivityRecord>,
}

impl ActivityBatch {
    pub fn new(submissions: Vec<ActivityRecord>, comments: Vec<ActivityRecord>) -> Self {
        Self { submissions, comments }
    }

    pub fn len(&self) -> usize {
        self.submissions.len() + self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty() && self.comments.is_empty()
    }

    /// Order both streams by (community, actor, id) so runs are reproducible
    /// regardless of file scheduling.
    pub fn sort(&mut self) {
        let key = |r: &ActivityRecord| (r.community.clone(), r.actor.clone(), r.id.clone());
        self.submissions.sort_by_cached_key(key);
        self.comments.sort_by_cached_key(key);
    }
}
