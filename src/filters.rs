//! Record-level filters applied while ingesting: pseudo users, excluded authors,
//! target subreddits and month bounds.

use crate::config::NetworkOptions;
use crate::date::YearMonth;
use crate::util::env_excluded_authors;
use crate::zstd_jsonl::MinimalRecord;

/// Authors that stand for removed accounts rather than people.
pub fn is_pseudo_user(author: &str) -> bool {
    let a = author.trim();
    a.is_empty() || a.eq_ignore_ascii_case("[deleted]") || a.eq_ignore_ascii_case("[removed]")
}

/// Normalized filter state resolved once per ingestion run.
#[derive(Clone, Debug, Default)]
pub struct RecordFilter {
    subreddits: Option<Vec<String>>, // lowercase, sorted
    exclude_authors: Vec<String>,    // lowercase, sorted
    filter_pseudo_users: bool,
    bounds: Option<(YearMonth, YearMonth)>,
}

impl RecordFilter {
    pub fn from_options(opts: &NetworkOptions) -> Self {
        let mut exclude = opts.exclude_authors.clone();
        exclude.extend(env_excluded_authors());
        exclude.sort();
        exclude.dedup();
        let bounds = match (opts.start, opts.end) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        };
        Self {
            subreddits: opts.subreddits.clone(),
            exclude_authors: exclude,
            filter_pseudo_users: opts.filter_pseudo_users,
            bounds,
        }
    }

    /// True when the record should be ingested. Records without a subreddit,
    /// author or id are always rejected.
    pub fn accepts(&self, rec: &MinimalRecord) -> bool {
        let (Some(sub), Some(author), Some(id)) = (rec.subreddit.as_deref(), rec.author.as_deref(), rec.id.as_deref())
        else {
            return false;
        };
        if sub.trim().is_empty() || id.trim().is_empty() {
            return false;
        }
        if self.filter_pseudo_users && is_pseudo_user(author) {
            return false;
        }
        if !self.exclude_authors.is_empty() && self.exclude_authors.binary_search(&author.to_lowercase()).is_ok() {
            return false;
        }
        if let Some(targets) = &self.subreddits {
            if targets.binary_search(&sub.to_lowercase()).is_err() {
                return false;
            }
        }
        if let Some((lo, hi)) = self.bounds {
            match rec.created_utc.as_ref().and_then(|t| t.as_epoch()) {
                Some(ts) => {
                    let ym = YearMonth::from_epoch(ts);
                    if ym < lo || ym > hi {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }
}
