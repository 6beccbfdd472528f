//! Corpus ingestion: stream the planned monthly (or explicit) files and collect
//! filtered activity records for both streams.

use crate::concurrency::for_each_limited;
use crate::config::{InputSource, NetworkOptions};
use crate::filters::RecordFilter;
use crate::paths::{discover_all, plan_explicit, plan_files, FileJob, FileKind};
use crate::progress::{make_progress_bar_labeled, total_input_size};
use crate::records::{ActivityBatch, ActivityRecord};
use crate::zstd_jsonl::{for_each_line, parse_minimal, MinimalRecord};
use anyhow::{Context, Result};
use parking_lot::Mutex;

pub(crate) fn plan_jobs(opts: &NetworkOptions) -> Vec<FileJob> {
    match &opts.input {
        InputSource::Corpus => {
            let discovered = discover_all(&opts.comments_dir, &opts.submissions_dir);
            plan_files(&discovered, opts.sources, opts.start, opts.end)
        }
        InputSource::Jsonl { submissions, comments } => plan_explicit(opts.sources, submissions, comments),
    }
}

fn to_activity(kind: FileKind, rec: MinimalRecord) -> Option<ActivityRecord> {
    let created_utc = rec.created_utc.as_ref().and_then(|t| t.as_epoch());
    let (parent_id, num_comments, over_18, domain) = match kind {
        // a comment without a parent reference still counts as activity
        FileKind::Comment => (Some(rec.parent_id.unwrap_or_default()), None, None, None),
        FileKind::Submission => (None, rec.num_comments, rec.over_18, rec.domain),
    };
    Some(ActivityRecord {
        community: rec.subreddit?,
        actor: rec.author?,
        id: rec.id?,
        parent_id,
        created_utc,
        num_comments,
        over_18,
        domain,
    })
}

/// Records of one file that pass the filter. Malformed lines are skipped.
fn ingest_job(job: &FileJob, filter: &RecordFilter, read_buf: usize, on_progress: impl FnMut(u64)) -> Result<Vec<ActivityRecord>> {
    let mut out = Vec::new();
    let mut malformed = 0u64;
    for_each_line(&job.path, read_buf, on_progress, |line| {
        let Ok(rec) = parse_minimal(line) else {
            malformed += 1;
            return Ok(());
        };
        if !filter.accepts(&rec) {
            return Ok(());
        }
        if let Some(a) = to_activity(job.kind, rec) {
            out.push(a);
        }
        Ok(())
    })?;
    if malformed > 0 {
        tracing::debug!(path = %job.path.display(), month = ?job.ym, malformed, "skipped malformed lines");
    }
    tracing::debug!(path = %job.path.display(), month = ?job.ym, kept = out.len(), "file ingested");
    Ok(out)
}

/// Load the activity batch described by `opts`, sorted for reproducibility.
pub fn load_activity(opts: &NetworkOptions) -> Result<ActivityBatch> {
    let files = plan_jobs(opts);
    if files.is_empty() {
        tracing::warn!("No input files matched. Check base_dir, sources and date range.");
        return Ok(ActivityBatch::default());
    }
    tracing::info!(files = files.len(), "planned input files");

    let filter = RecordFilter::from_options(opts);
    let pb = opts
        .progress
        .then(|| make_progress_bar_labeled(total_input_size(&files), opts.progress_label.as_deref()));
    let batch = Mutex::new(ActivityBatch::default());

    for_each_limited(&files, opts.file_concurrency, |job| {
        let recs = ingest_job(job, &filter, opts.read_buffer_bytes, |d| {
            if let Some(pb) = &pb {
                pb.inc(d);
            }
        })
        .with_context(|| format!("ingesting {}", job.path.display()))?;
        let mut b = batch.lock();
        match job.kind {
            FileKind::Comment => b.comments.extend(recs),
            FileKind::Submission => b.submissions.extend(recs),
        }
        Ok(())
    })?;

    if let Some(pb) = pb {
        pb.finish_with_message(format!("{} done", opts.progress_label.as_deref().unwrap_or("ingest")));
    }

    let mut batch = batch.into_inner();
    batch.sort();
    tracing::info!(
        submissions = batch.submissions.len(),
        comments = batch.comments.len(),
        "activity loaded"
    );
    Ok(batch)
}
