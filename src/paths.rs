use crate::config::Sources;
use crate::date::{iter_year_months, YearMonth};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Record stream a file belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Comment,    // RC_YYYY-MM.zst
    Submission, // RS_YYYY-MM.zst
}

impl FileKind {
    fn prefix(self) -> &'static str {
        match self {
            FileKind::Comment => "RC",
            FileKind::Submission => "RS",
        }
    }
}

/// One input file scheduled for ingestion.
#[derive(Clone, Debug)]
pub struct FileJob {
    pub kind: FileKind,
    pub ym: Option<YearMonth>,
    pub path: PathBuf,
}

fn discover_month_map(dir: &Path, kind: FileKind) -> BTreeMap<YearMonth, PathBuf> {
    let mut map = BTreeMap::new();
    let pattern = format!(r"^{}_(\d{{4}})-(\d{{2}})\.zst$", kind.prefix());
    let Ok(re) = Regex::new(&pattern) else { return map };
    if !dir.exists() {
        return map;
    }
    for ent in WalkDir::new(dir).min_depth(1).max_depth(1).into_iter().flatten() {
        let Some(name) = ent.file_name().to_str() else { continue };
        let Some(caps) = re.captures(name) else { continue };
        let (Ok(year), Ok(month)) = (caps[1].parse::<u16>(), caps[2].parse::<u8>()) else { continue };
        if (1..=12).contains(&month) {
            map.insert(YearMonth { year, month }, ent.path().to_path_buf());
        }
    }
    map
}

/// Monthly files found under the comments and submissions directories.
pub struct Discovered {
    pub comments: BTreeMap<YearMonth, PathBuf>,
    pub submissions: BTreeMap<YearMonth, PathBuf>,
}

pub fn discover_all(comments_dir: &Path, submissions_dir: &Path) -> Discovered {
    Discovered {
        comments: discover_month_map(comments_dir, FileKind::Comment),
        submissions: discover_month_map(submissions_dir, FileKind::Submission),
    }
}

/// Plan the files inside `[start, end]`. Open bounds clamp to what exists;
/// requested months that are missing on disk are skipped.
pub fn plan_files(
    discovered: &Discovered,
    sources: Sources,
    start: Option<YearMonth>,
    end: Option<YearMonth>,
) -> Vec<FileJob> {
    let mut jobs = Vec::new();
    let mut push_jobs = |kind: FileKind, map: &BTreeMap<YearMonth, PathBuf>| {
        let (Some(first), Some(last)) = (map.keys().next(), map.keys().next_back()) else { return };
        let lo = start.unwrap_or(*first);
        let hi = end.unwrap_or(*last);
        for ym in iter_year_months(lo, hi) {
            if let Some(p) = map.get(&ym) {
                jobs.push(FileJob { kind, ym: Some(ym), path: p.clone() });
            }
        }
    };

    if sources.comments() {
        push_jobs(FileKind::Comment, &discovered.comments);
    }
    if sources.submissions() {
        push_jobs(FileKind::Submission, &discovered.submissions);
    }
    jobs
}

/// Jobs for explicitly listed JSONL files (no month attached).
pub fn plan_explicit(sources: Sources, submissions: &[PathBuf], comments: &[PathBuf]) -> Vec<FileJob> {
    let mut jobs = Vec::new();
    if sources.comments() {
        jobs.extend(comments.iter().map(|p| FileJob { kind: FileKind::Comment, ym: None, path: p.clone() }));
    }
    if sources.submissions() {
        jobs.extend(submissions.iter().map(|p| FileJob { kind: FileKind::Submission, ym: None, path: p.clone() }));
    }
    jobs
}
