use crate::date::YearMonth;
use std::path::{Path, PathBuf};

/// Which record streams to read (comments, submissions, both).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sources {
    Comments,
    Submissions,
    Both,
}

impl Sources {
    pub fn comments(self) -> bool {
        matches!(self, Sources::Comments | Sources::Both)
    }
    pub fn submissions(self) -> bool {
        matches!(self, Sources::Submissions | Sources::Both)
    }
}

/// Where activity records come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    /// Monthly corpus layout: `<base>/comments/RC_YYYY-MM.zst`, `<base>/submissions/RS_YYYY-MM.zst`.
    Corpus,
    /// Explicit JSONL files (plain, or zstd when the name ends in `.zst`).
    Jsonl {
        submissions: Vec<PathBuf>,
        comments: Vec<PathBuf>,
    },
}

/// Subreddits kept by the targeted `snett` subgraph.
pub const DEFAULT_TARGET_SUBREDDITS: &[&str] = &[
    "reddit.com", "pics", "worldnews", "programming", "business", "politics", "obama",
    "science", "technology", "WTF", "AskReddit", "netsec", "philosophy", "videos",
    "offbeat", "funny", "entertainment", "linux", "geek", "gaming", "comics", "gadgets",
    "nsfw", "news", "environment", "atheism", "canada", "math", "Economics", "scifi",
    "bestof", "cogsci", "joel", "Health", "guns", "photography", "software", "history",
    "ideas",
];

/// Minimum co-activity weight kept by the filtered `snetf` graph.
pub const DEFAULT_EDGE_WEIGHT_THRESHOLD: u64 = 25;

/// Default read and write buffer size.
pub const DEFAULT_IO_BUFFER: usize = 256 * 1024;

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct NetworkOptions {
    pub base_dir: PathBuf,
    pub comments_dir: PathBuf,
    pub submissions_dir: PathBuf,
    pub input: InputSource,
    pub sources: Sources,
    pub start: Option<YearMonth>,         // inclusive
    pub end: Option<YearMonth>,           // inclusive
    pub subreddits: Option<Vec<String>>,  // lowercase, sorted; None = all
    pub exclude_authors: Vec<String>,     // lowercase, sorted
    pub filter_pseudo_users: bool,        // drop [deleted]/[removed]
    pub graphs_dir: PathBuf,
    pub dendrograms_dir: PathBuf,
    pub parallelism: Option<usize>,
    pub file_concurrency: usize,
    pub progress: bool,
    pub progress_label: Option<String>,
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        let base = PathBuf::from("../reddit");
        Self {
            comments_dir: base.join("comments"),
            submissions_dir: base.join("submissions"),
            base_dir: base,
            input: InputSource::Corpus,
            sources: Sources::Both,
            start: None,
            end: None,
            subreddits: None,
            exclude_authors: Vec::new(),
            filter_pseudo_users: true,
            graphs_dir: PathBuf::from("graphs"),
            dendrograms_dir: PathBuf::from("dendrograms"),
            parallelism: None,
            file_concurrency: 1, // big .zst windows are memory hungry
            progress: true,
            progress_label: None,
            read_buffer_bytes: DEFAULT_IO_BUFFER,
            write_buffer_bytes: DEFAULT_IO_BUFFER,
        }
    }
}

impl NetworkOptions {
    pub fn with_base_dir(mut self, base_dir: impl AsRef<Path>) -> Self {
        let base = base_dir.as_ref().to_path_buf();
        self.comments_dir = base.join("comments");
        self.submissions_dir = base.join("submissions");
        self.base_dir = base;
        self
    }
    pub fn with_input(mut self, input: InputSource) -> Self {
        self.input = input;
        self
    }
    pub fn with_sources(mut self, sources: Sources) -> Self {
        self.sources = sources;
        self
    }
    pub fn with_date_range(mut self, start: Option<YearMonth>, end: Option<YearMonth>) -> Self {
        self.start = start;
        self.end = end;
        self
    }
    pub fn with_subreddits<I, S>(mut self, subs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut v: Vec<String> = subs.into_iter().map(|s| normalize_name(s.as_ref())).collect();
        v.retain(|s| !s.is_empty());
        v.sort();
        v.dedup();
        self.subreddits = Some(v);
        self
    }
    pub fn with_excluded_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_authors.extend(authors.into_iter().map(|s| normalize_name(s.as_ref())));
        self.exclude_authors.retain(|s| !s.is_empty());
        self.exclude_authors.sort();
        self.exclude_authors.dedup();
        self
    }
    pub fn with_pseudo_user_filter(mut self, yes: bool) -> Self {
        self.filter_pseudo_users = yes;
        self
    }
    pub fn with_graphs_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.graphs_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_dendrograms_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dendrograms_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
    pub fn with_file_concurrency(mut self, n: usize) -> Self {
        self.file_concurrency = n.max(1);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_io_write_buffer(mut self, bytes: usize) -> Self {
        self.write_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}

/// Lowercase, trimmed, without a leading `r/` or `u/`.
pub fn normalize_name(s: &str) -> String {
    let s = s.trim().to_lowercase();
    match s.strip_prefix("r/").or_else(|| s.strip_prefix("u/")) {
        Some(rest) => rest.to_string(),
        None => s,
    }
}
