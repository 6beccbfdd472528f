use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use zstd::stream::read::Decoder;

use crate::mem::maybe_throttle_low_memory;
use crate::util::open_with_backoff;

/// Fields of a Reddit record the network builders need. Extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct MinimalRecord {
    pub subreddit: Option<String>,
    pub author: Option<String>,
    pub id: Option<String>,
    pub parent_id: Option<String>, // comments only
    pub created_utc: Option<TimestampField>,
    // submissions only
    pub num_comments: Option<u64>,
    pub over_18: Option<bool>,
    pub domain: Option<String>,
}

/// `created_utc` appears as a number in newer dumps and as a string in older ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TimestampField {
    Int(i64),
    Float(f64),
    Text(String),
}

impl TimestampField {
    pub fn as_epoch(&self) -> Option<i64> {
        match self {
            TimestampField::Int(n) => Some(*n),
            TimestampField::Float(f) if f.is_finite() => Some(*f as i64),
            TimestampField::Float(_) => None,
            TimestampField::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[inline]
pub fn parse_minimal(line: &str) -> Result<MinimalRecord> {
    Ok(serde_json::from_str(line)?)
}

fn warn_decode_skip(path: &Path, e: &anyhow::Error) {
    let abs = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    tracing::warn!(
        path = %abs.display(),
        error = %e,
        "skipping file after decode error (usually trailing corruption; re-download this month)"
    );
}

/// Counts compressed bytes pulled through the decoder so progress tracks file size.
struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

fn is_zst(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("zst"))
}

/// Stream a JSONL file (zstd-compressed when it ends in `.zst`) line by line.
///
/// `on_progress` receives deltas of on-disk bytes consumed. A file that fails to
/// decode is logged and skipped; its remaining size is still reported as progress
/// so byte bars finish. Errors returned by `on_line` propagate.
pub fn for_each_line(
    path: &Path,
    read_buf_bytes: usize,
    mut on_progress: impl FnMut(u64),
    mut on_line: impl FnMut(&str) -> Result<()>,
) -> Result<()> {
    let mut reported = 0u64;
    let mut handler_failed = false;
    let res = stream_lines(path, read_buf_bytes, &mut |delta: u64| {
        reported += delta;
        on_progress(delta)
    }, &mut |line: &str| {
        on_line(line).inspect_err(|_| handler_failed = true)
    });
    match res {
        Ok(()) => Ok(()),
        Err(e) if handler_failed => Err(e),
        Err(e) => {
            warn_decode_skip(path, &e);
            let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            on_progress(size.saturating_sub(reported));
            Ok(())
        }
    }
}

fn stream_lines(
    path: &Path,
    read_buf_bytes: usize,
    on_progress: &mut dyn FnMut(u64),
    on_line: &mut dyn FnMut(&str) -> Result<()>,
) -> Result<()> {
    let file = open_with_backoff(path)?;
    let counter = Arc::new(AtomicU64::new(0));
    let counted = CountingReader { inner: file, counter: counter.clone() };
    let cap = read_buf_bytes.max(8 * 1024);

    let mut reader: Box<dyn BufRead> = if is_zst(path) {
        let mut decoder = Decoder::new(counted)?;
        // very large frames otherwise fail with "Frame requires too much memory"
        decoder.window_log_max(31)?;
        Box::new(BufReader::with_capacity(cap, decoder))
    } else {
        Box::new(BufReader::with_capacity(cap, counted))
    };

    let mut buf = String::with_capacity(16 * 1024);
    let mut last = 0u64;
    loop {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        let cur = counter.load(Ordering::Relaxed);
        if cur > last {
            on_progress(cur - last);
            last = cur;
        }
        if n == 0 {
            break;
        }
        let line = buf.trim_end_matches(['\n', '\r']);
        if !line.is_empty() {
            on_line(line)?;
        }
        maybe_throttle_low_memory(0.10);
    }
    Ok(())
}
