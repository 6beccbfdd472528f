use crate::config::normalize_name;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();

/// Install the `RUST_LOG`-driven subscriber (default `info`). Later calls are no-ops.
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

/// Size the global rayon pool. Only the first successful call takes effect.
pub fn configure_thread_pool(threads: Option<usize>) {
    if let Some(n) = threads.filter(|n| *n > 0) {
        if rayon::ThreadPoolBuilder::new().num_threads(n).build_global().is_err() {
            tracing::debug!(threads = n, "global rayon pool already initialised");
        }
    }
}

/// Extra author exclusions from `RNET_EXCLUDE_AUTHORS` (comma, semicolon or whitespace separated).
pub fn env_excluded_authors() -> Vec<String> {
    let Ok(raw) = std::env::var("RNET_EXCLUDE_AUTHORS") else { return Vec::new() };
    raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(normalize_name)
        .filter(|s| !s.is_empty())
        .collect()
}

// -------- retry/backoff for flaky volumes (AV scanners, NAS, sharing violations) --------

fn is_retriable_io_error(e: &io::Error) -> bool {
    // 5 access denied, 32 sharing violation, 33 lock violation, 21 device not ready,
    // 1224 user-mapped section open
    matches!(e.raw_os_error(), Some(5) | Some(21) | Some(32) | Some(33) | Some(1224))
}

fn with_backoff<T>(tries: usize, delay_ms: u64, mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let tries = tries.max(1);
    let mut attempt = 0;
    loop {
        match op() {
            Err(e) if is_retriable_io_error(&e) && attempt + 1 < tries => {
                attempt += 1;
                sleep(Duration::from_millis(delay_ms.saturating_mul(attempt as u64)));
            }
            other => return other,
        }
    }
}

pub fn open_with_backoff(path: &Path) -> io::Result<File> {
    with_backoff(16, 50, || File::open(path))
}

pub fn create_with_backoff(path: &Path) -> io::Result<File> {
    with_backoff(16, 50, || File::create(path))
}

/// Replace `dest` with `tmp`; falls back to copy + remove when rename is refused.
pub fn replace_file_atomic_backoff(tmp: &Path, dest: &Path) -> Result<()> {
    if dest.exists() {
        with_backoff(20, 50, || fs::remove_file(dest))
            .with_context(|| format!("remove {}", dest.display()))?;
    }
    if with_backoff(20, 50, || fs::rename(tmp, dest)).is_ok() {
        return Ok(());
    }
    with_backoff(20, 50, || fs::copy(tmp, dest))
        .with_context(|| format!("copy {} -> {}", tmp.display(), dest.display()))?;
    match with_backoff(20, 50, || fs::remove_file(tmp)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("remove {}", tmp.display())),
    }
}
