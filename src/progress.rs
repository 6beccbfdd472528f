//! Progress reporting: byte bars for ingestion, count bars for pairwise loops.

use crate::paths::FileJob;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::fs;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Optional global MultiProgress so several bars can render at once.
static GLOBAL_MP: OnceLock<Arc<MultiProgress>> = OnceLock::new();

/// Install a global MultiProgress for every bar created afterwards. First call wins.
pub fn set_global_multiprogress(mp: Arc<MultiProgress>) {
    let _ = GLOBAL_MP.set(mp);
}

fn new_bar(total: u64, template: &str, label: Option<&str>) -> ProgressBar {
    let pb = match GLOBAL_MP.get() {
        Some(mp) => mp.add(ProgressBar::new(total)),
        None => ProgressBar::new(total),
    };
    // templates are compile-time constants; fall back to the default style if one is rejected
    let style = ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    if let Some(msg) = label.filter(|l| !l.is_empty()) {
        pb.set_message(msg.to_string());
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn make_progress_bar_labeled(total_bytes: u64, label: Option<&str>) -> ProgressBar {
    new_bar(
        total_bytes,
        "{spinner:.green} {msg} {bytes:>10}/{total_bytes:<10} [{bar:.cyan/blue}] {percent:>3}%  \
         {bytes_per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}",
        label,
    )
}

/// Count-style bar (items processed out of total).
pub fn make_count_progress(total: u64, label: &str) -> ProgressBar {
    new_bar(
        total,
        "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
         it/s: {per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}",
        Some(label),
    )
}

pub fn total_input_size(files: &[FileJob]) -> u64 {
    files.iter().map(|j| fs::metadata(&j.path).map(|m| m.len()).unwrap_or(0)).sum()
}
