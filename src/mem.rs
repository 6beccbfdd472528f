//! Cached available-memory probe used to back off while ingesting large months.

use parking_lot::Mutex;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use sysinfo::{System, SystemExt};

const REFRESH_EVERY: Duration = Duration::from_millis(500);

struct Probe {
    sys: System,
    checked_at: Option<Instant>,
    free_fraction: f64,
}

static PROBE: OnceLock<Mutex<Probe>> = OnceLock::new();

/// Recent estimate of available / total RAM in `0.0..=1.0`.
pub fn available_memory_fraction() -> f64 {
    let probe = PROBE.get_or_init(|| {
        Mutex::new(Probe { sys: System::new(), checked_at: None, free_fraction: 1.0 })
    });
    let mut p = probe.lock();
    let stale = p.checked_at.map_or(true, |t| t.elapsed() >= REFRESH_EVERY);
    if stale {
        p.sys.refresh_memory();
        let total = p.sys.total_memory() as f64;
        let avail = p.sys.available_memory() as f64;
        p.free_fraction = if total > 0.0 { (avail / total).clamp(0.0, 1.0) } else { 1.0 };
        p.checked_at = Some(Instant::now());
    }
    p.free_fraction
}

/// Sleep briefly when less than `threshold` of RAM is available.
pub fn maybe_throttle_low_memory(threshold: f64) {
    if available_memory_fraction() < threshold {
        std::thread::sleep(Duration::from_millis(25));
    }
}
