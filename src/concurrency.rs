//! Bounded fan-out over input files: at most `limit` decoders in flight.

use anyhow::Result;
use rayon::prelude::*;

/// Run `f` over `items`, `limit` at a time. `limit <= 1` runs sequentially in order.
/// Stops at the first error.
pub fn for_each_limited<T, F>(items: &[T], limit: usize, f: F) -> Result<()>
where
    T: Sync,
    F: Sync + Fn(&T) -> Result<()>,
{
    if limit <= 1 {
        return items.iter().try_for_each(&f);
    }
    items
        .chunks(limit)
        .try_for_each(|chunk| chunk.par_iter().try_for_each(&f))
}
