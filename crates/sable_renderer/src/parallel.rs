//! Row-parallel work distribution.
//!
//! A fixed pool of rayon workers pulls image rows from a shared atomic
//! counter until every row has been claimed. Each worker owns its own
//! generator, seeded from the base seed plus the worker index, so no random
//! state is ever shared between threads.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

/// Errors that can occur while setting up a parallel render.
#[derive(Error, Debug)]
pub enum ParallelError {
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Number of workers to use for `rows` rows.
///
/// `0` requests one worker per available hardware thread. The result is never
/// more than the number of rows and never less than one.
pub fn resolve_workers(requested: usize, rows: u32) -> usize {
    let workers = if requested == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    } else {
        requested
    };

    workers.min(rows as usize).max(1)
}

/// Run `action` once for every row in `[0, rows)` across `workers` threads.
///
/// Rows are claimed greedily, so completion order is unspecified; results come
/// back tagged with their row index.
pub fn parallel_rows<T, F>(
    rows: u32,
    workers: usize,
    seed: u64,
    action: F,
) -> Result<Vec<(u32, T)>, ParallelError>
where
    T: Send,
    F: Fn(u32, &mut StdRng) -> T + Sync,
{
    if rows == 0 {
        return Ok(Vec::new());
    }

    let workers = resolve_workers(workers, rows);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("sable-worker-{index}"))
        .build()?;

    let next_row = AtomicU32::new(0);

    let per_worker: Vec<Vec<(u32, T)>> = pool.broadcast(|ctx| {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(ctx.index() as u64));
        let mut claimed = Vec::new();

        loop {
            let row = next_row.fetch_add(1, Ordering::Relaxed);
            if row >= rows {
                break;
            }
            claimed.push((row, action(row, &mut rng)));
        }

        log::debug!("Worker {} finished {} rows", ctx.index(), claimed.len());
        claimed
    });

    Ok(per_worker.into_iter().flatten().collect())
}
