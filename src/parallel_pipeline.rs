// THEORY:
// The parallel pipeline splits one aggregation pass into horizontal bands of rows
// and scans each band on its own worker. Pixels are independent, so bands need no
// coordination while they run. Each band produces a private `Tally`; the tallies
// are merged exactly once each when every worker has finished. Addition is
// commutative, so the merged counts equal those of the sequential pass no matter
// which band finishes first.
//
// Scanning is CPU-bound, so bands run on Tokio's blocking pool rather than as
// async tasks on the reactor threads.

use crate::core_modules::aggregator::{Aggregation, ScanOptions, Tally, scan_rows};
use crate::core_modules::claim::claim::Claim;
use crate::core_modules::pixel_grid::PixelGrid;
use crate::error::{Result, SizerError};
use futures::future::join_all;
use std::ops::Range;
use std::sync::Arc;

/// Number of workers to use when the caller asks for "as many as the machine has".
pub fn available_workers() -> usize {
    num_cpus::get().max(1)
}

/// Splits `rows` into at most `workers` contiguous, non-overlapping bands that
/// together cover every row. Earlier bands take the remainder rows.
pub fn plan_bands(rows: u32, workers: usize) -> Vec<Range<u32>> {
    let workers = u32::try_from(workers.max(1)).unwrap_or(u32::MAX).min(rows);
    if workers == 0 {
        return Vec::new();
    }
    let base = rows / workers;
    let remainder = rows % workers;
    let mut bands = Vec::with_capacity(workers as usize);
    let mut start = 0;
    for band in 0..workers {
        let len = base + u32::from(band < remainder);
        bands.push(start..start + len);
        start += len;
    }
    bands
}

/// Band-parallel equivalent of [`aggregate`](crate::core_modules::aggregator::aggregate).
pub async fn aggregate_parallel<G>(
    grid: Arc<G>,
    claims: Vec<Claim>,
    options: ScanOptions,
    workers: usize,
) -> Result<Aggregation>
where
    G: PixelGrid + Send + Sync + 'static,
{
    let (_, rows) = options.bounds.extent(grid.width(), grid.height());
    let claims = Arc::new(claims);
    let bands = plan_bands(rows, workers);
    tracing::debug!(bands = bands.len(), rows, "Dispatching scan bands");

    let tasks = bands.into_iter().enumerate().map(|(band, range)| {
        let grid = Arc::clone(&grid);
        let claims = Arc::clone(&claims);
        tokio::task::spawn_blocking(move || {
            let tally = scan_rows(grid.as_ref(), &claims, &options, range.clone());
            tracing::debug!(band, rows = ?range, pixels = tally.pixels_scanned, "Band scanned");
            tally
        })
    });

    let mut merged = Tally::new(claims.len());
    for joined in join_all(tasks).await {
        let tally = joined.map_err(|e| SizerError::Worker(e.to_string()))?;
        merged.merge(tally);
    }

    let claims = Arc::try_unwrap(claims).unwrap_or_else(|shared| shared.as_ref().clone());
    Ok(merged.into_aggregation(claims, grid.pixel_count()))
}
