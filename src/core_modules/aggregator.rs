// THEORY:
// The aggregator is the heart of the sizer. It walks every position of a pixel
// grid, normalizes the sample, and credits every claim whose target color is
// within tolerance of it. A pixel can credit zero, one, or several claims; there
// is no tie-breaking and no notion of geometry.
//
// Key architectural principles:
// 1.  **Explicit accumulation**: Scanning never touches the claim records. It fills
//     a `Tally` (one counter per claim position plus an exact-color frequency map),
//     and the tally is applied to the claims once, at the end. This keeps the claim
//     list immutable during the pass.
// 2.  **Mergeable partials**: Any row range can be scanned into its own `Tally`, and
//     tallies merge by plain addition. The parallel pipeline relies on this: bands of
//     rows are scanned independently and merged exactly once each, which yields the
//     same counts as one sequential pass.
// 3.  **Total**: The aggregator performs no I/O and has no error conditions. An empty
//     claim list produces an empty list; a zero-area grid leaves every count at zero.

use crate::core_modules::claim::claim::{Claim, PixelCount};
use crate::core_modules::color::color::{Color, DEFAULT_TOLERANCE, Tolerance};
use crate::core_modules::pixel_grid::PixelGrid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

pub type FrequencyMap = HashMap<Color, PixelCount>;

/// Which coordinates a scan visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScanBounds {
    /// `[0, width) x [0, height)`: every pixel exactly once.
    #[default]
    Exclusive,
    /// `[0, width] x [0, height]`: one extra column and row past the edge, which
    /// sample as transparent black. Kept for compatibility with legacy counts.
    Inclusive,
}

impl ScanBounds {
    /// Number of (columns, rows) visited for a grid of the given size.
    pub fn extent(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            ScanBounds::Exclusive => (width, height),
            ScanBounds::Inclusive => (width.saturating_add(1), height.saturating_add(1)),
        }
    }
}

/// Tunable matching behavior for one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub tolerance: Tolerance,
    pub bounds: ScanBounds,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            bounds: ScanBounds::Exclusive,
        }
    }
}

/// Partial result of scanning some or all of a grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tally {
    /// Matching pixel count per claim, indexed like the claim list.
    pub claim_counts: Vec<PixelCount>,
    /// Occurrences of each exact color.
    pub frequencies: FrequencyMap,
    pub pixels_scanned: u64,
}

impl Tally {
    pub fn new(claim_total: usize) -> Self {
        Self {
            claim_counts: vec![0; claim_total],
            frequencies: FrequencyMap::new(),
            pixels_scanned: 0,
        }
    }

    /// Books one sample against every claim.
    pub fn record(&mut self, sample: Color, claims: &[Claim], tolerance: Tolerance) {
        self.pixels_scanned += 1;
        *self.frequencies.entry(sample).or_insert(0) += 1;
        for (count, claim) in self.claim_counts.iter_mut().zip(claims) {
            if claim.matches(&sample, tolerance) {
                *count += 1;
            }
        }
    }

    /// Adds another partial tally into this one.
    pub fn merge(&mut self, other: Tally) {
        if self.claim_counts.len() < other.claim_counts.len() {
            self.claim_counts.resize(other.claim_counts.len(), 0);
        }
        for (count, extra) in self.claim_counts.iter_mut().zip(other.claim_counts) {
            *count += extra;
        }
        for (color, occurrences) in other.frequencies {
            *self.frequencies.entry(color).or_insert(0) += occurrences;
        }
        self.pixels_scanned += other.pixels_scanned;
    }

    /// Credits the accumulated counts to the claims, preserving their order.
    /// `grid_pixels` is the real pixel count of the scanned grid.
    pub fn into_aggregation(self, mut claims: Vec<Claim>, grid_pixels: u64) -> Aggregation {
        for (claim, count) in claims.iter_mut().zip(&self.claim_counts) {
            claim.count += count;
        }
        Aggregation {
            claims,
            frequencies: self.frequencies,
            pixels_scanned: self.pixels_scanned,
            grid_pixels,
        }
    }
}

/// Final output of an aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// The input claims, same order, counts populated.
    pub claims: Vec<Claim>,
    pub frequencies: FrequencyMap,
    /// Positions visited, including any past the edge.
    pub pixels_scanned: u64,
    /// Pixels the grid actually has.
    pub grid_pixels: u64,
}

impl Aggregation {
    /// The `limit` most frequent exact colors, most common first. Ties are
    /// broken by color so the listing is stable.
    pub fn top_colors(&self, limit: usize) -> Vec<(Color, PixelCount)> {
        let mut colors: Vec<(Color, PixelCount)> =
            self.frequencies.iter().map(|(c, n)| (*c, *n)).collect();
        colors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        colors.truncate(limit);
        colors
    }
}

/// Scans the given rows (all columns within the scan extent) into a fresh tally.
pub fn scan_rows<G>(grid: &G, claims: &[Claim], options: &ScanOptions, rows: Range<u32>) -> Tally
where
    G: PixelGrid + ?Sized,
{
    let (columns, _) = options.bounds.extent(grid.width(), grid.height());
    let mut tally = Tally::new(claims.len());
    for y in rows {
        for x in 0..columns {
            tally.record(grid.sample(x, y), claims, options.tolerance);
        }
    }
    tally
}

/// Counts, for every claim, the grid positions whose color is within tolerance of
/// the claim's target color. Single pass, single thread.
pub fn aggregate<G>(grid: &G, claims: Vec<Claim>, options: &ScanOptions) -> Aggregation
where
    G: PixelGrid + ?Sized,
{
    let (_, rows) = options.bounds.extent(grid.width(), grid.height());
    let tally = scan_rows(grid, &claims, options, 0..rows);
    let grid_pixels = grid.pixel_count();
    tracing::debug!(
        pixels = tally.pixels_scanned,
        grid_pixels,
        unique_colors = tally.frequencies.len(),
        claims = claims.len(),
        "Scanned map"
    );
    tally.into_aggregation(claims, grid_pixels)
}
