// THEORY:
// The `pipeline` module is the top-level API of the sizer. It strings the stages
// together so a caller only hands over a configuration and receives a `Report`:
//
// 1.  Load the map image and widen it to a 16-bit pixel grid.
// 2.  Load the claim table, applying the configured malformed-row policy.
// 3.  Aggregate: one pass over the grid, sequential or band-parallel.
// 4.  Package the counts, the rejected rows, and the color statistics as a report.
//
// Stages 1 and 2 are the only fallible ones. Aggregation itself cannot fail; the
// parallel path only surfaces an error if a worker task dies.

use crate::config::SizerConfig;
use crate::core_modules::aggregator::{Aggregation, aggregate};
use crate::core_modules::claim::claim::Claim;
use crate::core_modules::pixel_grid::PixelGrid;
use crate::core_modules::utils::claim_table::claim_table::load_table;
use crate::core_modules::utils::image_helper::image_helper::load_map;
use crate::error::Result;
use crate::parallel_pipeline::aggregate_parallel;
use crate::report::Report;
use std::sync::Arc;

pub use crate::core_modules::aggregator::{ScanBounds, ScanOptions};
pub use crate::core_modules::color::color::Color;
pub use crate::core_modules::utils::claim_table::claim_table::MalformedRowPolicy;

/// Runs a configured sizing job end to end.
pub struct SizingPipeline {
    config: SizerConfig,
}

impl SizingPipeline {
    pub fn new(config: SizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SizerConfig {
        &self.config
    }

    /// Loads both inputs from disk, measures every claim, and reports.
    pub async fn generate_report(&self) -> Result<Report> {
        let map = load_map(&self.config.map_path)?;
        let table = load_table(&self.config.claims_path, &self.config.table_options())?;
        let rejected_rows = table.rejected.iter().map(|e| e.row).collect();

        let aggregation = self.measure(Arc::new(map), table.claims).await?;
        tracing::info!(
            claims = aggregation.claims.len(),
            pixels = aggregation.pixels_scanned,
            "Measured claims"
        );

        Ok(Report::new(aggregation, rejected_rows, self.config.top_colors))
    }

    /// Counts matching pixels for each claim on an already-loaded grid.
    pub async fn measure<G>(&self, grid: Arc<G>, claims: Vec<Claim>) -> Result<Aggregation>
    where
        G: PixelGrid + Send + Sync + 'static,
    {
        let options = self.config.scan_options();
        match self.config.workers {
            0 => Ok(aggregate(grid.as_ref(), claims, &options)),
            workers => aggregate_parallel(grid, claims, options, workers).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel_grid::ColorGrid;
    use pretty_assertions::assert_eq;

    fn grid() -> ColorGrid {
        let mut grid = ColorGrid::filled(5, 5, Color::opaque(0, 0, 200));
        for x in 0..5 {
            grid.set(x, 0, Color::opaque(200, 0, 0));
        }
        grid
    }

    fn claims() -> Vec<Claim> {
        vec![
            Claim::new("Red", Color::opaque(200, 0, 0), 1),
            Claim::new("Blue", Color::opaque(0, 0, 200), 2),
        ]
    }

    #[tokio::test]
    async fn sequential_and_parallel_configs_agree() {
        let sequential = SizingPipeline::new(SizerConfig::default());
        let parallel = SizingPipeline::new(SizerConfig {
            workers: 3,
            ..SizerConfig::default()
        });
        let a = sequential.measure(Arc::new(grid()), claims()).await.unwrap();
        let b = parallel.measure(Arc::new(grid()), claims()).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.claims[0].count, 5);
        assert_eq!(a.claims[1].count, 20);
    }

    #[tokio::test]
    async fn tolerance_comes_from_config() {
        let pipeline = SizingPipeline::new(SizerConfig {
            tolerance: 0,
            ..SizerConfig::default()
        });
        let claims = vec![Claim::new("Near red", Color::opaque(201, 0, 0), 1)];
        let result = pipeline.measure(Arc::new(grid()), claims).await.unwrap();
        assert_eq!(result.claims[0].count, 0);
    }
}
