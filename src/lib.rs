// THEORY:
// This file is the entry point for the `claim_sizer` library crate. The public
// surface is the `SizingPipeline` with its `SizerConfig` and `Report`; the
// building blocks in `core_modules` (color model, claims, pixel grids, the
// aggregator, and the input loaders) are exported too, so callers that already
// hold decoded pixels or parsed claims can run the aggregator directly.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;
pub mod report;

pub use config::SizerConfig;
pub use error::{Result, SizerError};
pub use pipeline::SizingPipeline;
pub use report::{Report, ReportFormat};
