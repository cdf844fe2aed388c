pub mod aggregator;
pub mod claim;
pub mod color;
pub mod pixel_grid;
pub mod utils;
