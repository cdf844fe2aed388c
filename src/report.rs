use crate::core_modules::aggregator::Aggregation;
use crate::core_modules::claim::claim::{Claim, PixelCount};
use crate::core_modules::color::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorFrequency {
    pub color: Color,
    pub count: PixelCount,
}

/// The outcome of one sizing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Claims in table order, counts populated.
    pub claims: Vec<Claim>,
    pub pixels_scanned: u64,
    /// Pixels in the map itself; less than `pixels_scanned` for inclusive scans.
    pub map_pixels: u64,
    pub unique_colors: usize,
    /// Rows of the claim table that could not be parsed.
    pub rejected_rows: Vec<usize>,
    /// Most frequent exact colors, if requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_colors: Vec<ColorFrequency>,
}

impl Report {
    pub fn new(aggregation: Aggregation, rejected_rows: Vec<usize>, top_colors: usize) -> Self {
        let top_colors = aggregation
            .top_colors(top_colors)
            .into_iter()
            .map(|(color, count)| ColorFrequency { color, count })
            .collect();
        Self {
            unique_colors: aggregation.frequencies.len(),
            pixels_scanned: aggregation.pixels_scanned,
            map_pixels: aggregation.grid_pixels,
            claims: aggregation.claims,
            rejected_rows,
            top_colors,
        }
    }

    /// Share of scanned pixels credited to `claim`, in percent.
    pub fn share(&self, claim: &Claim) -> f64 {
        if self.pixels_scanned == 0 {
            return 0.0;
        }
        claim.count as f64 * 100.0 / self.pixels_scanned as f64
    }

    pub fn render(&self, format: ReportFormat) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .claims
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("claim".len());

        writeln!(
            f,
            "{:<name_width$}  {:>5}  {:>12}  {:>7}",
            "claim", "class", "pixels", "share"
        )?;
        for claim in &self.claims {
            writeln!(
                f,
                "{:<name_width$}  {:>5}  {:>12}  {:>6.2}%",
                claim.name,
                claim.class,
                claim.count,
                self.share(claim)
            )?;
        }
        writeln!(
            f,
            "\n{} pixels scanned ({} in map), {} distinct colors",
            self.pixels_scanned, self.map_pixels, self.unique_colors
        )?;
        if !self.rejected_rows.is_empty() {
            let rows: Vec<String> = self.rejected_rows.iter().map(|r| r.to_string()).collect();
            writeln!(f, "unparsed rows: {}", rows.join(", "))?;
        }
        if !self.top_colors.is_empty() {
            writeln!(f, "\nmost common colors:")?;
            for (rank, entry) in self.top_colors.iter().enumerate() {
                writeln!(f, "  {:>2}. {}  {}", rank + 1, entry.color, entry.count)?;
            }
        }
        Ok(())
    }
}
