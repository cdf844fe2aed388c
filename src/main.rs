use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use claim_sizer::SizingPipeline;
use claim_sizer::config::SizerConfig;
use claim_sizer::parallel_pipeline::available_workers;
use claim_sizer::pipeline::{MalformedRowPolicy, ScanBounds};
use claim_sizer::report::ReportFormat;

#[derive(Parser)]
#[command(name = "claim_sizer")]
#[command(about = "Count how many map pixels belong to each color-coded claim")]
struct Cli {
    /// Map image (defaults to map.png)
    map: Option<PathBuf>,

    /// Claim table: name,red,blue,green,class (defaults to claims.csv)
    claims: Option<PathBuf>,

    /// YAML config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Largest per-channel difference that still counts as a match
    #[arg(short, long, allow_negative_numbers = true)]
    tolerance: Option<i32>,

    /// Scan the legacy inclusive range or only the real pixels
    #[arg(long, value_enum)]
    scan_bounds: Option<ScanBounds>,

    /// What to do with claim rows that do not parse
    #[arg(long, value_enum)]
    malformed_rows: Option<MalformedRowPolicy>,

    /// The claim table has no header row
    #[arg(long)]
    no_header: bool,

    /// Split the scan across this many workers (0 = single thread, auto = one per CPU)
    #[arg(short, long, value_parser = parse_workers, conflicts_with = "parallel")]
    workers: Option<usize>,

    /// Use one worker per CPU; same as `--workers auto`
    #[arg(short, long)]
    parallel: bool,

    /// Also list the N most frequent exact colors
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn parse_workers(value: &str) -> Result<usize, String> {
    if value.eq_ignore_ascii_case("auto") {
        return Ok(available_workers());
    }
    value
        .parse()
        .map_err(|_| format!("`{value}` is not a worker count or `auto`"))
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<SizerConfig> {
        let mut config = match &self.config {
            Some(path) => SizerConfig::load(path)?,
            None => SizerConfig::default(),
        };

        if let Some(map) = &self.map {
            config.map_path = map.clone();
        }
        if let Some(claims) = &self.claims {
            config.claims_path = claims.clone();
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(bounds) = self.scan_bounds {
            config.scan_bounds = bounds;
        }
        if let Some(policy) = self.malformed_rows {
            config.malformed_rows = policy;
        }
        if self.no_header {
            config.has_header = false;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.parallel {
            config.workers = available_workers();
        }
        if let Some(top) = self.top {
            config.top_colors = top;
        }
        if let Some(format) = self.format {
            config.format = format;
        }

        if config.tolerance < 0 {
            anyhow::bail!("Tolerance must not be negative, got {}", config.tolerance);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "claim_sizer=debug"
    } else {
        "claim_sizer=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let config = cli.resolve_config()?;
    tracing::debug!(?config, "Resolved configuration");

    let format = config.format;
    let pipeline = SizingPipeline::new(config);
    let report = pipeline.generate_report().await?;

    print!("{}", report.render(format)?);
    if format == ReportFormat::Json {
        println!();
    }

    Ok(())
}
