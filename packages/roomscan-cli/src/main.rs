//! Command line entry point: process one room photo into a report.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use roomscan::{FallbackPolicy, Pipeline, PipelineConfig};

#[derive(Parser)]
#[command(author, version, about = "Detect furniture in a photo and export a shopping report")]
struct Cli {
    /// Path to the input image
    image: PathBuf,

    /// Where to write the spreadsheet report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for cropped item images
    #[arg(long)]
    crop_dir: Option<PathBuf>,

    /// Reverse image search endpoint
    #[arg(long)]
    search_endpoint: Option<String>,

    /// Emit a placeholder result when reverse search finds nothing
    #[arg(long)]
    placeholder_fallback: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Processing failed: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> roomscan::Result<()> {
    let mut config = PipelineConfig::from_env()?;
    if let Some(output) = cli.output {
        config = config.with_report_path(output);
    }
    if let Some(crop_dir) = cli.crop_dir {
        config = config.with_crop_dir(crop_dir);
    }
    if let Some(endpoint) = cli.search_endpoint {
        config = config.with_search_endpoint(endpoint);
    }

    let policy = if cli.placeholder_fallback {
        FallbackPolicy::Placeholder
    } else {
        FallbackPolicy::PropagateEmpty
    };

    let pipeline = Pipeline::production(&config, policy);
    let report = pipeline.run(&cli.image).await?;

    info!(
        detected = report.items_detected,
        skipped = report.items_skipped,
        failed_links = report.failed_links.len(),
        "run complete"
    );
    println!("Report saved to {}", report.report_path.display());
    Ok(())
}
