//! CSV batch conversion CLI.
//!
//! Reads a CSV of WGS84 coordinates, resolves counties, reprojects, and
//! writes the annotated result CSV.

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use wabash::batch::{read_points, write_results};
use wabash::config::Config;
use wabash::locate::{detection_chain, fetch_county_boundaries, CountySpatialIndex};
use wabash::models::{County, RowOutcome};
use wabash::registry::CrsRegistry;
use wabash::transform::{CountyChoice, Transformer};

#[derive(Parser, Debug)]
#[command(name = "convert")]
#[command(about = "Transform a CSV of WGS84 coordinates to Indiana State Plane / InGCS")]
struct Args {
    /// Input CSV (columns matched by name: lat, lon/long, optional id)
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV
    #[arg(short, long)]
    output: PathBuf,

    /// Fixed county for all rows instead of auto-detection
    /// (e.g. "Marion", "St Joseph")
    #[arg(long)]
    county: Option<String>,

    /// Skip the boundary download; bounding-box detection only
    #[arg(long)]
    offline: bool,

    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())?;

    let registry =
        CrsRegistry::load(&config.registry_path).context("Failed to load EPSG registry")?;
    let (verified, total) = registry.verification_summary();
    info!("Registry: {}/{} counties verified", verified, total);
    if verified < total {
        warn!(
            "{} EPSG codes still need verification against epsg.io",
            total - verified
        );
    }

    let input = File::open(&args.input).context("Failed to open input CSV")?;
    let points = read_points(input)?;
    info!("Read {} input rows from {}", points.len(), args.input.display());

    let choice = match &args.county {
        Some(name) => CountyChoice::Fixed(County::new(name)),
        None => CountyChoice::Auto,
    };

    // The polygon index is only worth downloading when auto-detecting
    let index = if args.offline || args.county.is_some() {
        None
    } else {
        match fetch_county_boundaries(
            &config.boundary_url,
            Duration::from_secs(config.fetch_timeout_secs),
        )
        .await
        {
            Ok(boundaries) => Some(CountySpatialIndex::build(boundaries)),
            Err(e) => {
                warn!(
                    "County boundary download failed ({}); falling back to bounding-box detection",
                    e
                );
                None
            }
        }
    };
    let chain = detection_chain(index);
    let transformer = Transformer::new(&registry, &chain)?;

    let bar = ProgressBar::new(points.len() as u64);
    bar.set_style(ProgressStyle::default_bar().template("{bar:40} {pos}/{len} {msg}")?);

    let mut outcomes = Vec::with_capacity(points.len());
    for point in &points {
        let outcome = match transformer.transform(point, &choice) {
            Ok(result) => RowOutcome::Ok(result),
            Err(e) => RowOutcome::Failed {
                point: point.clone(),
                reason: e.to_string(),
            },
        };
        outcomes.push(outcome);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let with_county = outcomes
        .iter()
        .filter(|o| matches!(o, RowOutcome::Ok(r) if r.county.is_some()))
        .count();
    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();

    let output = File::create(&args.output).context("Failed to create output CSV")?;
    write_results(output, &outcomes)?;

    info!(
        "Wrote {} rows to {} ({} with county match, {} failed)",
        outcomes.len(),
        args.output.display(),
        with_county,
        failed
    );

    Ok(())
}
