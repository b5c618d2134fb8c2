use anyhow::{Context, Result};
use std::{env, path::PathBuf, time::Instant};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tripingest::{materialize, process::write_parquet, HttpTripSource, IngestConfig};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    let output = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("trips.parquet"));

    // ─── 2) resolve window + taxi types ──────────────────────────────
    let config = IngestConfig::from_env().context("reading ingestion settings")?;
    info!(
        start = %config.start_date,
        end = %config.end_date,
        taxi_types = ?config.taxi_types,
        base = %config.base_url,
        "configured"
    );

    // ─── 3) fetch + combine ──────────────────────────────────────────
    let start = Instant::now();
    let source = HttpTripSource::new(config.base_url.clone());
    let trips = materialize(&config, &source).context("ingesting trips")?;
    info!(rows = trips.num_rows(), elapsed = ?start.elapsed(), "fetched");

    // ─── 4) hand off to the loader ───────────────────────────────────
    write_parquet(&trips, &output)?;

    info!("all done");
    Ok(())
}
