use anyhow::Result;
use std::{env, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tripingest::schema::{trip_columns, write_columns};

/// Export the trips column contract as `trips_columns.json` for the
/// orchestrator.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let cols = trip_columns();
    let path = write_columns("trips", &dir, &cols)?;
    info!(path = %path.display(), columns = cols.len(), "wrote column contract");
    Ok(())
}
