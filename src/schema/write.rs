// src/schema/write.rs

use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use super::Column;

/// Write `cols` as `<table_name>_columns.json` inside `dir`.
///
/// The file is written to a temp name first and renamed over the target.
pub fn write_columns<P: AsRef<Path>>(
    table_name: &str,
    dir: P,
    cols: &[Column],
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let path = dir.join(format!("{}_columns.json", table_name));
    let tmp_path = dir.join(format!(".{}_columns.json.tmp", table_name));

    let written = write_tmp(&tmp_path, cols).and_then(|()| {
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))
    });
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written?;

    Ok(path)
}

fn write_tmp(tmp_path: &Path, cols: &[Column]) -> Result<()> {
    let mut tmp = fs::File::create(tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    serde_json::to_writer_pretty(&mut tmp, cols).context("serializing columns")?;
    tmp.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::trip_columns;
    use tempfile::tempdir;

    #[test]
    fn test_write_columns() -> Result<()> {
        let tmp = tempdir()?;
        let path = write_columns("trips", tmp.path().join("contract"), &trip_columns())?;
        assert_eq!(path.file_name().unwrap(), "trips_columns.json");

        let text = fs::read_to_string(&path)?;
        let back: Vec<Column> = serde_json::from_str(&text)?;
        assert_eq!(back, trip_columns());
        assert_eq!(back[8].timezone.as_deref(), Some("UTC"));
        assert!(back[0].timezone.is_none());
        assert!(!text.contains("\"timezone\": null"));

        let leftovers = fs::read_dir(tmp.path().join("contract"))?.count();
        assert_eq!(leftovers, 1);
        Ok(())
    }

    #[test]
    fn test_failed_write_leaves_no_tmp_file() -> Result<()> {
        let tmp = tempdir()?;
        fs::create_dir(tmp.path().join("trips_columns.json"))?;

        assert!(write_columns("trips", tmp.path(), &trip_columns()).is_err());
        let names: Vec<_> = fs::read_dir(tmp.path())?
            .map(|e| e.map(|e| e.file_name()))
            .collect::<std::io::Result<_>>()?;
        assert_eq!(names, vec!["trips_columns.json"]);
        Ok(())
    }
}
