// src/process/write.rs
use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
};
use tracing::info;

/// Write `batch` to `path` as a single Snappy-compressed parquet file.
///
/// Goes through `<path>.tmp` and a rename so a reader never sees a half
/// written file.
pub fn write_parquet<P: AsRef<Path>>(batch: &RecordBatch, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create `{}`", parent.display()))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    let written = write_tmp(batch, tmp).and_then(|()| {
        fs::rename(tmp, path)
            .with_context(|| format!("renaming `{}` -> `{}`", tmp.display(), path.display()))
    });
    if written.is_err() {
        let _ = fs::remove_file(tmp);
    }
    written?;

    info!(path = %path.display(), rows = batch.num_rows(), "wrote trips parquet");
    Ok(())
}

fn write_tmp(batch: &RecordBatch, tmp: &Path) -> Result<()> {
    let file = File::create(tmp).with_context(|| format!("creating `{}`", tmp.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(BufWriter::new(file), batch.schema(), Some(props))
        .context("creating Arrow writer for trips")?;
    writer.write(batch).context("writing trips batch")?;
    writer.close().context("closing trips parquet")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{combine, decode_parquet};
    use bytes::Bytes;
    use tempfile::tempdir;

    #[test]
    fn test_write_empty_result_keeps_schema() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("out").join("trips.parquet");
        let empty = combine(&[])?;

        write_parquet(&empty, &path)?;

        let back = decode_parquet("trips.parquet", Bytes::from(fs::read(&path)?))?;
        assert_eq!(back.num_rows(), 0);
        assert_eq!(back.schema().fields().len(), 9);
        assert!(!tmp.path().join("out").join("trips.parquet.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_failed_write_leaves_no_tmp_file() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("trips.parquet");
        // a directory in the way makes the final rename fail
        fs::create_dir(&path)?;

        assert!(write_parquet(&combine(&[])?, &path).is_err());
        assert!(path.is_dir());
        assert!(!tmp.path().join("trips.parquet.tmp").exists());
        Ok(())
    }
}
