//! Output formatting and persistence for query results.
//!
//! Supports pretty JSON on stdout, JSON files, and CSV export of readings.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::model::ClimateRow;

/// Writes `value` as pretty-printed JSON to stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

/// Writes `value` as pretty-printed JSON to `path`, replacing any existing file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create '{}'", path.display()))?;
    serde_json::to_writer_pretty(file, value)?;
    debug!(path = %path.display(), "JSON written");
    Ok(())
}

/// Writes readings as CSV with a header row, in the same column layout the
/// CSV store reads.
pub fn write_rows_csv(path: &Path, rows: &[ClimateRow]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create '{}'", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(())
}

/// Writes JSON to `path` when given, else to stdout.
pub fn emit(path: Option<&Path>, value: &impl Serialize) -> Result<()> {
    match path {
        Some(p) => write_json(p, value),
        None => print_json(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Quality;
    use crate::model::test_support::row;
    use crate::store::read_rows;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&serde_json::json!({ "data": {} })).unwrap();
    }

    #[test]
    fn test_write_json_creates_file() {
        let path = temp_path("climate_rater_test_write.json");
        let _ = fs::remove_file(&path);

        write_json(&path, &serde_json::json!({ "data": [1, 2, 3] })).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["data"][2], 3);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_csv_export_reads_back() {
        let path = temp_path("climate_rater_test_rows.csv");
        let _ = fs::remove_file(&path);

        let rows = vec![
            row("temperature", "celsius", "2025-01-01", 17.5, Quality::Excellent),
            row("humidity", "%", "2025-01-02", 61.0, Quality::Questionable),
        ];
        write_rows_csv(&path, &rows).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("location_name")).count();
        assert_eq!(header_count, 1);
        assert_eq!(read_rows(content.as_bytes()).unwrap(), rows);

        fs::remove_file(&path).unwrap();
    }
}
