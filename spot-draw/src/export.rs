// CSV export of the spot table.
//
// Output is one header row followed by one row per spot in ascending order.
// Quoting follows the csv crate's "necessary" style: fields containing the
// delimiter, a quote or a line break are quoted and embedded quotes doubled.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::draw::session::SpotRow;

/// Header row of the exported table.
pub const HEADER: [&str; 2] = ["Spot #", "Name"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    spot: u32,
    name: &'a str,
}

/// Render spot rows as CSV text. Unclaimed spots get an empty name field.
pub fn render_csv(rows: &[SpotRow]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for row in rows {
        writer.serialize(CsvRow {
            spot: row.spot,
            name: row.name.as_deref().unwrap_or(""),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
}

/// File name for an export of `total_spots` spots.
pub fn file_name(total_spots: u32) -> String {
    format!("spots-{total_spots}.csv")
}

/// Write `csv` into `dir` (created if missing) and return the full path.
pub fn write_csv(dir: &Path, total_spots: u32, csv: &str) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let path = dir.join(file_name(total_spots));
    std::fs::write(&path, csv).map_err(|e| ExportError::Io {
        path: path.clone(),
        source: e,
    })?;
    info!("Exported {} spot(s) to {}", total_spots, path.display());
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
