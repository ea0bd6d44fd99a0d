// src/output/writer.rs
//! Serializes a database snapshot as the JSON output artifact.

use crate::error::AppError;
use crate::model::DatabaseSnapshot;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// Writes `snapshot` to `path` as one JSON document, creating parent
/// directories as needed. Returns the number of bytes written.
pub fn write_database(path: &Path, snapshot: &DatabaseSnapshot) -> Result<usize, AppError> {
    let start = Instant::now();
    let encoded = serde_json::to_vec(snapshot)?;
    log::debug!("Writing {} bytes to {}", encoded.len(), path.display());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = BufWriter::new(fs::File::create(path)?);
    file.write_all(&encoded)?;
    file.write_all(b"\n")?;
    file.flush()?;

    log::info!(
        "Wrote database to {} in {}ms",
        path.display(),
        start.elapsed().as_millis()
    );
    Ok(encoded.len() + 1)
}
