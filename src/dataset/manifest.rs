use std::path::Path;

use super::Timestamp;
use crate::error::{LoaderError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRow {
    pub timestamp: Timestamp,
    /// relative to the stream's `data/` directory
    pub filename: String,
}

/// Reads a `timestamp,filename[,...]` manifest. The first line is a header.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| LoaderError::ManifestUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    reader
        .records()
        .map(|record| -> Result<ManifestRow> {
            let record = record.map_err(|e| {
                // opened but unreadable, e.g. a directory
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    return LoaderError::ManifestUnreadable {
                        path: path.to_path_buf(),
                        source: e,
                    };
                }
                LoaderError::ManifestRow {
                    path: path.to_path_buf(),
                    line: e.position().map(|p| p.line()).unwrap_or_default(),
                    reason: e.to_string(),
                }
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let row_error = |reason: String| LoaderError::ManifestRow {
                path: path.to_path_buf(),
                line,
                reason,
            };

            let timestamp = record
                .get(0)
                .ok_or_else(|| row_error("missing timestamp".to_string()))?;
            let timestamp = timestamp
                .parse::<Timestamp>()
                .map_err(|e| row_error(format!("bad timestamp {:?}: {}", timestamp, e)))?;
            let filename = match record.get(1) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => return Err(row_error("missing filename".to_string())),
            };
            Ok(ManifestRow {
                timestamp,
                filename,
            })
        })
        .collect()
}
