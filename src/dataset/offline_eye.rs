use std::sync::Arc;

use super::{read_manifest, Stream, TimeIndexedTable};
use crate::config::{LoaderConfig, IMAGE_DIR, MANIFEST_FILE};
use crate::error::{LoaderError, Result};
use crate::frame::{FrameHandle, ImageDecoder, OpenCvDecoder};

/// Builds the table from `$ILLIXR_DATA` with OpenCV decoding.
pub fn load_data() -> Result<TimeIndexedTable> {
    load_data_from(|key| std::env::var(key).ok(), Arc::new(OpenCvDecoder))
}

/// Resolves the config through `lookup` first, so a missing root fails
/// before any manifest is opened.
pub fn load_data_from<F>(lookup: F, decoder: Arc<dyn ImageDecoder>) -> Result<TimeIndexedTable>
where
    F: Fn(&str) -> Option<String>,
{
    let config = LoaderConfig::from_lookup(lookup)?;
    load_data_with(&config, decoder)
}

/// Reads `eye0/data.csv` and `eye1/data.csv` under `config.root` and merges
/// them by timestamp. Any error aborts the whole build.
pub fn load_data_with(
    config: &LoaderConfig,
    decoder: Arc<dyn ImageDecoder>,
) -> Result<TimeIndexedTable> {
    log::info!(
        "[offline_eye] loading {:?} ({} mode)",
        config.root,
        config.mode
    );
    let mut table = TimeIndexedTable::new();

    for stream in Stream::ALL {
        let stream_dir = config.root.join(stream.name());
        let manifest_path = stream_dir.join(MANIFEST_FILE);
        let image_dir = stream_dir.join(IMAGE_DIR);

        let rows = read_manifest(&manifest_path)?;
        log::debug!("[offline_eye] {}: {} rows", stream, rows.len());

        for row in rows {
            let handle = FrameHandle::new(image_dir.join(&row.filename), config.mode, &decoder)?;
            if let Some(old) = table.insert(row.timestamp, stream, handle) {
                log::warn!(
                    "[offline_eye] {} timestamp {} listed twice, {:?} replaces {:?}",
                    stream,
                    row.timestamp,
                    row.filename,
                    old.path()
                );
            }
        }
    }

    let stats = table.stats();
    if stats.eye0_only + stats.eye1_only > 0 {
        if config.require_complete {
            if let Some((timestamp, pair)) = table.iter().find(|(_, pair)| !pair.is_complete()) {
                if let Some(missing) = pair.missing() {
                    return Err(LoaderError::IncompletePair { timestamp, missing });
                }
            }
        }
        log::warn!(
            "[offline_eye] {} timestamps only in eye0, {} only in eye1",
            stats.eye0_only,
            stats.eye1_only
        );
    }
    log::info!(
        "[offline_eye] {} frames, {} complete pairs, {:.3}s",
        stats.frames,
        stats.complete,
        stats.duration_secs()
    );

    Ok(table)
}
