/// Offline eye-camera dataset loader.
///
/// Reads `$ILLIXR_DATA/eye0` and `$ILLIXR_DATA/eye1`, builds the
/// timestamp-indexed frame table and reports what it found.
///
/// opencv
/// https://docs.rs/opencv/latest/opencv/all.html
extern crate opencv;

mod config;
mod dataset;
mod error;
mod frame;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use opencv::core::MatTraitConst;

use crate::dataset::TimeIndexedTable;

fn report(table: &TimeIndexedTable) -> anyhow::Result<()> {
    if table.is_empty() {
        log::warn!("dataset has no frames");
        return Ok(());
    }

    for (timestamp, pair) in table {
        log::trace!(
            "{}: eye0={:?} eye1={:?}",
            timestamp,
            pair.eye0.as_ref().map(|h| h.path()),
            pair.eye1.as_ref().map(|h| h.path())
        );
    }
    for timestamp in table.incomplete_timestamps() {
        log::debug!("{} has a single eye", timestamp);
    }

    if let Some((_, pair)) = table.complete_pairs().next() {
        let eye0 = pair.eye0()?.load()?;
        let eye1 = pair.eye1()?.load()?;
        log::info!(
            "first complete pair at {}: eye0 {}x{}, eye1 {}x{}",
            pair.timestamp(),
            eye0.cols(),
            eye0.rows(),
            eye1.cols(),
            eye1.rows()
        );
    }

    let stats = table.stats();
    log::info!(
        "frames: {}, complete: {}, eye0 only: {}, eye1 only: {}, span: {:.3}s",
        stats.frames,
        stats.complete,
        stats.eye0_only,
        stats.eye1_only,
        stats.duration_secs()
    );
    Ok(())
}

fn run() -> anyhow::Result<()> {
    let table = dataset::load_data().context("[offline_eye] failed to load dataset")?;
    report(&table)
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_nanos()
        .parse_default_env()
        .init();

    if let Err(e) = run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
