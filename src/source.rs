//! Loading the raw order dataset from disk or over HTTP.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::{debug, info};

use crate::error::CleanError;
use crate::record::{REQUIRED_COLUMNS, RawOrder};

/// Loads dataset bytes from a local file path or fetches them over HTTP.
/// Sources ending in `.gz` are decompressed.
#[tracing::instrument]
pub fn load_bytes(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(source)?
    } else {
        std::fs::read(source).with_context(|| format!("Failed to read dataset: {source}"))?
    };
    debug!(bytes = bytes.len(), "Dataset bytes loaded");

    if source.ends_with(".gz") {
        let mut decoded = Vec::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_end(&mut decoded)
            .with_context(|| format!("Failed to decompress dataset: {source}"))?;
        debug!(bytes = decoded.len(), "Dataset decompressed");
        return Ok(decoded);
    }

    Ok(bytes)
}

fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}

/// Parses delimited text into raw rows, lower-casing and trimming the header
/// names first. Fails if any required column is absent.
pub fn read_raw_orders(bytes: &[u8]) -> Result<Vec<RawOrder>, CleanError> {
    let mut rdr = ReaderBuilder::new().from_reader(bytes);

    let normalized: StringRecord = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    for column in REQUIRED_COLUMNS {
        if !normalized.iter().any(|h| h == *column) {
            return Err(CleanError::MissingColumn(column.to_string()));
        }
    }
    rdr.set_headers(normalized);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: RawOrder = result?;
        rows.push(row);
    }

    Ok(rows)
}

/// Loads and parses the dataset at `source` in one step.
pub fn load_raw_orders(source: &str) -> Result<Vec<RawOrder>> {
    let bytes = load_bytes(source)?;
    let rows = read_raw_orders(&bytes)?;
    info!(source, rows = rows.len(), "Raw orders loaded");
    Ok(rows)
}
