//! Output formatting and persistence for views and cleaned datasets.
//!
//! Supports pretty JSON on stdout or to a file, and CSV export of the
//! cleaned order set.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::CleaningRules;
use crate::record::Order;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Serializes `value` as pretty JSON to `path`, or to stdout when `path` is `None`.
pub fn write_json(path: Option<&Path>, value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    match path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "View written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}

/// Writes cleaned orders as CSV in source form, so the file can be fed back
/// through the cleaner.
pub fn write_cleaned_csv(path: &Path, orders: &[Order], rules: &CleaningRules) -> Result<()> {
    debug!(path = %path.display(), rows = orders.len(), "Writing cleaned CSV");

    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for order in orders {
        writer.serialize(order.to_raw(rules))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = orders.len(), "Cleaned orders written");
    Ok(())
}
