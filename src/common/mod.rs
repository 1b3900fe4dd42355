//! Pieces shared by every data source: filtering, file output and log helpers

mod filter;
mod pipeline;

pub use filter::{check_filter_names, filter_models, filters_block, DataSourceFilter};
pub use pipeline::{dump_output, refresh_list, Refreshed};

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// JSON for log fields; empty when the value cannot be serialized
pub fn marshal_unchecked_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Write a value as pretty-printed JSON, replacing any existing file
pub fn write_to_file<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let content = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote output file {:?}", path);
    Ok(())
}
