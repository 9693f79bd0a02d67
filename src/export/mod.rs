//! File exports of dashboard data
//!
//! CSV writers take any `io::Write` and readers any `io::Read`; the
//! CLI opens files through [`create_export_file`].

pub mod csv_export;

pub use csv_export::{
    read_funnel_csv, read_step_counts_csv, write_funnel_csv, write_insights_csv,
};

use crate::errors::AppResult;
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// `<dir>/<funnel_id>_<kind>_<YYYYmmdd_HHMMSS>.csv`
pub fn export_file_path(dir: &Path, funnel_id: &str, kind: &str, at: DateTime<Utc>) -> PathBuf {
    dir.join(format!(
        "{}_{}_{}.csv",
        funnel_id,
        kind,
        at.format("%Y%m%d_%H%M%S")
    ))
}

/// Create parent directories and open `path` for buffered writing
pub fn create_export_file(path: &Path) -> AppResult<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    info!("Writing export to {}", path.display());
    Ok(BufWriter::new(file))
}
