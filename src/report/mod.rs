//! # Report Module
//!
//! Row-oriented CSV sink for the inventory scanners. The sink takes a fixed
//! header list up front, collects rows, creates the output directory if it
//! is absent, and overwrites any existing file of the same name.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct CsvReport {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvReport {
    pub fn new(headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(
            row.len(),
            self.headers.len(),
            "row width must match header width"
        );
        self.rows.push(row);
    }

    pub fn extend_rows(&mut self, rows: impl IntoIterator<Item = Vec<String>>) {
        for row in rows {
            self.push_row(row);
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the report to `output_dir/file_name`, creating the directory
    /// and replacing any previous report.
    pub fn write_to(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(file_name);

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        log::info!("wrote {} records to {}", self.rows.len(), path.display());
        Ok(path)
    }
}
