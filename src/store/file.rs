//! CSV file backend for the session table.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::schema;
use crate::table::{Table, Value};

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw table from disk. A missing file is first created with
    /// the canonical header row and an empty body. Cells come back as text;
    /// an empty cell is an empty string, never a null marker. Ragged rows
    /// are padded or truncated to the header width.
    pub fn load_raw(&mut self) -> Result<Table> {
        if !self.path.exists() {
            let empty = Table::new(schema::canonical_headers());
            self.store(&empty)?;
            return Ok(empty);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("opening session table at {}", self.path.display()))?;

        let mut records = reader.records();
        let Some(header) = records.next() else {
            // Header row missing entirely; the normalizer rebuilds it.
            return Ok(Table::new(Vec::new()));
        };
        let header =
            header.with_context(|| format!("reading header of {}", self.path.display()))?;

        let mut table = Table::new(header.iter().map(str::to_string).collect());
        for record in records {
            let record =
                record.with_context(|| format!("reading row of {}", self.path.display()))?;
            table.push_row(record.iter().map(Value::text).collect());
        }
        Ok(table)
    }

    /// Rewrite the file in full with the given table.
    pub fn store(&mut self, table: &Table) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating data directory {}", parent.display()))?;
        }

        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("writing session table at {}", self.path.display()))?;
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(Value::to_field))?;
        }
        writer
            .flush()
            .with_context(|| format!("flushing session table at {}", self.path.display()))?;
        Ok(())
    }
}
