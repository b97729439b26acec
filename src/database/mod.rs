//! The board database: a JSON array of extracted records.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::extract::ExtractedRecord;


/// Directory, under the output directory, holding the database.
pub const DB_DIR: &str = "board";
/// Database file name.
pub const DB_FILE: &str = "board.json";

/// Records in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Database {
    records: Vec<ExtractedRecord>,
}

/// Files a documentation build must publish alongside the pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// The written database file.
    pub database: PathBuf,
    /// Files copied as-is to the output root.
    pub extra_paths: Vec<PathBuf>,
    /// Directories merged into the static asset directory.
    pub static_paths: Vec<PathBuf>,
}

impl Database {
    pub fn new(records: Vec<ExtractedRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ExtractedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record with the given `CONFIG_` name.
    pub fn find(&self, name: &str) -> Option<&ExtractedRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Write `<outdir>/board/board.json`, creating the directory.
    pub fn write(&self, outdir: &Path) -> Result<PathBuf> {
        let dir = outdir.join(DB_DIR);
        std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        let path = dir.join(DB_FILE);
        std::fs::write(&path, self.to_json()?).map_err(|e| Error::io(&path, e))?;
        info!("wrote {} records to {}", self.records.len(), path.display());
        Ok(path)
    }

    /// Write the database and list what the build has to publish: the
    /// database file and the widget's static assets.
    pub fn publish(&self, outdir: &Path, static_dir: &Path) -> Result<Publication> {
        let database = self.write(outdir)?;
        Ok(Publication {
            extra_paths: vec![database.clone()],
            static_paths: vec![static_dir.to_path_buf()],
            database,
        })
    }
}
