//! Product store: resolved products, one JSON object per line
//!
//! Older files were written as objects concatenated with no separator. The
//! reader accepts both layouts, so an existing file keeps working and new
//! records are appended as JSON Lines.

use crate::catalog::LookupOutcome;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// A successfully resolved product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub barcode: String,
    pub name: String,
    pub brand: String,
    pub quantity: String,
}

impl ProductRecord {
    /// Build a record from a `Success` outcome; `None` for any other outcome
    pub fn from_outcome(barcode: &str, outcome: &LookupOutcome) -> Option<Self> {
        match outcome {
            LookupOutcome::Success {
                name,
                brand,
                quantity,
            } => Some(Self {
                barcode: barcode.to_string(),
                name: name.clone(),
                brand: brand.clone(),
                quantity: quantity.clone(),
            }),
            _ => None,
        }
    }
}

/// Append-only product file. Repeated scans of one item append repeated records.
#[derive(Debug)]
pub struct ProductStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ProductStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &ProductRecord) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let mut line = String::new();
        if needs_separator(&mut file)? {
            line.push('\n');
        }
        line.push_str(&serde_json::to_string(record)?);
        line.push('\n');

        file.write_all(line.as_bytes())?;
        file.sync_data()?;

        log::debug!("Saved product {} ({})", record.barcode, record.name);
        Ok(())
    }

    /// All readable records in file order
    ///
    /// Reading stops at the first malformed record; what came before it is
    /// returned.
    pub fn records(&self) -> Result<Vec<ProductRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let mut records = Vec::new();
        for record in serde_json::Deserializer::from_str(&content).into_iter::<ProductRecord>() {
            match record {
                Ok(record) => records.push(record),
                Err(e) => {
                    log::warn!(
                        "Stopped reading {} at malformed record: {}",
                        self.path.display(),
                        e
                    );
                    break;
                }
            }
        }
        Ok(records)
    }
}

/// A legacy file may end right after a `}`; start the next record on a new line
fn needs_separator(file: &mut std::fs::File) -> Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;
