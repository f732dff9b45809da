//! Response ledger: every catalog interaction, in call order
//!
//! Stored as one pretty-printed JSON document:
//!
//! ```json
//! { "responses": [ { "barcode": "...", "timestamp": 1700000000000, "api_response": { ... } } ] }
//! ```
//!
//! Each append reads the document, pushes one entry and rewrites the file.
//! The rewrite goes through a temporary file and a rename so a crash leaves
//! either the old or the new document, never a torn one.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// One recorded lookup attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub barcode: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Raw catalog document or synthesized error object
    pub api_response: Value,
}

impl LedgerEntry {
    /// Entry stamped with the current time
    pub fn new(barcode: impl Into<String>, api_response: Value) -> Self {
        Self {
            barcode: barcode.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            api_response,
        }
    }
}

/// On-disk layout. Entries are kept as plain JSON so that a record this
/// version cannot parse is still carried over on rewrite.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerDocument {
    #[serde(default)]
    responses: Vec<Value>,
}

/// Append-only ledger file
#[derive(Debug)]
pub struct ResponseLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ResponseLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an entry and return it as stored
    ///
    /// The timestamp is raised to the previous entry's if the clock went
    /// backwards, keeping timestamps non-decreasing in file order.
    pub fn append(&self, mut entry: LedgerEntry) -> Result<LedgerEntry> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut document = self.load_document()?;
        let last_timestamp = document
            .responses
            .last()
            .and_then(|last| last.get("timestamp"))
            .and_then(Value::as_i64);
        if let Some(last) = last_timestamp {
            entry.timestamp = entry.timestamp.max(last);
        }

        document.responses.push(serde_json::to_value(&entry)?);
        self.write_document(&document)?;

        log::debug!(
            "Recorded API response for {} ({} entries)",
            entry.barcode,
            document.responses.len()
        );
        Ok(entry)
    }

    /// All entries in append order. Records that do not match the entry
    /// shape are skipped.
    ///
    /// Takes the write lock: reading a corrupt ledger moves it aside, which
    /// must not interleave with an append.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>> {
        let document = {
            let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.load_document()?
        };
        Ok(document
            .responses
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable ledger entry: {}", e);
                    None
                }
            })
            .collect())
    }

    fn load_document(&self) -> Result<LedgerDocument> {
        if !self.path.exists() {
            return Ok(LedgerDocument::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(LedgerDocument::default());
        }

        match serde_json::from_str::<LedgerDocument>(&content) {
            Ok(document) => Ok(document),
            Err(e) => {
                let quarantine = self.quarantine()?;
                log::warn!(
                    "Ledger {} is corrupt ({}), moved to {} and starting fresh",
                    self.path.display(),
                    e,
                    quarantine.display()
                );
                Ok(LedgerDocument::default())
            }
        }
    }

    /// Move an unreadable ledger aside instead of overwriting it
    fn quarantine(&self) -> Result<PathBuf> {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(
            ".corrupt-{}",
            chrono::Utc::now().timestamp_millis()
        ));
        let target = PathBuf::from(name);
        std::fs::rename(&self.path, &target)?;
        Ok(target)
    }

    fn write_document(&self, document: &LedgerDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let content = serde_json::to_string_pretty(document)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
