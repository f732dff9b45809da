//! Result sink contract and display strings

use crate::catalog::LookupOutcome;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Shown after a reset
pub const READY_TEXT: &str = "Ready to scan...";

/// Receiver of plain-text status updates (the UI)
pub trait ResultSink: Send + Sync {
    fn show(&self, text: &str);
}

/// Prints every update to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ResultSink for StdoutSink {
    fn show(&self, text: &str) {
        println!("{}", text);
    }
}

/// Keeps every update in memory; the last one is what is "on screen"
#[derive(Debug, Default)]
pub struct MemorySink {
    shown: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<String> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn history(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ResultSink for MemorySink {
    fn show(&self, text: &str) {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
    }
}

/// Text shown as soon as a barcode is accepted
pub fn detected_text(barcode: &str) -> String {
    barcode.to_string()
}

/// Text shown once the lookup completed
pub fn resolved_text(barcode: &str, outcome: &LookupOutcome) -> String {
    format!("{}\n{}", barcode, resolution_text(outcome))
}

/// Human-readable summary of an outcome
pub fn resolution_text(outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Success {
            name,
            brand,
            quantity,
        } => {
            let parts: Vec<&str> = [name, brand, quantity]
                .into_iter()
                .map(String::as_str)
                .filter(|part| !part.trim().is_empty())
                .collect();
            if parts.is_empty() {
                "Product found (no name)".to_string()
            } else {
                parts.join(" • ")
            }
        }
        LookupOutcome::NotFound => "Not found on Open Food Facts".to_string(),
        LookupOutcome::HttpError { code } => format!("Error {}", code),
        LookupOutcome::EmptyBody => "Empty response".to_string(),
        LookupOutcome::NetworkError { .. } => "Network error".to_string(),
    }
}

/// Dump of both saved files, as shown by the "view files" action
pub fn saved_files_report(ledger_path: &Path, products_path: &Path) -> String {
    let api_content = std::fs::read_to_string(ledger_path)
        .unwrap_or_else(|_| "No API responses saved yet".to_string());
    let products_content = std::fs::read_to_string(products_path)
        .unwrap_or_else(|_| "No products saved yet".to_string());

    format!(
        "=== API RESPONSES ===\n{}\n\n=== PRODUCTS ===\n{}",
        api_content, products_content
    )
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
