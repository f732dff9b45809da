//! Export of the saved files to a user-visible location

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Export name of the response ledger
pub const EXPORTED_LEDGER_FILE: &str = "barcode_scanner_api_responses.json";

/// Export name of the product store
pub const EXPORTED_PRODUCTS_FILE: &str = "barcode_scanner_products.json";

/// Files written by an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub destination: PathBuf,
    pub copied: Vec<PathBuf>,
}

/// Copy the ledger and product store verbatim into `destination`
///
/// Existing exports are overwritten. A source that does not exist yet is
/// skipped.
pub fn export_files(ledger: &Path, products: &Path, destination: &Path) -> Result<ExportReport> {
    std::fs::create_dir_all(destination)?;

    let mut copied = Vec::new();
    for (source, name) in [
        (ledger, EXPORTED_LEDGER_FILE),
        (products, EXPORTED_PRODUCTS_FILE),
    ] {
        if !source.exists() {
            log::debug!("Nothing to export at {}", source.display());
            continue;
        }
        let target = destination.join(name);
        std::fs::copy(source, &target)?;
        log::info!("Exported {} to {}", source.display(), target.display());
        copied.push(target);
    }

    Ok(ExportReport {
        destination: destination.to_path_buf(),
        copied,
    })
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
