//! Lookup service: fetch, record, then report
//!
//! The ledger write for an attempt happens before the outcome is handed back,
//! so a crash between the response and the display never loses the record.
//! Storage failures are logged and otherwise ignored; they never hold back
//! the result.

use crate::catalog::{CatalogClient, LookupAttempt, LookupOutcome};
use crate::config::Config;
use crate::error::Result;
use crate::ledger::{LedgerEntry, ResponseLedger};
use crate::products::{ProductRecord, ProductStore};

pub struct LookupService {
    catalog: CatalogClient,
    ledger: ResponseLedger,
    products: ProductStore,
}

impl LookupService {
    pub fn new(catalog: CatalogClient, ledger: ResponseLedger, products: ProductStore) -> Self {
        Self {
            catalog,
            ledger,
            products,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            CatalogClient::from_config(config)?,
            ResponseLedger::new(config.ledger_path()),
            ProductStore::new(config.products_path()),
        ))
    }

    /// Look up a barcode and persist the attempt
    pub async fn lookup(&self, barcode: &str) -> LookupOutcome {
        let attempt = self.catalog.fetch(barcode).await;
        log::info!("Lookup for {}: {}", barcode, attempt.outcome.kind());
        if let LookupOutcome::NetworkError { message } = &attempt.outcome {
            log::warn!("Network error looking up {}: {}", barcode, message);
        }

        self.record(&attempt);
        attempt.outcome
    }

    fn record(&self, attempt: &LookupAttempt) {
        let entry = LedgerEntry::new(attempt.barcode.clone(), attempt.api_response.clone());
        if let Err(e) = self.ledger.append(entry) {
            log::warn!(
                "Failed to record API response for {}: {}",
                attempt.barcode,
                e
            );
        }

        if let Some(record) = ProductRecord::from_outcome(&attempt.barcode, &attempt.outcome) {
            if let Err(e) = self.products.append(&record) {
                log::warn!("Failed to save product {}: {}", attempt.barcode, e);
            }
        }
    }

    pub fn ledger(&self) -> &ResponseLedger {
        &self.ledger
    }

    pub fn products(&self) -> &ProductStore {
        &self.products
    }
}

#[cfg(test)]
#[path = "lookup_tests.rs"]
mod tests;
