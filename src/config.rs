//! Runtime configuration: storage paths and catalog endpoint

use std::path::PathBuf;
use std::time::Duration;

/// Open Food Facts production host
pub const DEFAULT_CATALOG_URL: &str = "https://world.openfoodfacts.org";

/// File name of the response ledger inside the data directory
pub const LEDGER_FILE: &str = "api_responses.json";

/// File name of the product store inside the data directory
pub const PRODUCTS_FILE: &str = "products.json";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Scanner configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the ledger and product store
    pub data_dir: PathBuf,
    /// Catalog base URL, without trailing slash
    pub catalog_url: String,
    /// Per-request timeout; expiry counts as a transport failure
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Export destination; `None` means the platform downloads directory
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("barcode_scanner/", env!("CARGO_PKG_VERSION")).to_string(),
            export_dir: None,
        }
    }
}

impl Config {
    /// Path of the response ledger
    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(LEDGER_FILE)
    }

    /// Path of the product store
    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join(PRODUCTS_FILE)
    }

    /// Resolve the export destination
    pub fn export_dir(&self) -> Option<PathBuf> {
        self.export_dir.clone().or_else(dirs::download_dir)
    }
}

/// Returns the default data directory: ~/.local/share/barcode_scanner
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("barcode_scanner")
}
