//! Open Food Facts catalog client
//!
//! Fetches a product by barcode and classifies the result into exactly one
//! [`LookupOutcome`]. Nothing here fails: transport problems are outcomes too.
//! Each attempt also carries the JSON payload to record in the ledger, either
//! the catalog's raw document or a synthesized error object.

use crate::config::Config;
use crate::error::Result;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Result of one catalog lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Product found; absent fields are empty strings
    Success {
        name: String,
        brand: String,
        quantity: String,
    },
    /// Well-formed response for a barcode the catalog does not know
    NotFound,
    /// Non-2xx status
    HttpError { code: u16 },
    /// 2xx with an empty body
    EmptyBody,
    /// Transport failure or unparseable body
    NetworkError { message: String },
}

impl LookupOutcome {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            LookupOutcome::Success { .. } => "success",
            LookupOutcome::NotFound => "not_found",
            LookupOutcome::HttpError { .. } => "http_error",
            LookupOutcome::EmptyBody => "empty_body",
            LookupOutcome::NetworkError { .. } => "network_error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success { .. })
    }
}

/// A classified lookup plus the payload to record for it
#[derive(Debug, Clone, PartialEq)]
pub struct LookupAttempt {
    pub barcode: String,
    pub outcome: LookupOutcome,
    pub api_response: Value,
}

impl LookupAttempt {
    fn failed(barcode: &str, outcome: LookupOutcome, error: String) -> Self {
        Self {
            barcode: barcode.to_string(),
            outcome,
            api_response: json!({ "error": error, "barcode": barcode }),
        }
    }

    fn http_error(barcode: &str, code: u16) -> Self {
        Self::failed(
            barcode,
            LookupOutcome::HttpError { code },
            format!("HTTP {}", code),
        )
    }

    fn empty_body(barcode: &str) -> Self {
        Self::failed(barcode, LookupOutcome::EmptyBody, "Empty response".to_string())
    }

    fn network_error(barcode: &str, message: String) -> Self {
        let error = format!("Network error: {}", message);
        Self::failed(barcode, LookupOutcome::NetworkError { message }, error)
    }
}

/// HTTP client for the product endpoint
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a client for the catalog at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        log::debug!("Catalog client for {}", base_url);
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.catalog_url.clone(),
            config.request_timeout,
            &config.user_agent,
        )
    }

    /// Product endpoint for a barcode
    pub fn product_url(&self, barcode: &str) -> String {
        format!(
            "{}/api/v2/product/{}.json",
            self.base_url,
            urlencoding::encode(barcode)
        )
    }

    /// Look up a barcode. One request, no retry.
    pub async fn fetch(&self, barcode: &str) -> LookupAttempt {
        let url = self.product_url(barcode);
        log::debug!("Fetching product from catalog: {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return LookupAttempt::network_error(barcode, e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return LookupAttempt::http_error(barcode, status.as_u16());
        }

        match response.text().await {
            Ok(body) => classify_body(barcode, &body),
            Err(e) => LookupAttempt::network_error(barcode, e.to_string()),
        }
    }
}

/// Classify a 2xx response body
pub fn classify_body(barcode: &str, body: &str) -> LookupAttempt {
    if body.is_empty() {
        return LookupAttempt::empty_body(barcode);
    }

    let document: Value = match serde_json::from_str(body) {
        Ok(document) => document,
        Err(e) => return LookupAttempt::network_error(barcode, e.to_string()),
    };
    if !document.is_object() {
        return LookupAttempt::network_error(
            barcode,
            "response body is not a JSON object".to_string(),
        );
    }

    let outcome = if is_found(&document) {
        let product = document.get("product").and_then(Value::as_object);
        LookupOutcome::Success {
            name: text_field(product, "product_name"),
            brand: text_field(product, "brands"),
            quantity: text_field(product, "quantity"),
        }
    } else {
        LookupOutcome::NotFound
    };

    LookupAttempt {
        barcode: barcode.to_string(),
        outcome,
        api_response: document,
    }
}

/// `status` is `"success"` in API v2 and `1` in the legacy form
fn is_found(document: &Value) -> bool {
    match document.get("status") {
        Some(Value::String(status)) => status == "success" || status.trim() == "1",
        Some(Value::Number(status)) => status.as_f64().is_some_and(|n| n.trunc() == 1.0),
        _ => false,
    }
}

fn text_field(product: Option<&Map<String, Value>>, key: &str) -> String {
    match product.and_then(|p| p.get(key)) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
