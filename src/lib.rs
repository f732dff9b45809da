//! Barcode Scanner - scan-to-lookup pipeline
//!
//! Turns a stream of camera frames into one barcode per scanned item, looks
//! the barcode up on Open Food Facts and records every API response before
//! showing the result.

pub mod catalog;
pub mod config;
pub mod debouncer;
pub mod decode;
pub mod display;
pub mod error;
pub mod export;
pub mod frame;
pub mod gate;
pub mod lane;
pub mod ledger;
pub mod lookup;
pub mod pipeline;
pub mod products;
pub mod selector;

pub use catalog::{CatalogClient, LookupOutcome};
pub use config::Config;
pub use debouncer::{ScanDebouncer, ScanState};
pub use decode::{Candidate, Detector, TextFrameDetector};
pub use display::{MemorySink, ResultSink, StdoutSink};
pub use error::{Result, ScanError};
pub use frame::{Frame, FramePool, ImageBuffer};
pub use lane::AnalysisLane;
pub use ledger::{LedgerEntry, ResponseLedger};
pub use lookup::LookupService;
pub use pipeline::{FrameOutcome, ScanPipeline};
pub use products::{ProductRecord, ProductStore};
