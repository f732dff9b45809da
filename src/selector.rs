//! Candidate selection: which decoded value to act on

use crate::decode::Candidate;

/// Pick the barcode value for one frame
///
/// The first purely numeric candidate wins, so QR/text payloads picked up
/// alongside a retail barcode are ignored. Without any numeric candidate the
/// first candidate is used. `None` for an empty list.
pub fn select(candidates: &[Candidate]) -> Option<&str> {
    candidates
        .iter()
        .find(|c| c.is_numeric())
        .or_else(|| candidates.first())
        .map(Candidate::value)
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
