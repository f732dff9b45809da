//! Decode primitive seam and barcode candidates

use crate::error::{Result, ScanError};
use crate::frame::ImageBuffer;

/// A raw value reported by the decode primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    value: String,
    numeric: bool,
}

impl Candidate {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let numeric = !value.is_empty() && value.chars().all(|c| c.is_ascii_digit());
        Self { value, numeric }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// True when every character is a decimal digit (retail barcodes)
    pub fn is_numeric(&self) -> bool {
        self.numeric
    }
}

/// On-device barcode decoder
///
/// Runs on the analysis lane and must not block on I/O. Errors are treated
/// by the pipeline as "no candidates".
pub trait Detector: Send + Sync {
    fn detect(&self, image: &ImageBuffer, rotation_degrees: u16) -> Result<Vec<Candidate>>;
}

/// Detector for frames whose payload is already text
///
/// The image bytes are read as UTF-8 and split on commas and whitespace; each
/// non-empty token is a candidate. Used by the terminal front-end, where a
/// "frame" is a line of input.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextFrameDetector;

impl Detector for TextFrameDetector {
    fn detect(&self, image: &ImageBuffer, _rotation_degrees: u16) -> Result<Vec<Candidate>> {
        let text = std::str::from_utf8(&image.data)
            .map_err(|e| ScanError::Decode(format!("frame payload is not UTF-8: {}", e)))?;
        Ok(text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(Candidate::new)
            .collect())
    }
}

/// Wrap a line of text as an image buffer for [`TextFrameDetector`]
pub fn text_image(text: &str) -> ImageBuffer {
    let data = text.as_bytes().to_vec();
    ImageBuffer::new(data.len() as u32, 1, data)
}

#[cfg(test)]
#[path = "decode_tests.rs"]
mod tests;
