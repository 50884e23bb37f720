//! Content classifier for program files taken from C64 disk images.
//!
//! A file is first screened by byte entropy; anything that looks like a
//! packed or encrypted payload is reported as [`ClassificationResult::Compressed`].
//! Otherwise the bytes are decoded under every candidate [`Encoding`] and the
//! decoding with the highest share of alphabetic characters wins.

use crate::core::charset::Encoding;
use serde::{Deserialize, Serialize};

/// Entropy (bits per byte) above which content is treated as compressed.
pub const ENTROPY_LIMIT: f64 = 7.0;

pub const COMPRESSED_MARKER: &str = "Compressed file";
pub const CODE_MARKER: &str = "Code";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationResult {
    Compressed,
    /// No decoding reached the threshold; `encoding` is the best candidate.
    Code { encoding: Encoding },
    Text { content: String, encoding: Encoding },
}

impl ClassificationResult {
    pub fn encoding(&self) -> Option<Encoding> {
        match self {
            ClassificationResult::Compressed => None,
            ClassificationResult::Code { encoding }
            | ClassificationResult::Text { encoding, .. } => Some(*encoding),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ClassificationResult::Text { .. })
    }

    /// The form written to output files: a marker, or the decoded text.
    pub fn render(&self) -> String {
        match self {
            ClassificationResult::Compressed => COMPRESSED_MARKER.to_string(),
            ClassificationResult::Code { .. } => CODE_MARKER.to_string(),
            ClassificationResult::Text { content, .. } => content.clone(),
        }
    }
}

/// Shannon entropy in bits over the observed byte histogram.
pub fn shannon_entropy(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }

    let mut counts = [0usize; 256];
    for &b in bytes {
        counts[b as usize] += 1;
    }

    let total = bytes.len() as f64;
    let entropy: f64 = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum();
    // a single symbol sums to -0.0
    entropy.max(0.0)
}

/// Share of alphabetic characters in `text`; 0.0 when empty.
pub fn alpha_density(text: &str) -> f64 {
    let (alpha, total) = text
        .chars()
        .fold((0usize, 0usize), |(alpha, total), c| {
            (alpha + usize::from(c.is_alphabetic()), total + 1)
        });
    if total == 0 {
        return 0.0;
    }
    alpha as f64 / total as f64
}

/// Classify `bytes` as compressed, code, or text.
///
/// `threshold` is the minimum alphabetic density for text; a density equal
/// to the threshold counts as text. Empty input is always `Code` with the
/// first encoding, since there is nothing to decode.
pub fn classify(bytes: &[u8], threshold: f64) -> ClassificationResult {
    if bytes.is_empty() {
        return ClassificationResult::Code {
            encoding: Encoding::ALL[0],
        };
    }

    if shannon_entropy(bytes) > ENTROPY_LIMIT {
        return ClassificationResult::Compressed;
    }

    let mut best: Option<(Encoding, String, f64)> = None;
    for encoding in Encoding::ALL {
        let decoded = encoding.decode(bytes);
        let density = alpha_density(&decoded);
        // strictly greater keeps the earliest encoding on ties
        if best.as_ref().map_or(true, |(_, _, d)| density > *d) {
            best = Some((encoding, decoded, density));
        }
    }

    match best {
        Some((encoding, content, density)) if density >= threshold => {
            ClassificationResult::Text { content, encoding }
        }
        Some((encoding, _, _)) => ClassificationResult::Code { encoding },
        None => ClassificationResult::Code {
            encoding: Encoding::ALL[0],
        },
    }
}

/// Per-outcome counts over a batch of classifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub text: usize,
    pub code: usize,
    pub compressed: usize,
}

impl ClassificationSummary {
    pub fn record(&mut self, result: &ClassificationResult) {
        match result {
            ClassificationResult::Compressed => self.compressed += 1,
            ClassificationResult::Code { .. } => self.code += 1,
            ClassificationResult::Text { .. } => self.text += 1,
        }
    }
}
