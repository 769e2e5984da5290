//! Accuracy value object (0-100 percentage scale).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Extractor accuracy for one document, as a percentage.
///
/// Accuracy is the fraction of extracted attributes that required no human
/// correction. Always within `[0.0, 100.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Accuracy(f64);

impl Accuracy {
    /// Zero percent.
    pub const ZERO: Self = Self(0.0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100.0);

    /// Creates a new Accuracy, clamping to the valid range.
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 100.0))
    }

    /// Derives accuracy from an extracted-attribute count and the number of
    /// human corrections (add + edit + delete).
    ///
    /// Zero extracted attributes yields exactly 0 rather than an error:
    /// division by zero must never propagate out of the aggregation step.
    pub fn from_counts(extracted: u64, corrections: u64) -> Self {
        if extracted == 0 {
            return Self::ZERO;
        }
        Self::new((1.0 - corrections as f64 / extracted as f64) * 100.0)
    }

    /// Returns the percentage as f64.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Accuracy {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}
