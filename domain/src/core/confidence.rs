//! Confidence value object
//!
//! Every insight and every synthesis carries a [`Confidence`]. The type
//! clamps on every construction path (including deserialization) so that no
//! value above [`CONFIDENCE_CEILING`] can ever exist.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for any confidence value (inverse golden ratio).
pub const CONFIDENCE_CEILING: f64 = 0.618;

/// Confidence reported when engines disagree and no numeric reduction applies.
pub const UNRESOLVED_CONFIDENCE: f64 = 0.382;

/// A confidence score in `[0.0, CONFIDENCE_CEILING]`
///
/// # Example
///
/// ```
/// use council_domain::Confidence;
///
/// assert_eq!(Confidence::new(0.9).value(), 0.618);
/// assert_eq!(Confidence::new(-1.0).value(), 0.0);
/// assert_eq!(Confidence::new(0.4).value(), 0.4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Zero confidence
    pub const ZERO: Confidence = Confidence(0.0);

    /// The ceiling itself
    pub const CEILING: Confidence = Confidence(CONFIDENCE_CEILING);

    /// Fixed confidence for unresolved disagreement
    pub const UNRESOLVED: Confidence = Confidence(UNRESOLVED_CONFIDENCE);

    /// Create a confidence, clamping into `[0.0, CONFIDENCE_CEILING]`.
    ///
    /// `NaN` collapses to zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, CONFIDENCE_CEILING))
    }

    /// Arithmetic mean of the given values, clamped. Empty input yields zero.
    pub fn mean<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Confidence>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), c| (sum + c.0, count + 1));
        if count == 0 {
            Self::ZERO
        } else {
            Self::new(sum / count as f64)
        }
    }

    /// Raw value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether this value sits exactly at the ceiling
    pub fn is_at_ceiling(&self) -> bool {
        self.0 >= CONFIDENCE_CEILING
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Confidence::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_to_ceiling() {
        assert_eq!(Confidence::new(0.7).value(), CONFIDENCE_CEILING);
        assert_eq!(Confidence::new(1.0).value(), CONFIDENCE_CEILING);
        assert!(Confidence::new(5.0).is_at_ceiling());
    }

    #[test]
    fn test_clamps_negative_and_nan() {
        assert_eq!(Confidence::new(-0.2).value(), 0.0);
        assert_eq!(Confidence::new(f64::NAN).value(), 0.0);
    }

    #[test]
    fn test_mean() {
        let mean = Confidence::mean([Confidence::new(0.4), Confidence::new(0.6)]);
        assert!((mean.value() - 0.5).abs() < 1e-9);
        assert_eq!(Confidence::mean(Vec::new()), Confidence::ZERO);
    }

    #[test]
    fn test_deserialize_clamps() {
        let c: Confidence = serde_json::from_str("0.99").unwrap();
        assert_eq!(c.value(), CONFIDENCE_CEILING);
        assert_eq!(serde_json::to_string(&Confidence::new(0.25)).unwrap(), "0.25");
    }

    #[test]
    fn test_display() {
        assert_eq!(Confidence::new(0.5).to_string(), "0.500");
    }
}
