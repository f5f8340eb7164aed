//! Trust score module

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scores at or above this value mark a claim as verified.
///
/// Fixed; not configurable.
pub const VERIFICATION_THRESHOLD: f64 = 70.0;

/// Lowest valid trust score
pub const MIN_SCORE: f64 = 0.0;

/// Highest valid trust score
pub const MAX_SCORE: f64 = 100.0;

/// Error raised when a trust score is outside [0, 100]
#[derive(Debug, Clone, PartialEq, Error)]
#[error("trust score {0} out of range [0, 100]")]
pub struct TrustScoreError(pub f64);

/// Research provider confidence in a claim, in [0, 100]
///
/// A `TrustScore` can only be built through [`TrustScore::new`], so every
/// value in circulation is in range and `is_verified` is total.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TrustScore(f64);

impl TrustScore {
    /// Create a trust score, rejecting NaN and values outside [0, 100]
    ///
    /// # Examples
    ///
    /// ```
    /// use verity_domain::TrustScore;
    ///
    /// assert!(TrustScore::new(70.0).unwrap().is_verified());
    /// assert!(!TrustScore::new(69.0).unwrap().is_verified());
    /// assert!(TrustScore::new(150.0).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, TrustScoreError> {
        if value.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TrustScoreError(value))
        }
    }

    /// Raw score value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether the score meets the verification threshold
    pub fn is_verified(&self) -> bool {
        self.0 >= VERIFICATION_THRESHOLD
    }
}

impl TryFrom<f64> for TrustScore {
    type Error = TrustScoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TrustScore> for f64 {
    fn from(score: TrustScore) -> Self {
        score.0
    }
}
