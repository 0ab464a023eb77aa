//! Risk scoring - 5x5 likelihood/severity matrix
//!
//! A risk score is `likelihood × severity`, both rated 1-5, giving a score
//! in 1..=25 that falls in exactly one [`RiskLevel`] band.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::hazard::SeverityTier;

/// Lowest rating on the 5x5 matrix
pub const MIN_RATING: u8 = 1;

/// Highest rating on the 5x5 matrix
pub const MAX_RATING: u8 = 5;

/// Cap on how many attached controls reduce residual likelihood
pub const MAX_CONTROL_REDUCTION: usize = 2;

/// Errors building ratings from user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("{field} must be between 1 and 5 (got {value})")]
    OutOfRange { field: &'static str, value: u8 },
}

/// A single 1-5 rating of likelihood or severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validate a raw rating, naming the field in the error
    pub fn new(field: &'static str, value: u8) -> Result<Self, ScoreError> {
        if (MIN_RATING..=MAX_RATING).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScoreError::OutOfRange { field, value })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Lower the rating by `by`, never going below 1
    pub fn reduced_by(self, by: u8) -> Self {
        Self(self.0.saturating_sub(by).max(MIN_RATING))
    }

    /// Rating from a value already known to be in range
    const fn from_const(value: u8) -> Self {
        Self(value)
    }
}

impl TryFrom<u8> for Rating {
    type Error = ScoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new("rating", value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Risk level band for a 1-25 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// 1-4
    Low,
    /// 5-9
    Medium,
    /// 10-16
    High,
    /// 17-25
    VeryHigh,
}

impl RiskLevel {
    /// Band a score. Scores above 25 band as very high.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=4 => RiskLevel::Low,
            5..=9 => RiskLevel::Medium,
            10..=16 => RiskLevel::High,
            _ => RiskLevel::VeryHigh,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::VeryHigh => write!(f, "very_high"),
        }
    }
}

/// A likelihood/severity pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiskScore {
    pub likelihood: Rating,
    pub severity: Rating,
}

impl RiskScore {
    pub fn new(likelihood: Rating, severity: Rating) -> Self {
        Self {
            likelihood,
            severity,
        }
    }

    /// Validate raw likelihood/severity values
    pub fn from_values(likelihood: u8, severity: u8) -> Result<Self, ScoreError> {
        Ok(Self::new(
            Rating::new("likelihood", likelihood)?,
            Rating::new("severity", severity)?,
        ))
    }

    /// `likelihood × severity`, always in 1..=25
    pub fn value(&self) -> u8 {
        self.likelihood.value() * self.severity.value()
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.value())
    }

    /// Initial (pre-control) score for a hazard's severity tier
    pub fn initial_for_tier(tier: SeverityTier) -> Self {
        let (severity, likelihood) = match tier {
            SeverityTier::Critical => (5, 3),
            SeverityTier::High => (4, 3),
            SeverityTier::Medium => (3, 3),
            SeverityTier::Low => (2, 2),
        };
        Self::new(Rating::from_const(likelihood), Rating::from_const(severity))
    }

    /// Residual score after applying `control_count` hazard-specific controls
    ///
    /// Likelihood drops by one per control, up to [`MAX_CONTROL_REDUCTION`].
    /// Severity always drops by exactly one: control effectiveness is not
    /// weighted in. Neither rating goes below 1.
    pub fn residual(&self, control_count: usize) -> Self {
        // MAX_CONTROL_REDUCTION fits in u8
        let reduction = control_count.min(MAX_CONTROL_REDUCTION) as u8;
        Self::new(
            self.likelihood.reduced_by(reduction),
            self.severity.reduced_by(1),
        )
    }

    /// Default initial score for user-added custom entries
    pub fn custom_initial() -> Self {
        Self::new(Rating::from_const(3), Rating::from_const(3))
    }

    /// Default residual score for user-added custom entries
    pub fn custom_residual() -> Self {
        Self::new(Rating::from_const(2), Rating::from_const(2))
    }
}

impl std::fmt::Display for RiskScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}={} ({})",
            self.likelihood,
            self.severity,
            self.value(),
            self.level()
        )
    }
}
