//! Hazard entity type
//!
//! Hazards are named sources of harm on site (e.g., arc flash, working at
//! height). They are distinct from risk entries - a hazard is the source,
//! while a risk entry scores the likelihood and severity of harm from that
//! hazard for a particular job.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::entity::{default_active, is_true, KnowledgeEntry};

/// Hazard category - mechanism of harm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardCategory {
    /// Electric shock, direct or indirect
    Shock,
    /// Contact and thermal burns
    Burn,
    /// Fire started by electrical equipment
    Fire,
    /// Arc flash and arc blast
    Arc,
    /// Ignition of an explosive atmosphere
    Explosion,
    /// Non-electrical site hazards (height, handling, dust)
    Secondary,
}

impl std::fmt::Display for HazardCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HazardCategory::Shock => write!(f, "shock"),
            HazardCategory::Burn => write!(f, "burn"),
            HazardCategory::Fire => write!(f, "fire"),
            HazardCategory::Arc => write!(f, "arc"),
            HazardCategory::Explosion => write!(f, "explosion"),
            HazardCategory::Secondary => write!(f, "secondary"),
        }
    }
}

impl FromStr for HazardCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shock" | "electric" => Ok(HazardCategory::Shock),
            "burn" | "burns" => Ok(HazardCategory::Burn),
            "fire" => Ok(HazardCategory::Fire),
            "arc" | "arc_flash" => Ok(HazardCategory::Arc),
            "explosion" | "atex" => Ok(HazardCategory::Explosion),
            "secondary" | "other" => Ok(HazardCategory::Secondary),
            _ => Err(format!("Unknown hazard category: {}", s)),
        }
    }
}

/// Declared severity tier of a hazard
///
/// The tier drives the initial risk score of new risk entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeverityTier::Low => write!(f, "low"),
            SeverityTier::Medium => write!(f, "medium"),
            SeverityTier::High => write!(f, "high"),
            SeverityTier::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for SeverityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" | "minor" => Ok(SeverityTier::Low),
            "medium" | "moderate" => Ok(SeverityTier::Medium),
            "high" | "severe" => Ok(SeverityTier::High),
            "critical" | "fatal" => Ok(SeverityTier::Critical),
            _ => Err(format!("Unknown severity tier: {}", s)),
        }
    }
}

/// A hazard entry in the knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    /// Stable code (e.g., "arc_flash")
    pub code: String,

    /// Display name
    pub name: String,

    /// Detailed description of the hazard
    pub description: String,

    /// Mechanism of harm
    pub category: HazardCategory,

    /// Declared severity tier
    pub severity: SeverityTier,

    /// Regulation the hazard is governed by (e.g., "EAWR 1989 Reg 14")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulation: Option<String>,

    /// Conditions that make the hazard more likely
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risk_factors: Vec<String>,

    /// Roles exposed to the hazard
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub persons_at_risk: Vec<String>,

    #[serde(default = "default_active", skip_serializing_if = "is_true")]
    pub is_active: bool,
}

impl KnowledgeEntry for Hazard {
    const KIND: &'static str = "hazard";

    fn code(&self) -> &str {
        &self.code
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl Hazard {
    /// Create a new active hazard with required fields
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: HazardCategory,
        severity: SeverityTier,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: String::new(),
            category,
            severity,
            regulation: None,
            risk_factors: Vec::new(),
            persons_at_risk: Vec::new(),
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hazard_category_display() {
        assert_eq!(HazardCategory::Shock.to_string(), "shock");
        assert_eq!(HazardCategory::Secondary.to_string(), "secondary");
    }

    #[test]
    fn test_hazard_category_from_str() {
        assert_eq!(HazardCategory::from_str("arc").unwrap(), HazardCategory::Arc);
        assert_eq!(
            HazardCategory::from_str("EXPLOSION").unwrap(),
            HazardCategory::Explosion
        );
        assert!(HazardCategory::from_str("mechanical").is_err());
    }

    #[test]
    fn test_severity_tier_ordering() {
        assert!(SeverityTier::Critical > SeverityTier::High);
        assert!(SeverityTier::Medium > SeverityTier::Low);
        assert_eq!(SeverityTier::from_str("fatal").unwrap(), SeverityTier::Critical);
    }

    #[test]
    fn test_hazard_yaml_defaults() {
        let yaml = "code: arc_flash\nname: Arc Flash\ndescription: Arc fault\ncategory: arc\nseverity: high\n";
        let hazard: Hazard = serde_yml::from_str(yaml).unwrap();
        assert_eq!(hazard.code, "arc_flash");
        assert_eq!(hazard.severity, SeverityTier::High);
        assert!(hazard.is_active);
        assert!(hazard.regulation.is_none());
        assert!(hazard.risk_factors.is_empty());
    }

    #[test]
    fn test_active_flag_not_serialized_when_true() {
        let hazard = Hazard::new("slips", "Slips", HazardCategory::Secondary, SeverityTier::Low);
        let yaml = serde_yml::to_string(&hazard).unwrap();
        assert!(!yaml.contains("is_active"));
    }
}
