//! Control measure entity type

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::entity::{default_active, is_true, KnowledgeEntry};

/// Position of a control in the hierarchy of control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlCategory {
    Elimination,
    Substitution,
    Engineering,
    Administrative,
    Ppe,
}

impl std::fmt::Display for ControlCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlCategory::Elimination => write!(f, "elimination"),
            ControlCategory::Substitution => write!(f, "substitution"),
            ControlCategory::Engineering => write!(f, "engineering"),
            ControlCategory::Administrative => write!(f, "administrative"),
            ControlCategory::Ppe => write!(f, "ppe"),
        }
    }
}

impl FromStr for ControlCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elimination" => Ok(ControlCategory::Elimination),
            "substitution" => Ok(ControlCategory::Substitution),
            "engineering" => Ok(ControlCategory::Engineering),
            "administrative" | "admin" => Ok(ControlCategory::Administrative),
            "ppe" => Ok(ControlCategory::Ppe),
            _ => Err(format!("Unknown control category: {}", s)),
        }
    }
}

/// How well a control is expected to work
///
/// Carried for display only; residual scoring counts controls and does not
/// weight them by effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effectiveness {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Effectiveness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effectiveness::High => write!(f, "high"),
            Effectiveness::Medium => write!(f, "medium"),
            Effectiveness::Low => write!(f, "low"),
        }
    }
}

/// A control measure entry in the knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub code: String,

    pub name: String,

    pub description: String,

    pub category: ControlCategory,

    /// Hazard codes this control mitigates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applicable_hazards: Vec<String>,

    pub effectiveness: Effectiveness,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_notes: Option<String>,

    /// Evidence needed to show the control is in place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_required: Option<String>,

    #[serde(default = "default_active", skip_serializing_if = "is_true")]
    pub is_active: bool,
}

impl KnowledgeEntry for Control {
    const KIND: &'static str = "control";

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

impl Control {
    /// Create a new active control with required fields
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: ControlCategory,
        effectiveness: Effectiveness,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: String::new(),
            category,
            applicable_hazards: Vec::new(),
            effectiveness,
            implementation_notes: None,
            verification_required: None,
            is_active: true,
        }
    }

    pub fn with_hazards<I, S>(mut self, hazards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applicable_hazards = hazards.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether this control mitigates the given hazard
    pub fn applies_to(&self, hazard_code: &str) -> bool {
        self.applicable_hazards.iter().any(|h| h == hazard_code)
    }
}
