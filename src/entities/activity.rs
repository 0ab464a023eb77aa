//! Activity entity type
//!
//! An activity is a selectable unit of work (e.g., "Distribution Board
//! Installation"). Each activity carries an ordered hazard and control
//! profile plus the PPE and permits the job typically needs.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::entity::{default_active, is_true, KnowledgeEntry};

/// Activity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Installation,
    Containment,
    Cabling,
    Testing,
    Maintenance,
    FaultFinding,
}

impl std::fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityCategory::Installation => write!(f, "installation"),
            ActivityCategory::Containment => write!(f, "containment"),
            ActivityCategory::Cabling => write!(f, "cabling"),
            ActivityCategory::Testing => write!(f, "testing"),
            ActivityCategory::Maintenance => write!(f, "maintenance"),
            ActivityCategory::FaultFinding => write!(f, "fault_finding"),
        }
    }
}

impl FromStr for ActivityCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "installation" | "install" => Ok(ActivityCategory::Installation),
            "containment" => Ok(ActivityCategory::Containment),
            "cabling" => Ok(ActivityCategory::Cabling),
            "testing" | "test" => Ok(ActivityCategory::Testing),
            "maintenance" => Ok(ActivityCategory::Maintenance),
            "fault_finding" | "faultfinding" => Ok(ActivityCategory::FaultFinding),
            _ => Err(format!("Unknown activity category: {}", s)),
        }
    }
}

/// A work activity entry in the knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub code: String,

    pub name: String,

    pub description: String,

    pub category: ActivityCategory,

    /// Hazard codes, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hazards: Vec<String>,

    /// Control codes, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<String>,

    /// Method statement steps
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub method_statement: Vec<String>,

    /// Competency required of the operatives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competency: Option<String>,

    /// Permits needed before work starts (empty when none)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permits_required: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub typical_ppe: Vec<String>,

    #[serde(default = "default_active", skip_serializing_if = "is_true")]
    pub is_active: bool,

    #[serde(default)]
    pub sort_order: u32,
}

impl KnowledgeEntry for Activity {
    const KIND: &'static str = "activity";

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

impl Activity {
    /// Create a new active activity with no hazard profile
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        category: ActivityCategory,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: String::new(),
            category,
            hazards: Vec::new(),
            controls: Vec::new(),
            method_statement: Vec::new(),
            competency: None,
            permits_required: Vec::new(),
            typical_ppe: Vec::new(),
            is_active: true,
            sort_order: 0,
        }
    }

    pub fn with_hazards<I, S>(mut self, hazards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hazards = hazards.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_controls<I, S>(mut self, controls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.controls = controls.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ppe<I, S>(mut self, ppe: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.typical_ppe = ppe.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_permits<I, S>(mut self, permits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permits_required = permits.into_iter().map(Into::into).collect();
        self
    }

    /// Check if the activity implies any hazards
    pub fn has_hazards(&self) -> bool {
        !self.hazards.is_empty()
    }
}
