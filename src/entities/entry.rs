//! Risk assessment entry - one scored hazard in a job's risk register

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::EntryId;
use crate::core::score::{Rating, RiskScore, ScoreError};

/// A scored hazard in the risk register
///
/// Derived entries are created by reconciliation for hazards implied by the
/// selected activities. Custom entries are added by the user and survive
/// every selection change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessmentEntry {
    pub id: EntryId,

    /// Hazard code in the knowledge base
    pub hazard: String,

    /// Control codes attached when the entry was derived
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<String>,

    /// Pre-control score
    pub initial: RiskScore,

    /// Post-control score
    pub residual: RiskScore,

    /// Free-text controls added by the user
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_controls: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_custom: bool,

    pub created: DateTime<Utc>,
}

/// Partial update to an entry; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    pub initial_likelihood: Option<u8>,
    pub initial_severity: Option<u8>,
    pub residual_likelihood: Option<u8>,
    pub residual_severity: Option<u8>,
    pub notes: Option<String>,
    /// Replaces the additional controls list
    pub additional_controls: Option<Vec<String>>,
}

impl EntryUpdate {
    pub fn is_empty(&self) -> bool {
        *self == EntryUpdate::default()
    }
}

impl RiskAssessmentEntry {
    /// A derived entry for a hazard implied by the activity selection
    pub fn derived(hazard: impl Into<String>, controls: Vec<String>, initial: RiskScore) -> Self {
        let residual = initial.residual(controls.len());
        Self {
            id: EntryId::new(),
            hazard: hazard.into(),
            controls,
            initial,
            residual,
            additional_controls: Vec::new(),
            notes: String::new(),
            is_custom: false,
            created: Utc::now(),
        }
    }

    /// A user-added entry with default 3x3 initial and 2x2 residual scores
    pub fn custom(hazard: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            hazard: hazard.into(),
            controls: Vec::new(),
            initial: RiskScore::custom_initial(),
            residual: RiskScore::custom_residual(),
            additional_controls: Vec::new(),
            notes: String::new(),
            is_custom: true,
            created: Utc::now(),
        }
    }

    /// Merge an update into this entry
    ///
    /// Every rating is validated before anything is written, so a rejected
    /// update leaves the entry untouched.
    pub fn apply(&mut self, update: EntryUpdate) -> Result<(), ScoreError> {
        let initial_likelihood = update
            .initial_likelihood
            .map(|v| Rating::new("initial likelihood", v))
            .transpose()?;
        let initial_severity = update
            .initial_severity
            .map(|v| Rating::new("initial severity", v))
            .transpose()?;
        let residual_likelihood = update
            .residual_likelihood
            .map(|v| Rating::new("residual likelihood", v))
            .transpose()?;
        let residual_severity = update
            .residual_severity
            .map(|v| Rating::new("residual severity", v))
            .transpose()?;

        if let Some(r) = initial_likelihood {
            self.initial.likelihood = r;
        }
        if let Some(r) = initial_severity {
            self.initial.severity = r;
        }
        if let Some(r) = residual_likelihood {
            self.residual.likelihood = r;
        }
        if let Some(r) = residual_severity {
            self.residual.severity = r;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some(controls) = update.additional_controls {
            self.additional_controls = controls;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::hazard::SeverityTier;

    #[test]
    fn test_derived_entry_scores() {
        let initial = RiskScore::initial_for_tier(SeverityTier::High);
        let entry = RiskAssessmentEntry::derived(
            "arc_flash",
            vec!["isolation".to_string()],
            initial,
        );
        assert!(!entry.is_custom);
        assert_eq!(entry.initial.value(), 12);
        assert_eq!(entry.residual.likelihood.value(), 2);
        assert_eq!(entry.residual.severity.value(), 3);
    }

    #[test]
    fn test_custom_entry_defaults() {
        let entry = RiskAssessmentEntry::custom("confined_space");
        assert!(entry.is_custom);
        assert!(entry.controls.is_empty());
        assert_eq!(entry.initial, RiskScore::from_values(3, 3).unwrap());
        assert_eq!(entry.residual, RiskScore::from_values(2, 2).unwrap());
    }

    #[test]
    fn test_apply_merges_fields() {
        let mut entry = RiskAssessmentEntry::custom("confined_space");
        entry
            .apply(EntryUpdate {
                residual_likelihood: Some(1),
                notes: Some("Rescue plan in place".to_string()),
                additional_controls: Some(vec!["Top man stationed at entry".to_string()]),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(entry.residual.likelihood.value(), 1);
        assert_eq!(entry.residual.severity.value(), 2);
        assert_eq!(entry.initial.value(), 9);
        assert_eq!(entry.notes, "Rescue plan in place");
        assert_eq!(entry.additional_controls.len(), 1);
    }

    #[test]
    fn test_apply_rejects_without_partial_write() {
        let mut entry = RiskAssessmentEntry::custom("confined_space");
        let before = entry.clone();
        let err = entry
            .apply(EntryUpdate {
                initial_likelihood: Some(4),
                residual_severity: Some(0),
                notes: Some("should not land".to_string()),
                ..Default::default()
            })
            .unwrap_err();

        assert_eq!(
            err,
            ScoreError::OutOfRange {
                field: "residual severity",
                value: 0
            }
        );
        assert_eq!(entry, before);
    }

    #[test]
    fn test_custom_flag_omitted_for_derived_entries() {
        let entry = RiskAssessmentEntry::derived(
            "arc_flash",
            Vec::new(),
            RiskScore::initial_for_tier(SeverityTier::High),
        );
        let yaml = serde_yml::to_string(&entry).unwrap();
        assert!(!yaml.contains("is_custom"));
        let back: RiskAssessmentEntry = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(back, entry);
    }
}
