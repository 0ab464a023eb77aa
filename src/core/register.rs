//! Risk register - reconciliation of scored entries against a selection
//!
//! The register is a plain value owned by the caller. [`reconcile`] is a
//! pure transition from the current register and a new activity selection
//! to the next register; the caller replaces its state with the result in a
//! single assignment, so a half-applied recompute is never observable.
//!
//! Reconciliation rules:
//! - a derived entry whose hazard is still implied is kept as-is, including
//!   any user edits to scores, notes or additional controls
//! - a newly implied hazard gets a fresh derived entry
//! - a derived entry whose hazard is no longer implied is dropped
//! - custom entries are always carried forward, after the derived entries

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::aggregate::{controls_for_activities, hazards_for_activities};
use crate::core::identity::EntryId;
use crate::core::knowledge_base::KnowledgeBase;
use crate::core::score::{RiskLevel, RiskScore, ScoreError};
use crate::entities::entry::{EntryUpdate, RiskAssessmentEntry};

/// Errors from user mutations of the register
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("No risk entry with ID {0}")]
    EntryNotFound(EntryId),

    #[error("Unknown hazard code '{0}'")]
    UnknownHazard(String),

    #[error("Invalid score: {0}")]
    InvalidScore(#[from] ScoreError),
}

/// Result of [`RiskRegister::add_custom_entry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new custom entry was created
    Added(EntryId),
    /// The hazard already has an entry; nothing changed
    AlreadyTracked(EntryId),
}

/// Ordered list of risk assessment entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskRegister {
    entries: Vec<RiskAssessmentEntry>,
}

/// Entry counts per residual risk level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub very_high: usize,
}

impl RiskRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<RiskAssessmentEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RiskAssessmentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<&RiskAssessmentEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// First entry (derived or custom) for a hazard
    pub fn find_by_hazard(&self, hazard: &str) -> Option<&RiskAssessmentEntry> {
        self.entries.iter().find(|e| e.hazard == hazard)
    }

    /// Entries created by reconciliation
    pub fn derived(&self) -> impl Iterator<Item = &RiskAssessmentEntry> {
        self.entries.iter().filter(|e| !e.is_custom)
    }

    /// Entries added by the user
    pub fn custom(&self) -> impl Iterator<Item = &RiskAssessmentEntry> {
        self.entries.iter().filter(|e| e.is_custom)
    }

    /// Count entries by residual risk level
    pub fn residual_levels(&self) -> LevelCounts {
        let mut counts = LevelCounts::default();
        for entry in &self.entries {
            match entry.residual.level() {
                RiskLevel::Low => counts.low += 1,
                RiskLevel::Medium => counts.medium += 1,
                RiskLevel::High => counts.high += 1,
                RiskLevel::VeryHigh => counts.very_high += 1,
            }
        }
        counts
    }

    /// Merge a partial update into an entry
    ///
    /// Ratings outside 1-5 are rejected rather than clamped.
    pub fn update_entry(&mut self, id: &EntryId, update: EntryUpdate) -> Result<(), RegisterError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or(RegisterError::EntryNotFound(*id))?;
        entry.apply(update)?;
        Ok(())
    }

    /// Remove an entry, derived or custom
    ///
    /// A removed derived entry comes back on the next reconcile while its
    /// activity stays selected.
    pub fn remove_entry(&mut self, id: &EntryId) -> Result<RiskAssessmentEntry, RegisterError> {
        let pos = self
            .entries
            .iter()
            .position(|e| &e.id == id)
            .ok_or(RegisterError::EntryNotFound(*id))?;
        Ok(self.entries.remove(pos))
    }

    /// Track a hazard that no selected activity implies
    ///
    /// No-op when the hazard already has an entry.
    pub fn add_custom_entry(
        &mut self,
        kb: &KnowledgeBase,
        hazard: &str,
    ) -> Result<AddOutcome, RegisterError> {
        if let Some(existing) = self.find_by_hazard(hazard) {
            return Ok(AddOutcome::AlreadyTracked(existing.id));
        }
        if kb.hazard(hazard).is_none() {
            return Err(RegisterError::UnknownHazard(hazard.to_string()));
        }

        let entry = RiskAssessmentEntry::custom(hazard);
        let id = entry.id;
        self.entries.push(entry);
        Ok(AddOutcome::Added(id))
    }
}

/// Build a fresh derived entry for a hazard
///
/// Attaches the controls from `control_codes` that apply to the hazard, in
/// `control_codes` order. Returns `None` when the hazard doesn't resolve.
pub fn derive_entry(
    kb: &KnowledgeBase,
    hazard_code: &str,
    control_codes: &[String],
) -> Option<RiskAssessmentEntry> {
    let hazard = kb.hazard(hazard_code)?;

    let controls: Vec<String> = control_codes
        .iter()
        .filter(|code| {
            kb.control(code)
                .map(|c| c.applies_to(hazard_code))
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    Some(RiskAssessmentEntry::derived(
        hazard_code,
        controls,
        RiskScore::initial_for_tier(hazard.severity),
    ))
}

/// Compute the next register for a new activity selection
pub fn reconcile<S: AsRef<str>>(
    current: &RiskRegister,
    kb: &KnowledgeBase,
    selection: &[S],
) -> RiskRegister {
    let hazard_codes = hazards_for_activities(kb, selection);
    let control_codes = controls_for_activities(kb, selection);

    let mut entries = Vec::with_capacity(hazard_codes.len() + current.custom().count());
    let mut retained = 0usize;
    let mut created = 0usize;

    for code in &hazard_codes {
        let existing = current
            .entries
            .iter()
            .find(|e| !e.is_custom && &e.hazard == code);

        match existing {
            Some(entry) => {
                entries.push(entry.clone());
                retained += 1;
            }
            None => match derive_entry(kb, code, &control_codes) {
                Some(entry) => {
                    entries.push(entry);
                    created += 1;
                }
                None => tracing::warn!(hazard = %code, "skipping unresolved hazard"),
            },
        }
    }

    let dropped = current.derived().count().saturating_sub(retained);
    entries.extend(current.custom().cloned());

    tracing::debug!(
        retained,
        created,
        dropped,
        custom = current.custom().count(),
        "reconciled risk register"
    );

    RiskRegister { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::embedded().unwrap()
    }

    fn hazards(register: &RiskRegister) -> Vec<&str> {
        register.entries().iter().map(|e| e.hazard.as_str()).collect()
    }

    #[test]
    fn test_reconcile_from_empty() {
        let kb = kb();
        let register = reconcile(&RiskRegister::new(), &kb, &["distribution_board"]);
        assert_eq!(
            hazards(&register),
            vec!["electric_shock_direct", "arc_flash", "electrical_fire"]
        );
        assert!(register.entries().iter().all(|e| !e.is_custom));
    }

    #[test]
    fn test_attached_controls_follow_aggregated_order() {
        let kb = kb();
        let register = reconcile(&RiskRegister::new(), &kb, &["distribution_board"]);
        let arc = register.find_by_hazard("arc_flash").unwrap();
        assert_eq!(
            arc.controls,
            vec!["dead_working", "isolation", "lockout_tagout", "competent_persons"]
        );
        let fire = register.find_by_hazard("electrical_fire").unwrap();
        assert_eq!(
            fire.controls,
            vec!["isolation", "competent_persons", "circuit_protection"]
        );
    }

    #[test]
    fn test_reconcile_keeps_identity_of_retained_entries() {
        let kb = kb();
        let first = reconcile(&RiskRegister::new(), &kb, &["distribution_board"]);
        let second = reconcile(&first, &kb, &["distribution_board", "cable_containment"]);

        let before = first.find_by_hazard("arc_flash").unwrap();
        let after = second.find_by_hazard("arc_flash").unwrap();
        assert_eq!(before, after);
        assert!(second.find_by_hazard("working_at_height").is_some());
    }

    #[test]
    fn test_retained_entry_keeps_original_controls() {
        let kb = kb();
        // testing_inspection brings gs38_test_equipment and prove_dead for arc_flash
        let first = reconcile(&RiskRegister::new(), &kb, &["testing_inspection"]);
        let second = reconcile(&first, &kb, &["testing_inspection", "distribution_board"]);

        let arc = second.find_by_hazard("arc_flash").unwrap();
        assert_eq!(
            arc.controls,
            first.find_by_hazard("arc_flash").unwrap().controls
        );
    }

    #[test]
    fn test_custom_entries_come_last() {
        let kb = kb();
        let mut register = RiskRegister::new();
        register.add_custom_entry(&kb, "confined_space").unwrap();

        let next = reconcile(&register, &kb, &["distribution_board"]);
        assert_eq!(
            hazards(&next),
            vec![
                "electric_shock_direct",
                "arc_flash",
                "electrical_fire",
                "confined_space"
            ]
        );
    }

    #[test]
    fn test_custom_entry_for_implied_hazard_is_kept_alongside_derived() {
        let kb = kb();
        let mut register = RiskRegister::new();
        register.add_custom_entry(&kb, "arc_flash").unwrap();

        let next = reconcile(&register, &kb, &["distribution_board"]);
        let arc_entries: Vec<_> = next
            .entries()
            .iter()
            .filter(|e| e.hazard == "arc_flash")
            .collect();
        assert_eq!(arc_entries.len(), 2);
        assert_eq!(next.custom().count(), 1);
    }

    #[test]
    fn test_add_custom_is_noop_when_tracked() {
        let kb = kb();
        let mut register = reconcile(&RiskRegister::new(), &kb, &["distribution_board"]);
        let existing = register.find_by_hazard("arc_flash").unwrap().id;

        let outcome = register.add_custom_entry(&kb, "arc_flash").unwrap();
        assert_eq!(outcome, AddOutcome::AlreadyTracked(existing));
        assert_eq!(register.len(), 3);
    }

    #[test]
    fn test_add_custom_rejects_unknown_hazard() {
        let kb = kb();
        let mut register = RiskRegister::new();
        let err = register.add_custom_entry(&kb, "lightning").unwrap_err();
        assert!(matches!(err, RegisterError::UnknownHazard(code) if code == "lightning"));
        assert!(register.is_empty());
    }

    #[test]
    fn test_update_unknown_entry() {
        let mut register = RiskRegister::new();
        let id = EntryId::new();
        let err = register.update_entry(&id, EntryUpdate::default()).unwrap_err();
        assert!(matches!(err, RegisterError::EntryNotFound(missing) if missing == id));
    }

    #[test]
    fn test_update_out_of_range_is_rejected() {
        let kb = kb();
        let mut register = reconcile(&RiskRegister::new(), &kb, &["distribution_board"]);
        let id = register.entries()[0].id;
        let before = register.clone();

        let err = register
            .update_entry(
                &id,
                EntryUpdate {
                    initial_likelihood: Some(6),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, RegisterError::InvalidScore(_)));
        assert_eq!(register, before);
    }

    #[test]
    fn test_remove_derived_entry_returns_on_next_reconcile() {
        let kb = kb();
        let mut register = reconcile(&RiskRegister::new(), &kb, &["distribution_board"]);
        let id = register.find_by_hazard("arc_flash").unwrap().id;

        let removed = register.remove_entry(&id).unwrap();
        assert_eq!(removed.hazard, "arc_flash");
        assert!(register.find_by_hazard("arc_flash").is_none());

        let next = reconcile(&register, &kb, &["distribution_board"]);
        let recreated = next.find_by_hazard("arc_flash").unwrap();
        assert_ne!(recreated.id, id);
    }

    #[test]
    fn test_unresolved_activity_contributes_nothing() {
        let kb = kb();
        let register = reconcile(&RiskRegister::new(), &kb, &["retired_activity"]);
        assert!(register.is_empty());
    }

    #[test]
    fn test_residual_levels() {
        let kb = kb();
        let register = reconcile(&RiskRegister::new(), &kb, &["distribution_board"]);
        let counts = register.residual_levels();
        assert_eq!(
            counts.low + counts.medium + counts.high + counts.very_high,
            register.len()
        );
    }
}
