//! Document context - the flat object handed to document generation
//!
//! Text generation and document export are external collaborators. This
//! module resolves codes into names and descriptions so that the context is
//! self-contained and can be serialized to JSON without the knowledge base.

use serde::Serialize;

use crate::core::aggregate::Aggregation;
use crate::core::knowledge_base::KnowledgeBase;
use crate::core::score::{RiskLevel, RiskScore};
use crate::core::session::{ProjectDetails, RamsSession};
use crate::entities::entry::RiskAssessmentEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub code: String,
    pub name: String,
    pub description: String,
    pub method_statement: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardSummary {
    pub code: String,
    pub name: String,
    pub description: String,
    pub severity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlSummary {
    pub code: String,
    pub name: String,
    pub description: String,
    pub category: String,
}

/// A score flattened for templates and prompts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub likelihood: u8,
    pub severity: u8,
    pub score: u8,
    pub level: RiskLevel,
}

impl From<RiskScore> for ScoreSummary {
    fn from(score: RiskScore) -> Self {
        Self {
            likelihood: score.likelihood.value(),
            severity: score.severity.value(),
            score: score.value(),
            level: score.level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySummary {
    pub id: String,
    pub hazard_code: String,
    pub hazard_name: String,
    /// Names of the attached controls
    pub controls: Vec<String>,
    pub additional_controls: Vec<String>,
    pub initial: ScoreSummary,
    pub residual: ScoreSummary,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    pub is_custom: bool,
}

/// Everything document generation needs about one job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentContext {
    pub project: ProjectDetails,
    pub selected_activities: Vec<String>,
    pub activities: Vec<ActivitySummary>,
    pub hazards: Vec<HazardSummary>,
    pub controls: Vec<ControlSummary>,
    pub ppe: Vec<String>,
    pub permits: Vec<String>,
    pub risk_entries: Vec<EntrySummary>,
}

impl DocumentContext {
    /// Build the context for a session
    ///
    /// Codes that no longer resolve are skipped; entries keep their hazard
    /// code as the name in that case.
    pub fn build(kb: &KnowledgeBase, session: &RamsSession) -> Self {
        let codes = &session.activities;
        let aggregation = Aggregation::for_activities(kb, codes);

        let activities = codes
            .iter()
            .filter_map(|code| kb.activity(code))
            .map(|a| ActivitySummary {
                code: a.code.clone(),
                name: a.name.clone(),
                description: a.description.clone(),
                method_statement: a.method_statement.clone(),
                competency: a.competency.clone(),
            })
            .collect();

        let hazards = aggregation
            .hazards
            .iter()
            .filter_map(|code| kb.hazard(code))
            .map(|h| HazardSummary {
                code: h.code.clone(),
                name: h.name.clone(),
                description: h.description.clone(),
                severity: h.severity.to_string(),
                regulation: h.regulation.clone(),
            })
            .collect();

        let controls = aggregation
            .controls
            .iter()
            .filter_map(|code| kb.control(code))
            .map(|c| ControlSummary {
                code: c.code.clone(),
                name: c.name.clone(),
                description: c.description.clone(),
                category: c.category.to_string(),
            })
            .collect();

        let risk_entries = session
            .register
            .entries()
            .iter()
            .map(|entry| summarize_entry(kb, entry))
            .collect();

        Self {
            project: session.project.clone(),
            selected_activities: codes.clone(),
            activities,
            hazards,
            controls,
            ppe: aggregation.ppe,
            permits: aggregation.permits,
            risk_entries,
        }
    }
}

fn summarize_entry(kb: &KnowledgeBase, entry: &RiskAssessmentEntry) -> EntrySummary {
    let hazard_name = kb
        .hazard(&entry.hazard)
        .map(|h| h.name.clone())
        .unwrap_or_else(|| entry.hazard.clone());

    let controls = entry
        .controls
        .iter()
        .map(|code| {
            kb.control(code)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| code.clone())
        })
        .collect();

    EntrySummary {
        id: entry.id.to_string(),
        hazard_code: entry.hazard.clone(),
        hazard_name,
        controls,
        additional_controls: entry.additional_controls.clone(),
        initial: entry.initial.into(),
        residual: entry.residual.into(),
        notes: entry.notes.clone(),
        is_custom: entry.is_custom,
    }
}
