//! Table rows for list output

use console::style;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::truncate_str;
use crate::core::knowledge_base::KnowledgeBase;
use crate::core::score::{RiskLevel, RiskScore};
use crate::entities::{Activity, Control, Hazard, RiskAssessmentEntry};

const NAME_WIDTH: usize = 40;

#[derive(Tabled)]
pub struct ActivityRow {
    #[tabled(rename = "CODE")]
    pub code: String,
    #[tabled(rename = "CATEGORY")]
    pub category: String,
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "HAZARDS")]
    pub hazards: usize,
    #[tabled(rename = "CONTROLS")]
    pub controls: usize,
}

impl From<&Activity> for ActivityRow {
    fn from(activity: &Activity) -> Self {
        Self {
            code: activity.code.clone(),
            category: activity.category.to_string(),
            name: truncate_str(&activity.name, NAME_WIDTH),
            hazards: activity.hazards.len(),
            controls: activity.controls.len(),
        }
    }
}

#[derive(Tabled)]
pub struct HazardRow {
    #[tabled(rename = "CODE")]
    pub code: String,
    #[tabled(rename = "CATEGORY")]
    pub category: String,
    #[tabled(rename = "SEVERITY")]
    pub severity: String,
    #[tabled(rename = "NAME")]
    pub name: String,
}

impl From<&Hazard> for HazardRow {
    fn from(hazard: &Hazard) -> Self {
        Self {
            code: hazard.code.clone(),
            category: hazard.category.to_string(),
            severity: hazard.severity.to_string(),
            name: truncate_str(&hazard.name, NAME_WIDTH),
        }
    }
}

#[derive(Tabled)]
pub struct ControlRow {
    #[tabled(rename = "CODE")]
    pub code: String,
    #[tabled(rename = "CATEGORY")]
    pub category: String,
    #[tabled(rename = "EFFECT")]
    pub effectiveness: String,
    #[tabled(rename = "NAME")]
    pub name: String,
}

impl From<&Control> for ControlRow {
    fn from(control: &Control) -> Self {
        Self {
            code: control.code.clone(),
            category: control.category.to_string(),
            effectiveness: control.effectiveness.to_string(),
            name: truncate_str(&control.name, NAME_WIDTH),
        }
    }
}

#[derive(Tabled)]
pub struct EntryRow {
    #[tabled(rename = "#")]
    pub index: String,
    #[tabled(rename = "HAZARD")]
    pub hazard: String,
    #[tabled(rename = "CTRLS")]
    pub controls: usize,
    #[tabled(rename = "INITIAL")]
    pub initial: String,
    #[tabled(rename = "RESIDUAL")]
    pub residual: String,
}

impl EntryRow {
    pub fn new(index: usize, entry: &RiskAssessmentEntry, kb: &KnowledgeBase) -> Self {
        let name = kb
            .hazard(&entry.hazard)
            .map(|h| h.name.as_str())
            .unwrap_or(&entry.hazard);
        let hazard = if entry.is_custom {
            format!("{} (custom)", truncate_str(name, NAME_WIDTH))
        } else {
            truncate_str(name, NAME_WIDTH)
        };
        Self {
            index: format!("@{}", index + 1),
            hazard,
            controls: entry.controls.len() + entry.additional_controls.len(),
            initial: styled_score(&entry.initial),
            residual: styled_score(&entry.residual),
        }
    }
}

/// Score with its level coloured
pub fn styled_score(score: &RiskScore) -> String {
    let level = score.level();
    let text = format!("{} {}", score.value(), level);
    match level {
        RiskLevel::Low => style(text).green().to_string(),
        RiskLevel::Medium => style(text).yellow().to_string(),
        RiskLevel::High => style(text).red().to_string(),
        RiskLevel::VeryHigh => style(text).red().bold().to_string(),
    }
}

/// Render rows as a table
pub fn render<R: Tabled>(rows: Vec<R>) -> String {
    Table::new(rows).with(Style::psql()).to_string()
}
