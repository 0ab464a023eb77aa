//! CSV export of the risk register

use serde::Serialize;

use crate::core::context::{DocumentContext, EntrySummary};
use crate::export::{DocumentRenderer, ExportError};

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    hazard_code: &'a str,
    hazard: &'a str,
    controls: String,
    additional_controls: String,
    initial_likelihood: u8,
    initial_severity: u8,
    initial_score: u8,
    initial_level: String,
    residual_likelihood: u8,
    residual_severity: u8,
    residual_score: u8,
    residual_level: String,
    notes: &'a str,
    custom: bool,
}

impl<'a> From<&'a EntrySummary> for CsvRow<'a> {
    fn from(entry: &'a EntrySummary) -> Self {
        Self {
            id: &entry.id,
            hazard_code: &entry.hazard_code,
            hazard: &entry.hazard_name,
            controls: entry.controls.join("; "),
            additional_controls: entry.additional_controls.join("; "),
            initial_likelihood: entry.initial.likelihood,
            initial_severity: entry.initial.severity,
            initial_score: entry.initial.score,
            initial_level: entry.initial.level.to_string(),
            residual_likelihood: entry.residual.likelihood,
            residual_severity: entry.residual.severity,
            residual_score: entry.residual.score,
            residual_level: entry.residual.level.to_string(),
            notes: &entry.notes,
            custom: entry.is_custom,
        }
    }
}

/// One row per risk entry, in register order
#[derive(Debug, Default)]
pub struct CsvRenderer;

impl DocumentRenderer for CsvRenderer {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, context: &DocumentContext) -> Result<String, ExportError> {
        let mut wtr = ::csv::Writer::from_writer(Vec::new());
        for entry in &context.risk_entries {
            wtr.serialize(CsvRow::from(entry))?;
        }
        let bytes = wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|_| ExportError::Encoding)
    }
}
