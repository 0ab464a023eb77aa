//! Knowledge base records and risk assessment entries

pub mod activity;
pub mod control;
pub mod entry;
pub mod hazard;

pub use activity::Activity;
pub use control::Control;
pub use entry::{EntryUpdate, RiskAssessmentEntry};
pub use hazard::Hazard;
