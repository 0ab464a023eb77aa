//! RAMS: activity-to-risk aggregation for electrical contracting work
//!
//! Maps a job's selected work activities onto the hazards, control measures,
//! PPE and permits they imply, scores each hazard on a 5x5 matrix and keeps
//! a user-editable risk register reconciled with the selection.

pub mod cli;
pub mod core;
pub mod entities;
pub mod export;
pub mod telemetry;
pub mod yaml;
