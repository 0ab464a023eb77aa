//! Core module - knowledge base, aggregation, scoring and the risk register

pub mod aggregate;
pub mod config;
pub mod context;
pub mod entity;
pub mod identity;
pub mod knowledge_base;
pub mod register;
pub mod score;
pub mod session;

pub use aggregate::{
    controls_for_activities, hazards_for_activities, permits_for_activities, ppe_for_activities,
    unresolved_activities, Aggregation,
};
pub use config::{Config, ConfigError};
pub use context::DocumentContext;
pub use entity::KnowledgeEntry;
pub use identity::{EntryId, IdParseError};
pub use knowledge_base::{IntegrityIssue, KnowledgeBase, KnowledgeBaseError};
pub use register::{derive_entry, reconcile, AddOutcome, RegisterError, RiskRegister};
pub use score::{Rating, RiskLevel, RiskScore, ScoreError};
pub use session::{ProjectDetails, RamsSession, SessionError};
