//! Entry trait - common interface for knowledge base tables

use serde::{de::DeserializeOwned, Serialize};

/// Common trait for hazards, controls and activities
pub trait KnowledgeEntry: Serialize + DeserializeOwned {
    /// Table name used in diagnostics (e.g., "hazard", "control")
    const KIND: &'static str;

    /// Stable code, unique within its table
    fn code(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;

    /// Whether the entry is offered for new selections
    fn is_active(&self) -> bool;
}

/// Serde default for `is_active` fields
pub(crate) fn default_active() -> bool {
    true
}

/// Serde skip predicate so that active entries don't serialize the flag
pub(crate) fn is_true(value: &bool) -> bool {
    *value
}
