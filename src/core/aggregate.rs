//! Activity aggregation - hazards, controls, PPE and permits for a selection
//!
//! All functions here are pure and never fail. Activity codes that don't
//! resolve contribute nothing: selections are runtime values and may refer
//! to activities that have since been removed from the knowledge base.
//!
//! Output lists are deduplicated and keep first-seen order, walking the
//! selected activities in the order given and each activity's lists in
//! declaration order.

use serde::Serialize;
use std::collections::HashSet;

use crate::core::knowledge_base::KnowledgeBase;
use crate::entities::Activity;

/// Unique hazard codes implied by the selected activities
pub fn hazards_for_activities<S: AsRef<str>>(kb: &KnowledgeBase, codes: &[S]) -> Vec<String> {
    collect_unique(resolve(kb, codes).flat_map(|a| a.hazards.iter()))
}

/// Unique control codes brought in by the selected activities
pub fn controls_for_activities<S: AsRef<str>>(kb: &KnowledgeBase, codes: &[S]) -> Vec<String> {
    collect_unique(resolve(kb, codes).flat_map(|a| a.controls.iter()))
}

/// Unique PPE labels, compared case-sensitively
pub fn ppe_for_activities<S: AsRef<str>>(kb: &KnowledgeBase, codes: &[S]) -> Vec<String> {
    collect_unique(resolve(kb, codes).flat_map(|a| a.typical_ppe.iter()))
}

/// Unique permit labels; activities without permits contribute nothing
pub fn permits_for_activities<S: AsRef<str>>(kb: &KnowledgeBase, codes: &[S]) -> Vec<String> {
    collect_unique(resolve(kb, codes).flat_map(|a| a.permits_required.iter()))
}

/// Selected codes that don't resolve to an activity, in input order
///
/// Aggregation skips these silently; callers use this to warn about them.
pub fn unresolved_activities<S: AsRef<str>>(kb: &KnowledgeBase, codes: &[S]) -> Vec<String> {
    collect_unique(
        codes
            .iter()
            .map(|code| code.as_ref())
            .filter(|code| kb.activity(code).is_none()),
    )
}

/// All four aggregated lists for one selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    pub hazards: Vec<String>,
    pub controls: Vec<String>,
    pub ppe: Vec<String>,
    pub permits: Vec<String>,
    /// Selected codes that contributed nothing because they didn't resolve
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
}

impl Aggregation {
    /// Aggregate a selection in one pass over the knowledge base
    pub fn for_activities<S: AsRef<str>>(kb: &KnowledgeBase, codes: &[S]) -> Self {
        Self {
            hazards: hazards_for_activities(kb, codes),
            controls: controls_for_activities(kb, codes),
            ppe: ppe_for_activities(kb, codes),
            permits: permits_for_activities(kb, codes),
            unresolved: unresolved_activities(kb, codes),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
            && self.controls.is_empty()
            && self.ppe.is_empty()
            && self.permits.is_empty()
    }
}

fn resolve<'a, S: AsRef<str>>(
    kb: &'a KnowledgeBase,
    codes: &'a [S],
) -> impl Iterator<Item = &'a Activity> + 'a {
    codes.iter().filter_map(move |code| kb.activity(code.as_ref()))
}

fn collect_unique<'a, I, T>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a T>,
    T: AsRef<str> + ?Sized + 'a,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let item = item.as_ref();
        if seen.insert(item) {
            out.push(item.to_string());
        }
    }
    out
}
