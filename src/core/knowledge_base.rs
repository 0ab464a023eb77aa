//! Knowledge base - read-only hazard, control and activity tables
//!
//! The knowledge base is loaded once at startup, either from the YAML files
//! embedded in the binary or from a directory of YAML files. Every load goes
//! through [`KnowledgeBase::from_tables`], which rejects duplicate codes and
//! dangling references. Aggregation relies on that integrity: a missing
//! hazard would otherwise silently undercount the risks of a job.

use miette::Diagnostic;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::entity::KnowledgeEntry;
use crate::entities::{Activity, Control, Hazard};
use crate::yaml::{parse_yaml, parse_yaml_file, YamlError};

#[derive(Embed)]
#[folder = "kb/"]
struct EmbeddedKnowledgeBase;

/// A single knowledge base YAML document
///
/// Any section may be omitted; documents are merged in path order.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseFile {
    #[serde(default)]
    pub hazards: Vec<Hazard>,

    #[serde(default)]
    pub controls: Vec<Control>,

    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl KnowledgeBaseFile {
    /// Append another document's tables to this one
    pub fn merge(&mut self, other: KnowledgeBaseFile) {
        self.hazards.extend(other.hazards);
        self.controls.extend(other.controls);
        self.activities.extend(other.activities);
    }
}

/// A single referential integrity problem
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum IntegrityIssue {
    #[error("Duplicate {kind} code '{code}'")]
    #[diagnostic(code(rams::kb::duplicate_code))]
    DuplicateCode { kind: &'static str, code: String },

    #[error("{owner_kind} '{owner}' references unknown hazard '{hazard}'")]
    #[diagnostic(code(rams::kb::dangling_hazard))]
    DanglingHazard {
        owner_kind: &'static str,
        owner: String,
        hazard: String,
    },

    #[error("activity '{activity}' references unknown control '{control}'")]
    #[diagnostic(code(rams::kb::dangling_control))]
    DanglingControl { activity: String, control: String },
}

/// Errors loading the knowledge base
#[derive(Debug, Error, Diagnostic)]
pub enum KnowledgeBaseError {
    #[error("Knowledge base failed integrity checks ({} issue(s))", .issues.len())]
    #[diagnostic(
        code(rams::kb::integrity),
        help("Every hazard and control code cited by an activity or control must be defined")
    )]
    Integrity {
        #[related]
        issues: Vec<IntegrityIssue>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("Knowledge base directory not found: {}", .0.display())]
    #[diagnostic(code(rams::kb::not_found))]
    DirectoryNotFound(PathBuf),

    #[error("Failed to read knowledge base directory: {0}")]
    #[diagnostic(code(rams::kb::walk))]
    Walk(#[from] walkdir::Error),

    #[error("Embedded knowledge base file '{0}' is not valid UTF-8")]
    #[diagnostic(code(rams::kb::encoding))]
    Encoding(String),

    #[error("Failed to fingerprint knowledge base: {0}")]
    #[diagnostic(code(rams::kb::fingerprint))]
    Fingerprint(#[from] serde_json::Error),
}

impl KnowledgeBaseError {
    /// Integrity issues, if this is an integrity failure
    pub fn issues(&self) -> &[IntegrityIssue] {
        match self {
            KnowledgeBaseError::Integrity { issues } => issues,
            _ => &[],
        }
    }
}

/// Validated, indexed knowledge base
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    hazards: Vec<Hazard>,
    controls: Vec<Control>,
    activities: Vec<Activity>,
    hazard_index: HashMap<String, usize>,
    control_index: HashMap<String, usize>,
    activity_index: HashMap<String, usize>,
    fingerprint: String,
}

/// Borrowed view of the tables used for fingerprinting
#[derive(Serialize)]
struct TablesRef<'a> {
    hazards: &'a [Hazard],
    controls: &'a [Control],
    activities: &'a [Activity],
}

impl KnowledgeBase {
    /// Build and validate a knowledge base from its three tables
    pub fn from_tables(
        hazards: Vec<Hazard>,
        controls: Vec<Control>,
        activities: Vec<Activity>,
    ) -> Result<Self, KnowledgeBaseError> {
        let mut issues = Vec::new();

        let hazard_index = build_index(&hazards, &mut issues);
        let control_index = build_index(&controls, &mut issues);
        let activity_index = build_index(&activities, &mut issues);

        for control in &controls {
            for hazard in &control.applicable_hazards {
                if !hazard_index.contains_key(hazard) {
                    issues.push(IntegrityIssue::DanglingHazard {
                        owner_kind: Control::KIND,
                        owner: control.code.clone(),
                        hazard: hazard.clone(),
                    });
                }
            }
        }

        for activity in &activities {
            for hazard in &activity.hazards {
                if !hazard_index.contains_key(hazard) {
                    issues.push(IntegrityIssue::DanglingHazard {
                        owner_kind: Activity::KIND,
                        owner: activity.code.clone(),
                        hazard: hazard.clone(),
                    });
                }
            }
            for control in &activity.controls {
                if !control_index.contains_key(control) {
                    issues.push(IntegrityIssue::DanglingControl {
                        activity: activity.code.clone(),
                        control: control.clone(),
                    });
                }
            }
        }

        if !issues.is_empty() {
            return Err(KnowledgeBaseError::Integrity { issues });
        }

        let fingerprint = fingerprint_tables(&TablesRef {
            hazards: &hazards,
            controls: &controls,
            activities: &activities,
        })?;

        tracing::debug!(
            hazards = hazards.len(),
            controls = controls.len(),
            activities = activities.len(),
            %fingerprint,
            "knowledge base validated"
        );

        Ok(Self {
            hazards,
            controls,
            activities,
            hazard_index,
            control_index,
            activity_index,
            fingerprint,
        })
    }

    /// Build from a merged knowledge base document
    pub fn from_file(file: KnowledgeBaseFile) -> Result<Self, KnowledgeBaseError> {
        Self::from_tables(file.hazards, file.controls, file.activities)
    }

    /// Load the knowledge base bundled with the binary
    pub fn embedded() -> Result<Self, KnowledgeBaseError> {
        let mut names: Vec<String> = EmbeddedKnowledgeBase::iter()
            .map(|name| name.into_owned())
            .filter(|name| name.ends_with(".yaml") || name.ends_with(".yml"))
            .collect();
        names.sort();

        let mut merged = KnowledgeBaseFile::default();
        for name in names {
            let Some(file) = EmbeddedKnowledgeBase::get(&name) else {
                continue;
            };
            let content = std::str::from_utf8(&file.data)
                .map_err(|_| KnowledgeBaseError::Encoding(name.clone()))?;
            merged.merge(parse_yaml::<KnowledgeBaseFile>(content, &name)?);
        }

        Self::from_file(merged)
    }

    /// Load every `*.yaml` / `*.yml` file under a directory
    pub fn from_dir(dir: &Path) -> Result<Self, KnowledgeBaseError> {
        if !dir.is_dir() {
            return Err(KnowledgeBaseError::DirectoryNotFound(dir.to_path_buf()));
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            let is_yaml = path
                .extension()
                .map(|ext| ext == "yaml" || ext == "yml")
                .unwrap_or(false);
            if entry.file_type().is_file() && is_yaml {
                paths.push(path.to_path_buf());
            }
        }

        let mut merged = KnowledgeBaseFile::default();
        for path in &paths {
            tracing::debug!(path = %path.display(), "loading knowledge base file");
            merged.merge(parse_yaml_file::<KnowledgeBaseFile>(path)?);
        }

        Self::from_file(merged)
    }

    /// Load from a directory if given, otherwise the embedded default
    pub fn load(dir: Option<&Path>) -> Result<Self, KnowledgeBaseError> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }

    /// Look up a hazard by exact code
    pub fn hazard(&self, code: &str) -> Option<&Hazard> {
        self.hazard_index.get(code).map(|&i| &self.hazards[i])
    }

    /// Look up a control by exact code
    pub fn control(&self, code: &str) -> Option<&Control> {
        self.control_index.get(code).map(|&i| &self.controls[i])
    }

    /// Look up an activity by exact code
    pub fn activity(&self, code: &str) -> Option<&Activity> {
        self.activity_index.get(code).map(|&i| &self.activities[i])
    }

    /// All hazards in declaration order
    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    /// All controls in declaration order
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// All activities in declaration order
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    /// Active hazards in declaration order
    pub fn active_hazards(&self) -> Vec<&Hazard> {
        active(&self.hazards)
    }

    /// Active controls in declaration order
    pub fn active_controls(&self) -> Vec<&Control> {
        active(&self.controls)
    }

    /// Active activities ordered by `sort_order`, ties in declaration order
    pub fn active_activities(&self) -> Vec<&Activity> {
        let mut activities = active(&self.activities);
        activities.sort_by_key(|a| a.sort_order);
        activities
    }

    /// SHA-256 over the canonical JSON form of all three tables
    ///
    /// Sessions record this so that a session reconciled against a different
    /// knowledge base can be flagged as stale.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn fingerprint_tables(tables: &TablesRef<'_>) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(tables)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

fn active<T: KnowledgeEntry>(entries: &[T]) -> Vec<&T> {
    entries.iter().filter(|e| e.is_active()).collect()
}

fn build_index<T: KnowledgeEntry>(
    entries: &[T],
    issues: &mut Vec<IntegrityIssue>,
) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        if index.insert(entry.code().to_string(), i).is_some() {
            issues.push(IntegrityIssue::DuplicateCode {
                kind: T::KIND,
                code: entry.code().to_string(),
            });
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::activity::ActivityCategory;
    use crate::entities::control::{ControlCategory, Effectiveness};
    use crate::entities::hazard::{HazardCategory, SeverityTier};

    fn hazard(code: &str) -> Hazard {
        Hazard::new(code, code, HazardCategory::Shock, SeverityTier::High)
    }

    fn control(code: &str, hazards: &[&str]) -> Control {
        Control::new(code, code, ControlCategory::Engineering, Effectiveness::High)
            .with_hazards(hazards.iter().copied())
    }

    #[test]
    fn test_embedded_knowledge_base_is_consistent() {
        let kb = KnowledgeBase::embedded().unwrap();
        assert!(kb.hazard("arc_flash").is_some());
        assert!(kb.control("lockout_tagout").is_some());
        assert!(kb.activity("distribution_board").is_some());
        assert!(kb.activity("data_cable").is_some());
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let kb = KnowledgeBase::embedded().unwrap();
        assert!(kb.hazard("Arc_Flash").is_none());
        assert!(kb.hazard("arc_flash ").is_none());
        assert!(kb.activity("unknown").is_none());
    }

    #[test]
    fn test_active_activities_sorted_and_filtered() {
        let kb = KnowledgeBase::embedded().unwrap();
        let active = kb.active_activities();
        assert!(active.iter().all(|a| a.is_active));
        assert!(!active.iter().any(|a| a.code == "switchgear_retrofit"));
        assert!(active.windows(2).all(|w| w[0].sort_order <= w[1].sort_order));
        // Inactive entries are still resolvable by code
        assert!(kb.activity("switchgear_retrofit").is_some());
    }

    #[test]
    fn test_active_hazards_preserve_declaration_order() {
        let kb = KnowledgeBase::embedded().unwrap();
        let active: Vec<&str> = kb.active_hazards().iter().map(|h| h.code.as_str()).collect();
        let declared: Vec<&str> = kb
            .hazards()
            .iter()
            .filter(|h| h.is_active)
            .map(|h| h.code.as_str())
            .collect();
        assert_eq!(active, declared);
        assert!(!active.contains(&"stored_energy"));
    }

    #[test]
    fn test_dangling_activity_hazard_is_fatal() {
        let activity = Activity::new("db", "Board", ActivityCategory::Installation)
            .with_hazards(["arc_flash", "ghost_hazard"]);
        let err = KnowledgeBase::from_tables(vec![hazard("arc_flash")], vec![], vec![activity])
            .unwrap_err();

        assert_eq!(
            err.issues(),
            &[IntegrityIssue::DanglingHazard {
                owner_kind: "activity",
                owner: "db".to_string(),
                hazard: "ghost_hazard".to_string(),
            }]
        );
    }

    #[test]
    fn test_dangling_control_references_are_all_reported() {
        let activity = Activity::new("db", "Board", ActivityCategory::Installation)
            .with_controls(["isolation", "missing_control"]);
        let err = KnowledgeBase::from_tables(
            vec![hazard("arc_flash")],
            vec![control("isolation", &["arc_flash", "missing_hazard"])],
            vec![activity],
        )
        .unwrap_err();

        assert_eq!(err.issues().len(), 2);
        assert!(err.issues().contains(&IntegrityIssue::DanglingControl {
            activity: "db".to_string(),
            control: "missing_control".to_string(),
        }));
        assert!(err.issues().contains(&IntegrityIssue::DanglingHazard {
            owner_kind: "control",
            owner: "isolation".to_string(),
            hazard: "missing_hazard".to_string(),
        }));
    }

    #[test]
    fn test_duplicate_codes_are_fatal() {
        let err = KnowledgeBase::from_tables(vec![hazard("arc_flash"), hazard("arc_flash")], vec![], vec![])
            .unwrap_err();
        assert!(matches!(
            err.issues(),
            [IntegrityIssue::DuplicateCode { kind: "hazard", .. }]
        ));
    }

    #[test]
    fn test_fingerprint_is_stable_and_content_sensitive() {
        let a = KnowledgeBase::from_tables(vec![hazard("arc_flash")], vec![], vec![]).unwrap();
        let b = KnowledgeBase::from_tables(vec![hazard("arc_flash")], vec![], vec![]).unwrap();
        let c = KnowledgeBase::from_tables(vec![hazard("electrical_fire")], vec![], vec![]).unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_fingerprint_hashes_serialized_tables() {
        let hazards = vec![hazard("arc_flash")];
        let kb = KnowledgeBase::from_tables(hazards.clone(), vec![], vec![]).unwrap();

        let tables = TablesRef {
            hazards: &hazards,
            controls: &[],
            activities: &[],
        };
        let expected = format!("{:x}", Sha256::digest(serde_json::to_vec(&tables).unwrap()));
        assert_eq!(kb.fingerprint(), expected);
        assert_ne!(kb.fingerprint(), format!("{:x}", Sha256::digest(b"")));
    }
}
