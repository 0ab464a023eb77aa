//! RAMS session - a job's activity selection and risk register on disk
//!
//! Sessions are plain YAML files so they diff cleanly under version control.
//! Every selection change goes through [`RamsSession::set_selection`], which
//! reconciles the register and swaps selection and register together.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::aggregate::unresolved_activities;
use crate::core::knowledge_base::KnowledgeBase;
use crate::core::register::{reconcile, RiskRegister};
use crate::yaml::{parse_yaml, YamlError};

/// Current session file format version
pub const SESSION_VERSION: u32 = 1;

/// Errors reading or writing session files
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No session found at {}. Run 'rams init' first", .0.display())]
    NotFound(PathBuf),

    #[error("Session already exists at {}. Use --force to overwrite", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Unsupported session version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error(transparent)]
    Yaml(#[from] YamlError),

    #[error("Failed to serialize session: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Job details printed on the front sheet of the RAMS
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepared_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl ProjectDetails {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A persisted RAMS working session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamsSession {
    #[serde(default = "default_version")]
    pub version: u32,

    pub project: ProjectDetails,

    /// Selected activity codes, in selection order
    #[serde(default)]
    pub activities: Vec<String>,

    #[serde(default)]
    pub register: RiskRegister,

    /// Fingerprint of the knowledge base last reconciled against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kb_fingerprint: Option<String>,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

fn default_version() -> u32 {
    SESSION_VERSION
}

impl RamsSession {
    /// Start an empty session for a job
    pub fn new(project: ProjectDetails) -> Self {
        let now = Utc::now();
        Self {
            version: SESSION_VERSION,
            project,
            activities: Vec::new(),
            register: RiskRegister::new(),
            kb_fingerprint: None,
            created: now,
            modified: now,
        }
    }

    /// Load a session file
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            return Err(SessionError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let session: RamsSession = parse_yaml(&content, &path.display().to_string())?;
        if session.version > SESSION_VERSION {
            return Err(SessionError::UnsupportedVersion {
                found: session.version,
                expected: SESSION_VERSION,
            });
        }
        Ok(session)
    }

    /// Write the session file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yml::to_string(self).map_err(|e| SessionError::Serialize(e.to_string()))?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Create and save a new session, refusing to clobber unless `force`
    pub fn create(path: &Path, project: ProjectDetails, force: bool) -> Result<Self, SessionError> {
        if path.exists() && !force {
            return Err(SessionError::AlreadyExists(path.to_path_buf()));
        }
        let session = Self::new(project);
        session.save(path)?;
        Ok(session)
    }

    /// Replace the selection and reconcile the register
    ///
    /// Duplicate codes are dropped, keeping the first occurrence. Returns the
    /// codes that don't resolve against the knowledge base; they stay in the
    /// selection but contribute nothing.
    pub fn set_selection(&mut self, kb: &KnowledgeBase, codes: Vec<String>) -> Vec<String> {
        let mut selection: Vec<String> = Vec::with_capacity(codes.len());
        for code in codes {
            if !selection.contains(&code) {
                selection.push(code);
            }
        }

        let unresolved = unresolved_activities(kb, &selection);
        for code in &unresolved {
            tracing::warn!(activity = %code, "selected activity not found in knowledge base");
        }

        let register = reconcile(&self.register, kb, &selection);
        self.activities = selection;
        self.register = register;
        self.kb_fingerprint = Some(kb.fingerprint().to_string());
        self.touch();
        unresolved
    }

    /// Add activities to the selection
    pub fn select(&mut self, kb: &KnowledgeBase, codes: &[String]) -> Vec<String> {
        let mut next = self.activities.clone();
        next.extend(codes.iter().cloned());
        self.set_selection(kb, next)
    }

    /// Remove activities from the selection
    pub fn deselect(&mut self, kb: &KnowledgeBase, codes: &[String]) -> Vec<String> {
        let next = self
            .activities
            .iter()
            .filter(|code| !codes.contains(code))
            .cloned()
            .collect();
        self.set_selection(kb, next)
    }

    /// Re-run reconciliation with the current selection
    pub fn refresh(&mut self, kb: &KnowledgeBase) -> Vec<String> {
        let current = self.activities.clone();
        self.set_selection(kb, current)
    }

    /// Whether the session was last reconciled against a different knowledge base
    pub fn is_stale(&self, kb: &KnowledgeBase) -> bool {
        self.kb_fingerprint
            .as_deref()
            .map(|fp| fp != kb.fingerprint())
            .unwrap_or(false)
    }

    /// Mark the session as modified now
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}
