//! Shared helper functions for CLI commands

use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::config::DEFAULT_SESSION_FILE;
use crate::core::identity::EntryId;
use crate::core::knowledge_base::KnowledgeBase;
use crate::core::register::RiskRegister;
use crate::core::session::RamsSession;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Session path from `--session`, falling back to the default file name
pub fn session_path(global: &GlobalOpts) -> PathBuf {
    global
        .session
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE))
}

/// Knowledge base from `--kb`, or the built-in one
pub fn load_kb(global: &GlobalOpts) -> Result<KnowledgeBase> {
    Ok(KnowledgeBase::load(global.kb.as_deref())?)
}

/// Load the session and warn when its knowledge base has changed
pub fn load_session(global: &GlobalOpts, kb: &KnowledgeBase) -> Result<RamsSession> {
    let path = session_path(global);
    let session = RamsSession::load(&path).into_diagnostic()?;
    if session.is_stale(kb) {
        tracing::warn!(
            path = %path.display(),
            "knowledge base changed since this session was last reconciled; run 'rams refresh'"
        );
    }
    Ok(session)
}

pub fn save_session(global: &GlobalOpts, session: &RamsSession) -> Result<()> {
    session.save(&session_path(global)).into_diagnostic()
}

/// Resolve a full `RA-` ID or an `@N` position (1-based) in the register
pub fn resolve_entry_id(register: &RiskRegister, input: &str) -> Result<EntryId> {
    if let Some(index) = input.strip_prefix('@') {
        let n: usize = index
            .parse()
            .map_err(|_| miette::miette!("Invalid entry position: {}", input))?;
        return n
            .checked_sub(1)
            .and_then(|i| register.entries().get(i))
            .map(|entry| entry.id)
            .ok_or_else(|| {
                miette::miette!(
                    "No entry at position {} (register has {} entries)",
                    input,
                    register.len()
                )
            });
    }
    input.parse::<EntryId>().into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RiskAssessmentEntry;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("Électricité", 6), "Éle...");
    }

    #[test]
    fn test_resolve_entry_position() {
        let register = RiskRegister::from_entries(vec![
            RiskAssessmentEntry::custom("arc_flash"),
            RiskAssessmentEntry::custom("slips_trips"),
        ]);
        let second = register.entries()[1].id;

        assert_eq!(resolve_entry_id(&register, "@2").unwrap(), second);
        assert_eq!(
            resolve_entry_id(&register, &second.to_string()).unwrap(),
            second
        );
        assert!(resolve_entry_id(&register, "@0").is_err());
        assert!(resolve_entry_id(&register, "@3").is_err());
        assert!(resolve_entry_id(&register, "@x").is_err());
        assert!(resolve_entry_id(&register, "HAZ-1").is_err());
    }
}
