//! `rams validate` command - check knowledge base integrity

use console::style;
use miette::Result;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::entity::KnowledgeEntry;
use crate::core::knowledge_base::{KnowledgeBase, KnowledgeBaseError};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Knowledge base directory (default: --kb, else the built-in one)
    #[arg()]
    pub dir: Option<PathBuf>,

    /// Strict mode - warnings become errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let dir = args.dir.or_else(|| global.kb.clone());
    let source = dir
        .as_ref()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "built-in knowledge base".to_string());

    println!("{} Validating {}...\n", style("→").blue(), source);

    let kb = match KnowledgeBase::load(dir.as_deref()) {
        Ok(kb) => kb,
        Err(KnowledgeBaseError::Integrity { issues }) => {
            for issue in &issues {
                println!("{} {}", style("✗").red(), issue);
            }
            return Err(miette::miette!(
                "Validation failed: {} integrity error(s)",
                issues.len()
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let warnings = lint(&kb);
    for warning in &warnings {
        println!("{} {}", style("!").yellow(), warning);
    }

    println!(
        "{} {} activities, {} hazards, {} controls",
        style("✓").green(),
        kb.activities().len(),
        kb.hazards().len(),
        kb.controls().len()
    );
    println!("  fingerprint {}", style(kb.fingerprint()).dim());

    if args.strict && !warnings.is_empty() {
        return Err(miette::miette!(
            "Validation failed: {} warning(s) in strict mode",
            warnings.len()
        ));
    }
    Ok(())
}

/// Findings that don't break aggregation but are probably data mistakes
fn lint(kb: &KnowledgeBase) -> Vec<String> {
    let mut warnings = Vec::new();

    for activity in kb.active_activities() {
        if !activity.has_hazards() {
            warnings.push(format!(
                "{} implies no hazards and will add nothing to the register",
                label(activity)
            ));
        }
        for hazard in &activity.hazards {
            let covered = activity
                .controls
                .iter()
                .filter_map(|code| kb.control(code))
                .any(|c| c.applies_to(hazard));
            if !covered {
                warnings.push(format!(
                    "{} lists no control for hazard '{}'",
                    label(activity),
                    hazard
                ));
            }
        }
    }

    let cited: HashSet<&str> = kb
        .activities()
        .iter()
        .flat_map(|a| a.hazards.iter().map(String::as_str))
        .collect();
    for hazard in kb.active_hazards() {
        if !cited.contains(hazard.code.as_str()) {
            warnings.push(format!(
                "{} is not implied by any activity",
                label(hazard)
            ));
        }
    }

    warnings
}

/// `kind 'code' (Name)` for warning messages
fn label<T: KnowledgeEntry>(entry: &T) -> String {
    format!("{} '{}' ({})", T::KIND, entry.code(), entry.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge_base::KnowledgeBaseFile;
    use crate::entities::activity::ActivityCategory;
    use crate::entities::control::{ControlCategory, Effectiveness};
    use crate::entities::hazard::{HazardCategory, SeverityTier};
    use crate::entities::{Activity, Control, Hazard};

    #[test]
    fn test_lint_flags_uncovered_hazard_and_orphans() {
        let file = KnowledgeBaseFile {
            hazards: vec![
                Hazard::new("h1", "H1", HazardCategory::Shock, SeverityTier::High),
                Hazard::new("h2", "H2", HazardCategory::Fire, SeverityTier::Low),
                Hazard::new("h3", "H3", HazardCategory::Burn, SeverityTier::Low),
            ],
            controls: vec![Control::new(
                "c1",
                "C1",
                ControlCategory::Engineering,
                Effectiveness::High,
            )
            .with_hazards(["h1"])],
            activities: vec![
                Activity::new("a1", "A1", ActivityCategory::Installation)
                    .with_hazards(["h1", "h2"])
                    .with_controls(["c1"]),
                Activity::new("a2", "A2", ActivityCategory::Cabling),
            ],
        };
        let kb = KnowledgeBase::from_file(file).unwrap();
        let warnings = lint(&kb);

        assert_eq!(warnings.len(), 3);
        assert_eq!(warnings[0], "activity 'a1' (A1) lists no control for hazard 'h2'");
        assert!(warnings[1].starts_with("activity 'a2' (A2) implies no hazards"));
        assert_eq!(warnings[2], "hazard 'h3' (H3) is not implied by any activity");
    }
}
