//! `rams select` / `rams deselect` / `rams refresh` - change the activity selection

use console::style;
use miette::Result;

use crate::cli::helpers::{load_kb, load_session, save_session};
use crate::cli::output::print_structured;
use crate::cli::GlobalOpts;
use crate::core::session::RamsSession;

#[derive(clap::Args, Debug)]
pub struct SelectArgs {
    /// Activity codes
    #[arg(required = true)]
    pub activities: Vec<String>,
}

pub fn run_select(args: SelectArgs, global: &GlobalOpts) -> Result<()> {
    let kb = load_kb(global)?;
    let mut session = load_session(global, &kb)?;
    let before = session.register.len();

    let unresolved = session.select(&kb, &args.activities);
    save_session(global, &session)?;
    report(&session, before, &unresolved, global)
}

pub fn run_deselect(args: SelectArgs, global: &GlobalOpts) -> Result<()> {
    let kb = load_kb(global)?;
    let mut session = load_session(global, &kb)?;
    let before = session.register.len();

    for code in &args.activities {
        if !session.activities.contains(code) {
            tracing::warn!(activity = %code, "activity was not selected");
        }
    }

    let unresolved = session.deselect(&kb, &args.activities);
    save_session(global, &session)?;
    report(&session, before, &unresolved, global)
}

pub fn run_refresh(global: &GlobalOpts) -> Result<()> {
    let kb = load_kb(global)?;
    let mut session = load_session(global, &kb)?;
    let before = session.register.len();

    let unresolved = session.refresh(&kb);
    save_session(global, &session)?;
    report(&session, before, &unresolved, global)
}

fn report(
    session: &RamsSession,
    before: usize,
    unresolved: &[String],
    global: &GlobalOpts,
) -> Result<()> {
    let summary = serde_json::json!({
        "activities": session.activities,
        "entries": session.register.len(),
        "unresolved": unresolved,
    });
    if print_structured(&summary, global.output)? {
        return Ok(());
    }

    let after = session.register.len();
    println!(
        "{} {} activities selected, {} risk entries ({:+})",
        style("✓").green(),
        session.activities.len(),
        after,
        after as i64 - before as i64
    );
    if !unresolved.is_empty() {
        println!(
            "{} unknown activities kept in selection: {}",
            style("!").yellow(),
            unresolved.join(", ")
        );
    }
    Ok(())
}
