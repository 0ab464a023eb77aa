//! `rams register` command - view and edit the risk register

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{load_kb, load_session, resolve_entry_id, save_session};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::{render, styled_score, EntryRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::knowledge_base::KnowledgeBase;
use crate::core::register::AddOutcome;
use crate::entities::{EntryUpdate, RiskAssessmentEntry};

#[derive(Subcommand, Debug)]
pub enum RegisterCommands {
    /// List risk entries in register order
    List,

    /// Show one entry in full
    Show(IdArgs),

    /// Track a hazard no selected activity implies
    Add(AddArgs),

    /// Edit scores, notes or additional controls of an entry
    Update(UpdateArgs),

    /// Remove an entry
    Remove(RemoveArgs),
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    /// Entry ID or position (e.g., @2)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Hazard code from the knowledge base
    pub hazard: String,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Entry ID or position (e.g., @2)
    pub id: String,

    /// Initial likelihood (1-5)
    #[arg(long, short = 'l')]
    pub likelihood: Option<u8>,

    /// Initial severity (1-5)
    #[arg(long, short = 's')]
    pub severity: Option<u8>,

    /// Residual likelihood (1-5)
    #[arg(long)]
    pub residual_likelihood: Option<u8>,

    /// Residual severity (1-5)
    #[arg(long)]
    pub residual_severity: Option<u8>,

    /// Replace the entry notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Append a free-text control measure (repeatable)
    #[arg(long = "add-control")]
    pub add_controls: Vec<String>,

    /// Clear the free-text control measures before appending
    #[arg(long)]
    pub clear_controls: bool,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Entry ID or position (e.g., @2)
    pub id: String,

    /// Skip confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: RegisterCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RegisterCommands::List => run_list(global),
        RegisterCommands::Show(args) => run_show(args, global),
        RegisterCommands::Add(args) => run_add(args, global),
        RegisterCommands::Update(args) => run_update(args, global),
        RegisterCommands::Remove(args) => run_remove(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let kb = load_kb(global)?;
    let session = load_session(global, &kb)?;
    let entries = session.register.entries();

    let format = effective_format(global.output, true);
    if print_structured(entries, format)? {
        return Ok(());
    }
    match format {
        OutputFormat::Id => entries.iter().for_each(|e| println!("{}", e.id)),
        _ => {
            if entries.is_empty() {
                println!("No risk entries. Select activities with 'rams select'.");
                return Ok(());
            }
            let rows = entries
                .iter()
                .enumerate()
                .map(|(i, e)| EntryRow::new(i, e, &kb))
                .collect();
            println!("{}", render::<EntryRow>(rows));

            let levels = session.register.residual_levels();
            let elevated = levels.high + levels.very_high;
            if elevated > 0 {
                println!(
                    "\n{} entries, {} with high residual risk",
                    entries.len(),
                    style(elevated).red()
                );
            } else {
                println!("\n{} entries", entries.len());
            }
        }
    }
    Ok(())
}

fn run_show(args: IdArgs, global: &GlobalOpts) -> Result<()> {
    let kb = load_kb(global)?;
    let session = load_session(global, &kb)?;
    let id = resolve_entry_id(&session.register, &args.id)?;
    let entry = session
        .register
        .get(&id)
        .ok_or_else(|| miette::miette!("No risk entry with ID {}", id))?;

    let format = effective_format(global.output, false);
    if !print_structured(entry, format)? {
        print_entry(entry, &kb);
    }
    Ok(())
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let kb = load_kb(global)?;
    let mut session = load_session(global, &kb)?;

    let outcome = session
        .register
        .add_custom_entry(&kb, &args.hazard)
        .into_diagnostic()?;

    match outcome {
        AddOutcome::Added(id) => {
            session.touch();
            save_session(global, &session)?;
            match global.output {
                OutputFormat::Id => println!("{}", id),
                _ => println!(
                    "{} Added custom entry {} for {}",
                    style("✓").green(),
                    style(id).cyan(),
                    args.hazard
                ),
            }
        }
        AddOutcome::AlreadyTracked(id) => match global.output {
            OutputFormat::Id => println!("{}", id),
            _ => println!(
                "{} already tracked by entry {}",
                args.hazard,
                style(id).cyan()
            ),
        },
    }
    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let kb = load_kb(global)?;
    let mut session = load_session(global, &kb)?;
    let id = resolve_entry_id(&session.register, &args.id)?;

    let additional_controls = if args.clear_controls || !args.add_controls.is_empty() {
        let mut controls = if args.clear_controls {
            Vec::new()
        } else {
            session
                .register
                .get(&id)
                .map(|e| e.additional_controls.clone())
                .unwrap_or_default()
        };
        controls.extend(args.add_controls);
        Some(controls)
    } else {
        None
    };

    let update = EntryUpdate {
        initial_likelihood: args.likelihood,
        initial_severity: args.severity,
        residual_likelihood: args.residual_likelihood,
        residual_severity: args.residual_severity,
        notes: args.notes,
        additional_controls,
    };
    if update.is_empty() {
        return Err(miette::miette!(
            "Nothing to update. Pass --likelihood, --severity, --notes or --add-control"
        ));
    }

    session.register.update_entry(&id, update).into_diagnostic()?;
    session.touch();
    save_session(global, &session)?;

    if let Some(entry) = session.register.get(&id) {
        if !print_structured(entry, global.output)? {
            println!(
                "{} Updated {}: initial {}, residual {}",
                style("✓").green(),
                style(id).cyan(),
                styled_score(&entry.initial),
                styled_score(&entry.residual)
            );
        }
    }
    Ok(())
}

fn run_remove(args: RemoveArgs, global: &GlobalOpts) -> Result<()> {
    let kb = load_kb(global)?;
    let mut session = load_session(global, &kb)?;
    let id = resolve_entry_id(&session.register, &args.id)?;

    let Some(entry) = session.register.get(&id) else {
        return Err(miette::miette!("No risk entry with ID {}", id));
    };
    let hazard = entry.hazard.clone();
    let is_custom = entry.is_custom;

    if !args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Remove risk entry for {}?", hazard))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    session.register.remove_entry(&id).into_diagnostic()?;
    session.touch();
    save_session(global, &session)?;

    println!("{} Removed entry for {}", style("✓").green(), hazard);
    if !is_custom {
        println!(
            "  {}",
            style("It returns on the next selection change while its activity stays selected")
                .dim()
        );
    }
    Ok(())
}

fn print_entry(entry: &RiskAssessmentEntry, kb: &KnowledgeBase) {
    let hazard_name = kb
        .hazard(&entry.hazard)
        .map(|h| h.name.as_str())
        .unwrap_or(&entry.hazard);

    println!("{} {}", style("Entry").bold(), style(entry.id).cyan());
    println!(
        "{}: {} ({})",
        style("Hazard").bold(),
        hazard_name,
        entry.hazard
    );
    if entry.is_custom {
        println!("{}", style("(custom entry)").dim());
    }
    println!("{}: {}", style("Initial").bold(), entry.initial);
    println!("{}: {}", style("Residual").bold(), entry.residual);

    if !entry.controls.is_empty() {
        println!("{}:", style("Controls").bold());
        for code in &entry.controls {
            let name = kb.control(code).map(|c| c.name.as_str()).unwrap_or(code);
            println!("  - {}", name);
        }
    }
    if !entry.additional_controls.is_empty() {
        println!("{}:", style("Additional controls").bold());
        for control in &entry.additional_controls {
            println!("  - {}", control);
        }
    }
    if !entry.notes.is_empty() {
        println!("{}: {}", style("Notes").bold(), entry.notes);
    }
    println!(
        "{}: {}",
        style("Created").bold(),
        entry.created.format("%Y-%m-%d %H:%M")
    );
}
