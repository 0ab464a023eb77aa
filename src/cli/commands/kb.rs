//! `rams kb` command - browse the knowledge base

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::load_kb;
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::{render, ActivityRow, ControlRow, HazardRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::knowledge_base::KnowledgeBase;
use crate::entities::{Activity, Control, Hazard};

#[derive(Subcommand, Debug)]
pub enum KbCommands {
    /// List activities in display order
    Activities(ListArgs),

    /// List hazards
    Hazards(ListArgs),

    /// List control measures
    Controls(ListArgs),

    /// Show an activity, hazard or control by code
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Include inactive entries
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Activity, hazard or control code
    pub code: String,
}

pub fn run(cmd: KbCommands, global: &GlobalOpts) -> Result<()> {
    let kb = load_kb(global)?;
    match cmd {
        KbCommands::Activities(args) => run_activities(&kb, args, global),
        KbCommands::Hazards(args) => run_hazards(&kb, args, global),
        KbCommands::Controls(args) => run_controls(&kb, args, global),
        KbCommands::Show(args) => run_show(&kb, args, global),
    }
}

fn run_activities(kb: &KnowledgeBase, args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let activities: Vec<&Activity> = if args.all {
        let mut all: Vec<&Activity> = kb.activities().iter().collect();
        all.sort_by_key(|a| a.sort_order);
        all
    } else {
        kb.active_activities()
    };

    let format = effective_format(global.output, true);
    if print_structured(&activities, format)? {
        return Ok(());
    }
    match format {
        OutputFormat::Id => activities.iter().for_each(|a| println!("{}", a.code)),
        _ => {
            let rows = activities.iter().map(|a| ActivityRow::from(*a)).collect();
            println!("{}", render::<ActivityRow>(rows));
            println!("\n{} activities", activities.len());
        }
    }
    Ok(())
}

fn run_hazards(kb: &KnowledgeBase, args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let hazards: Vec<&Hazard> = if args.all {
        kb.hazards().iter().collect()
    } else {
        kb.active_hazards()
    };

    let format = effective_format(global.output, true);
    if print_structured(&hazards, format)? {
        return Ok(());
    }
    match format {
        OutputFormat::Id => hazards.iter().for_each(|h| println!("{}", h.code)),
        _ => {
            let rows = hazards.iter().map(|h| HazardRow::from(*h)).collect();
            println!("{}", render::<HazardRow>(rows));
            println!("\n{} hazards", hazards.len());
        }
    }
    Ok(())
}

fn run_controls(kb: &KnowledgeBase, args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let controls: Vec<&Control> = if args.all {
        kb.controls().iter().collect()
    } else {
        kb.active_controls()
    };

    let format = effective_format(global.output, true);
    if print_structured(&controls, format)? {
        return Ok(());
    }
    match format {
        OutputFormat::Id => controls.iter().for_each(|c| println!("{}", c.code)),
        _ => {
            let rows = controls.iter().map(|c| ControlRow::from(*c)).collect();
            println!("{}", render::<ControlRow>(rows));
            println!("\n{} controls", controls.len());
        }
    }
    Ok(())
}

fn run_show(kb: &KnowledgeBase, args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let format = effective_format(global.output, false);
    let code = args.code.as_str();

    if let Some(activity) = kb.activity(code) {
        if !print_structured(activity, format)? {
            print_activity(activity);
        }
    } else if let Some(hazard) = kb.hazard(code) {
        if !print_structured(hazard, format)? {
            print_hazard(hazard);
        }
    } else if let Some(control) = kb.control(code) {
        if !print_structured(control, format)? {
            print_control(control);
        }
    } else {
        return Err(miette::miette!(
            "'{}' is not an activity, hazard or control code",
            code
        ));
    }
    Ok(())
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}:", style(label).bold());
    for item in items {
        println!("  - {}", item);
    }
}

fn print_activity(activity: &Activity) {
    println!("{} {}", style("Activity").bold(), style(&activity.code).cyan());
    println!("{}: {}", style("Name").bold(), activity.name);
    println!("{}: {}", style("Category").bold(), activity.category);
    if !activity.is_active {
        println!("{}", style("(inactive)").dim());
    }
    if !activity.description.is_empty() {
        println!("\n{}\n", activity.description);
    }
    print_list("Hazards", &activity.hazards);
    print_list("Controls", &activity.controls);
    print_list("PPE", &activity.typical_ppe);
    print_list("Permits", &activity.permits_required);
    print_list("Method", &activity.method_statement);
    if let Some(competency) = &activity.competency {
        println!("{}: {}", style("Competency").bold(), competency);
    }
}

fn print_hazard(hazard: &Hazard) {
    println!("{} {}", style("Hazard").bold(), style(&hazard.code).cyan());
    println!("{}: {}", style("Name").bold(), hazard.name);
    println!("{}: {}", style("Category").bold(), hazard.category);
    println!("{}: {}", style("Severity").bold(), hazard.severity);
    if let Some(regulation) = &hazard.regulation {
        println!("{}: {}", style("Regulation").bold(), regulation);
    }
    if !hazard.is_active {
        println!("{}", style("(inactive)").dim());
    }
    if !hazard.description.is_empty() {
        println!("\n{}\n", hazard.description);
    }
    print_list("Risk factors", &hazard.risk_factors);
    print_list("Persons at risk", &hazard.persons_at_risk);
}

fn print_control(control: &Control) {
    println!("{} {}", style("Control").bold(), style(&control.code).cyan());
    println!("{}: {}", style("Name").bold(), control.name);
    println!("{}: {}", style("Category").bold(), control.category);
    println!("{}: {}", style("Effectiveness").bold(), control.effectiveness);
    if !control.is_active {
        println!("{}", style("(inactive)").dim());
    }
    if !control.description.is_empty() {
        println!("\n{}\n", control.description);
    }
    print_list("Applies to", &control.applicable_hazards);
    if let Some(notes) = &control.implementation_notes {
        println!("{}: {}", style("Implementation").bold(), notes);
    }
    if let Some(verification) = &control.verification_required {
        println!("{}: {}", style("Verification").bold(), verification);
    }
}
