//! `rams aggregate` command - what a set of activities implies

use console::style;
use miette::Result;

use crate::cli::helpers::load_kb;
use crate::cli::output::{effective_format, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::aggregate::Aggregation;
use crate::core::knowledge_base::KnowledgeBase;

#[derive(clap::Args, Debug)]
pub struct AggregateArgs {
    /// Activity codes, in selection order
    #[arg(required = true)]
    pub activities: Vec<String>,
}

pub fn run(args: AggregateArgs, global: &GlobalOpts) -> Result<()> {
    let kb = load_kb(global)?;
    let aggregation = Aggregation::for_activities(&kb, &args.activities);

    for code in &aggregation.unresolved {
        tracing::warn!(activity = %code, "unknown activity code ignored");
    }

    let format = effective_format(global.output, false);
    if print_structured(&aggregation, format)? {
        return Ok(());
    }
    match format {
        OutputFormat::Id => aggregation.hazards.iter().for_each(|h| println!("{}", h)),
        _ => print_aggregation(&kb, &aggregation),
    }
    Ok(())
}

fn print_aggregation(kb: &KnowledgeBase, aggregation: &Aggregation) {
    println!("{}", style("Hazards").bold());
    for code in &aggregation.hazards {
        match kb.hazard(code) {
            Some(h) => println!("  {} {} ({})", style(code).cyan(), h.name, h.severity),
            None => println!("  {}", code),
        }
    }

    println!("\n{}", style("Controls").bold());
    for code in &aggregation.controls {
        let name = kb.control(code).map(|c| c.name.as_str()).unwrap_or("");
        println!("  {} {}", style(code).cyan(), name);
    }

    println!("\n{}", style("PPE").bold());
    for item in &aggregation.ppe {
        println!("  - {}", item);
    }

    println!("\n{}", style("Permits").bold());
    if aggregation.permits.is_empty() {
        println!("  {}", style("none").dim());
    }
    for permit in &aggregation.permits {
        println!("  - {}", permit);
    }

    if !aggregation.unresolved.is_empty() {
        println!(
            "\n{} unknown activities: {}",
            style("!").yellow(),
            aggregation.unresolved.join(", ")
        );
    }
}
