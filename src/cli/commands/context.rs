//! `rams context` command - print the document context

use miette::Result;

use crate::cli::helpers::{load_kb, load_session};
use crate::cli::output::print_structured;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::context::DocumentContext;

/// JSON unless YAML is asked for; this output feeds other programs
pub fn run(global: &GlobalOpts) -> Result<()> {
    let kb = load_kb(global)?;
    let session = load_session(global, &kb)?;
    let context = DocumentContext::build(&kb, &session);

    let format = match global.output {
        OutputFormat::Yaml => OutputFormat::Yaml,
        _ => OutputFormat::Json,
    };
    print_structured(&context, format)?;
    tracing::debug!(entries = context.risk_entries.len(), "document context built");
    Ok(())
}

