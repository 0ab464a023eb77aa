//! `rams export` command - render the session as a document

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::{load_kb, load_session};
use crate::cli::GlobalOpts;
use crate::core::context::DocumentContext;
use crate::export::{CsvRenderer, DocumentRenderer, MarkdownRenderer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// RAMS draft as Markdown
    #[default]
    Markdown,
    /// Risk register as CSV
    Csv,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Document format
    #[arg(long, short = 'f', value_enum, default_value_t = ExportFormat::Markdown)]
    pub format: ExportFormat,

    /// Write to a file instead of stdout
    #[arg(long = "out", short = 'O')]
    pub out: Option<PathBuf>,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let kb = load_kb(global)?;
    let session = load_session(global, &kb)?;
    let context = DocumentContext::build(&kb, &session);

    let renderer: Box<dyn DocumentRenderer> = match args.format {
        ExportFormat::Markdown => Box::new(MarkdownRenderer::new().into_diagnostic()?),
        ExportFormat::Csv => Box::new(CsvRenderer),
    };
    let rendered = renderer.render(&context).into_diagnostic()?;

    match args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).into_diagnostic()?;
            }
            fs::write(&path, rendered).into_diagnostic()?;
            tracing::info!(path = %path.display(), format = renderer.extension(), "exported");
            eprintln!("{} Wrote {}", style("✓").green(), path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
