//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    aggregate::AggregateArgs, completions::CompletionsArgs, export::ExportArgs, init::InitArgs,
    kb::KbCommands, register::RegisterCommands, select::SelectArgs, validate::ValidateArgs,
};

#[derive(Parser, Debug)]
#[command(name = "rams")]
#[command(version)]
#[command(about = "Activity-to-risk aggregation for Risk Assessment Method Statements")]
#[command(
    long_about = "Select the work activities for a job, and rams derives the hazards, control \
                  measures, PPE and permits they imply, scores each hazard on a 5x5 risk matrix \
                  and keeps an editable risk register in step with the selection."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output: OutputFormat,

    /// Session file [default: rams.session.yaml]
    #[arg(long, global = true, env = "RAMS_SESSION")]
    pub session: Option<PathBuf>,

    /// Knowledge base directory replacing the built-in one
    #[arg(long, global = true, env = "RAMS_KB")]
    pub kb: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tables for people, plain lists when piped
    #[default]
    Auto,
    Table,
    Json,
    Yaml,
    /// One code or ID per line
    Id,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the knowledge base
    #[command(subcommand)]
    Kb(KbCommands),

    /// Check knowledge base integrity
    Validate(ValidateArgs),

    /// Show the hazards, controls, PPE and permits implied by activities
    Aggregate(AggregateArgs),

    /// Start a new RAMS session for a job
    Init(InitArgs),

    /// Add activities to the session
    Select(SelectArgs),

    /// Remove activities from the session
    Deselect(SelectArgs),

    /// Reconcile the register against the current knowledge base
    Refresh,

    /// View and edit the risk register
    #[command(subcommand)]
    Register(RegisterCommands),

    /// Print the document context handed to document generation
    Context,

    /// Render the session as a document
    Export(ExportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
