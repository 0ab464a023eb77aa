//! `rams init` command - start a session for a job

use chrono::NaiveDate;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::session_path;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::session::{ProjectDetails, RamsSession};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Project or job name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Client name
    #[arg(long)]
    pub client: Option<String>,

    /// Site address
    #[arg(long)]
    pub site: Option<String>,

    /// Author of the RAMS (default: `author` from config)
    #[arg(long)]
    pub prepared_by: Option<String>,

    /// Planned start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Overwrite an existing session
    #[arg(long, short = 'f')]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let path = session_path(global);

    let project = ProjectDetails {
        name: args.name,
        client: args.client,
        site_address: args.site,
        prepared_by: args.prepared_by.or_else(|| config.author.clone()),
        start_date: args.start,
    };

    let session = RamsSession::create(&path, project, args.force).into_diagnostic()?;
    tracing::info!(path = %path.display(), "session created");

    match global.output {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "project": session.project.name,
                "path": path.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        }
        _ => {
            println!(
                "{} Initialized RAMS session for {} at {}",
                style("✓").green(),
                style(&session.project.name).cyan(),
                path.display()
            );
            println!("  Next: rams select <activity>...  (see 'rams kb activities')");
        }
    }
    Ok(())
}
