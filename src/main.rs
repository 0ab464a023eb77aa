use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rams::cli::commands;
use rams::cli::{Cli, Commands};
use rams::core::Config;

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let mut cli = Cli::parse();

    let cwd = std::env::current_dir().into_diagnostic()?;
    let config = Config::load(&cwd).into_diagnostic()?;

    // Flags and env vars win over config files
    if cli.global.session.is_none() {
        cli.global.session = Some(config.session_file());
    }
    if cli.global.kb.is_none() {
        cli.global.kb = config.knowledge_base.clone();
    }

    rams::telemetry::init(cli.global.verbose, config.log_level()).into_diagnostic()?;

    let global = &cli.global;
    match cli.command {
        Commands::Kb(cmd) => commands::kb::run(cmd, global),
        Commands::Validate(args) => commands::validate::run(args, global),
        Commands::Aggregate(args) => commands::aggregate::run(args, global),
        Commands::Init(args) => commands::init::run(args, global, &config),
        Commands::Select(args) => commands::select::run_select(args, global),
        Commands::Deselect(args) => commands::select::run_deselect(args, global),
        Commands::Refresh => commands::select::run_refresh(global),
        Commands::Register(cmd) => commands::register::run(cmd, global),
        Commands::Context => commands::context::run(global),
        Commands::Export(args) => commands::export::run(args, global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
