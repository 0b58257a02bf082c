//! CLI entry point - the composition root.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use sy50_cli::{Cli, CliConfig, Commands, bootstrap, handlers, load_config};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .try_init()
        .ok(); // Ignore error if already initialized
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables (SY50_CONFIG, RUST_LOG)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Comparing needs no configuration.
    if let Commands::Compare { current, target } = &command {
        return handlers::compare::execute(current, target);
    }

    let config = match load_config(&CliConfig {
        config_path: cli.config,
        target_override: cli.target,
        no_prompt: cli.no_prompt,
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    };
    let ctx = bootstrap(config);

    match command {
        Commands::Status => handlers::status::execute(&ctx).await?,
        Commands::Check { json } => handlers::check::execute(&ctx, json).await?,
        Commands::Watch { interval_secs } => handlers::watch::execute(&ctx, interval_secs).await?,
        Commands::Compare { .. } => {}
    }

    Ok(())
}
