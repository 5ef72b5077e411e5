//! Ecolens CLI - Command-line interface for product-data intake.

use clap::Parser;
use ecolens_cli::commands;
use ecolens_cli::config::{home_dir, OutputFormat};
use ecolens_cli::repl;
use ecolens_cli::{Cli, Command, Config, Formatter, RemoteApp};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("ECOLENS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let formatter = Formatter::new(
        cli.format.map(Into::into).unwrap_or(OutputFormat::Table),
        !cli.no_color,
    );

    if let Err(e) = run(cli).await {
        if !e.is_reported() {
            eprintln!("{}", formatter.error(&e.to_string()));
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> ecolens_cli::Result<()> {
    let dir = home_dir(cli.home.as_deref())?;

    // Load or create config
    let mut config = Config::load(&dir)?;
    config.save_default();

    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&mut config, &formatter).await?;
        }
        Some(Command::Profile(args)) => {
            commands::execute_profile(args, &mut config, &formatter)?;
        }
        Some(cmd) => {
            let mut app = RemoteApp::open(&config)?;
            commands::execute_workflow_command(cmd, &mut app, &formatter).await?;
        }
    }

    Ok(())
}
