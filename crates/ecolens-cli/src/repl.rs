//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! The REPL keeps one workflow run alive between commands, so the state
//! shown in the prompt is the live state rather than one restored from the
//! session file.

use crate::app::RemoteApp;
use crate::cli::{
    AnalyzeArgs, Command, DataSourceArg, DatasetAction, DatasetArgs, EditArgs, LoginArgs,
    ProfileAction, ProfileArgs, SubmitArgs,
};
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use clap::ValueEnum;
use ecolens_domain::Field;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::warn;

/// Run the interactive REPL.
pub async fn run_repl(config: &mut Config, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("Ecolens REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;

    let history_path = config.history_path();
    let _ = editor.load_history(&history_path);

    let mut app = RemoteApp::open(config)?;
    app.flush(formatter);

    loop {
        let prompt = format!("ecolens [{}]> ", app.ctx.state);

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => print_help(formatter),
                    Ok(ReplCommand::Status) => println!("{}", formatter.status_line(&app.ctx)),
                    Ok(ReplCommand::Command(cmd)) => {
                        if let Err(e) = execute_repl_command(cmd, &mut app, config, formatter).await
                        {
                            if !e.is_reported() {
                                eprintln!("{}", formatter.error(&e.to_string()));
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    if let Err(e) = editor.save_history(&history_path) {
        warn!("Could not save history to {}: {}", history_path.display(), e);
    }

    Ok(())
}

/// REPL command type.
#[derive(Debug)]
enum ReplCommand {
    Exit,
    Help,
    Status,
    Command(Command),
}

/// Execute a REPL command.
async fn execute_repl_command(
    cmd: Command,
    app: &mut RemoteApp,
    config: &mut Config,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        Command::Profile(args) => {
            let switches = matches!(args.action, ProfileAction::Switch { .. });
            commands::execute_profile(args, config, formatter)?;
            if switches {
                // The run continues against the new backend.
                *app = RemoteApp::open(config)?;
            }
            Ok(())
        }
        Command::Repl => Err(CliError::NotPermitted("Already in REPL mode".to_string())),
        cmd => commands::execute_workflow_command(cmd, app, formatter).await,
    }
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    let Some((name, args)) = parts.split_first() else {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    };

    let command = match *name {
        "exit" | "quit" | "q" => return Ok(ReplCommand::Exit),
        "help" | "?" => return Ok(ReplCommand::Help),
        "status" => return Ok(ReplCommand::Status),
        "login" => parse_login_command(args)?,
        "logout" => Command::Logout,
        "dataset" => parse_dataset_command(args)?,
        "analyze" => parse_analyze_command(args)?,
        "submit" => parse_submit_command(args)?,
        "show" => Command::Show,
        "edit" => parse_edit_command(args)?,
        "confirm" => Command::Confirm,
        "back" => Command::Back,
        "profile" => parse_profile_command(args)?,
        other => {
            return Err(CliError::InvalidInput(format!(
                "Unknown command: {}. Type 'help' for available commands.",
                other
            )))
        }
    };
    Ok(ReplCommand::Command(command))
}

fn parse_login_command(args: &[&str]) -> Result<Command> {
    if args.is_empty() {
        return Err(CliError::InvalidInput("Usage: login <name>".to_string()));
    }
    Ok(Command::Login(LoginArgs {
        username: args.join(" "),
    }))
}

fn parse_data_source(arg: Option<&&str>, usage: &str) -> Result<DataSourceArg> {
    let raw = arg.ok_or_else(|| CliError::InvalidInput(usage.to_string()))?;
    DataSourceArg::from_str(raw, true).map_err(|_| {
        CliError::InvalidInput(format!(
            "Unknown data source: {}. Use openlca, ecoinvent, indian or builtin.",
            raw
        ))
    })
}

fn parse_dataset_command(args: &[&str]) -> Result<Command> {
    let action = match args.first().copied() {
        None | Some("status") => DatasetAction::Status,
        Some("select") => DatasetAction::Select {
            source: parse_data_source(args.get(1), "Usage: dataset select <source>")?,
        },
        Some("load") => DatasetAction::Load {
            source: parse_data_source(args.get(1), "Usage: dataset load <source>")?,
        },
        Some("upload") => {
            if args.len() < 2 {
                return Err(CliError::InvalidInput(
                    "Usage: dataset upload <file> [file...]".to_string(),
                ));
            }
            DatasetAction::Upload {
                files: args[1..].iter().map(PathBuf::from).collect(),
            }
        }
        Some(other) => {
            return Err(CliError::InvalidInput(format!(
                "Unknown dataset action: {}",
                other
            )))
        }
    };
    Ok(Command::Dataset(DatasetArgs { action }))
}

fn parse_analyze_command(args: &[&str]) -> Result<Command> {
    if args.is_empty() {
        return Err(CliError::InvalidInput(
            "Usage: analyze <description>".to_string(),
        ));
    }
    Ok(Command::Analyze(AnalyzeArgs {
        text: args.iter().map(|s| s.to_string()).collect(),
    }))
}

/// Parse `submit key=value ...`; words without `=` continue the previous value.
fn parse_submit_command(args: &[&str]) -> Result<Command> {
    let usage = || {
        CliError::InvalidInput(
            "Usage: submit name=<name> material=<type> weight=<n> [unit=<u>] [recycled=<pct>] stage=<stage> [details=<text>]"
                .to_string(),
        )
    };

    let mut pairs: Vec<(&str, String)> = Vec::new();
    for token in args {
        match token.split_once('=') {
            Some((key, value)) => pairs.push((key, value.to_string())),
            None => {
                let (_, value) = pairs.last_mut().ok_or_else(usage)?;
                value.push(' ');
                value.push_str(token);
            }
        }
    }

    let mut submit = SubmitArgs::default();
    for (key, value) in pairs {
        let slot = submit_slot(&mut submit, key)
            .ok_or_else(|| CliError::InvalidInput(format!("Unknown field: {}", key)))?;
        *slot = Some(value);
    }
    Ok(Command::Submit(submit))
}

fn submit_slot<'a>(args: &'a mut SubmitArgs, key: &str) -> Option<&'a mut Option<String>> {
    let field = match key {
        "unit" | "weightUnit" => return Some(&mut args.unit),
        "name" => Field::ProductName,
        "material" => Field::MaterialType,
        "recycled" => Field::RecycledContent,
        "stage" => Field::LifecycleStage,
        "details" => Field::ProcessingDetails,
        other => Field::parse(other)?,
    };
    Some(match field {
        Field::ProductName => &mut args.name,
        Field::MaterialType => &mut args.material,
        Field::Weight => &mut args.weight,
        Field::RecycledContent => &mut args.recycled,
        Field::LifecycleStage => &mut args.stage,
        Field::ProcessingDetails => &mut args.details,
    })
}

fn parse_edit_command(args: &[&str]) -> Result<Command> {
    let (field, value) = args.split_first().ok_or_else(|| {
        CliError::InvalidInput("Usage: edit <field> [value]".to_string())
    })?;
    Ok(Command::Edit(EditArgs {
        field: field.to_string(),
        value: value.iter().map(|s| s.to_string()).collect(),
    }))
}

fn parse_profile_command(args: &[&str]) -> Result<Command> {
    let action = match args.first().copied() {
        None | Some("show") => ProfileAction::Show,
        Some("list") => ProfileAction::List,
        Some("switch") => {
            let name = args.get(1).ok_or_else(|| {
                CliError::InvalidInput("Usage: profile switch <name>".to_string())
            })?;
            ProfileAction::Switch {
                name: name.to_string(),
            }
        }
        Some(other) => {
            return Err(CliError::InvalidInput(format!(
                "Unknown profile action: {}. Use list, show or switch.",
                other
            )))
        }
    };
    Ok(Command::Profile(ProfileArgs { action }))
}

/// Print REPL help.
fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  login <name>                     - Set the display name");
    println!("  logout                           - Clear the session");
    println!("  dataset [status]                 - Show data sources and OpenLCA status");
    println!("  dataset select <source>          - Use a data source");
    println!("  dataset load <source>            - Load a dataset and use it");
    println!("  dataset upload <file> [file...]  - Upload csv, xlsx, xls, json or xml files");
    println!("  analyze <description>            - Extract product data from text");
    println!("  submit key=value ...             - Submit the structured form");
    println!("    keys: name, material, weight, unit, recycled, stage, details");
    println!("  show                             - Show the current record");
    println!("  edit <field> [value]             - Show or change one field");
    println!("  confirm                          - Confirm and save the record");
    println!("  back                             - Return to the input stage");
    println!("  status                           - Show where the run stands");
    println!("  profile [list|show|switch]       - Manage profiles");
    println!("  help, ?                          - Show this help");
    println!("  exit, quit, q                    - Exit REPL");
    println!();
}
