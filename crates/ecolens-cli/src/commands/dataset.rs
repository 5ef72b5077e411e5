//! Dataset command implementation.

use crate::app::RemoteApp;
use crate::cli::{DatasetAction, DatasetArgs};
use crate::error::Result;
use crate::output::Formatter;
use ecolens_domain::DataSource;
use std::path::PathBuf;

/// Execute the dataset command.
pub async fn execute_dataset(
    args: DatasetArgs,
    app: &mut RemoteApp,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        DatasetAction::Status => show_status(app, formatter).await,
        DatasetAction::Select { source } => select_source(app, source.into(), formatter),
        DatasetAction::Load { source } => load_dataset(app, source.into(), formatter).await,
        DatasetAction::Upload { files } => upload_files(app, files, formatter).await,
    }
}

/// Show the selectable data sources and whether OpenLCA is reachable.
async fn show_status(app: &RemoteApp, formatter: &Formatter) -> Result<()> {
    println!("Data sources:");
    println!("{}", formatter.data_sources(app.ctx.data_source));

    match app.client().check_openlca().await {
        Ok(true) => println!("{}", formatter.success("OpenLCA is available")),
        Ok(false) => println!("{}", formatter.warning("OpenLCA is not available")),
        Err(e) => eprintln!(
            "{}",
            formatter.warning(&format!("Could not check OpenLCA: {}", e))
        ),
    }
    Ok(())
}

fn select_source(app: &mut RemoteApp, source: DataSource, formatter: &Formatter) -> Result<()> {
    app.orchestrator.set_data_source(&mut app.ctx, source)?;
    println!(
        "{}",
        formatter.success(&format!("Using {}", source.display_name()))
    );
    Ok(())
}

/// Load the dataset on the backend, then select it.
async fn load_dataset(app: &mut RemoteApp, source: DataSource, formatter: &Formatter) -> Result<()> {
    let load = app.client().load_dataset(source).await?;
    app.orchestrator.set_data_source(&mut app.ctx, source)?;

    let message = load
        .message
        .unwrap_or_else(|| format!("{} dataset loaded", source.display_name()));
    println!("{}", formatter.success(&message));
    for (key, value) in &load.details {
        println!("  {}: {}", key, value);
    }
    Ok(())
}

async fn upload_files(app: &RemoteApp, files: Vec<PathBuf>, formatter: &Formatter) -> Result<()> {
    let receipt = app.client().upload_dataset(files.as_slice()).await?;
    let message = receipt
        .message
        .unwrap_or_else(|| format!("Uploaded {} file(s)", files.len()));
    println!("{}", formatter.success(&message));
    for name in &receipt.files {
        println!("  {}", name);
    }
    Ok(())
}
