//! Edit command implementation.

use crate::app::App;
use crate::cli::EditArgs;
use crate::commands::show::print_record;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use ecolens_domain::{Field, IntakeService};
use ecolens_workflow::SessionStore;

/// Execute the edit command.
///
/// Without a value the editor description is printed; with one, the value
/// is validated and stored immediately.
pub async fn execute_edit<S, St>(
    args: EditArgs,
    app: &mut App<S, St>,
    formatter: &Formatter,
) -> Result<()>
where
    S: IntakeService,
    St: SessionStore,
{
    let field = parse_field(&args.field)?;
    app.ensure_confirming(formatter).await?;

    if args.value.is_empty() {
        let editor = app.orchestrator.open_editor(&app.ctx, field)?;
        println!("{}", formatter.format_editor(&editor)?);
        return Ok(());
    }

    let raw = args.value.join(" ");
    let outcome = app.orchestrator.save_edit(&mut app.ctx, field, &raw).await;
    app.report(outcome, formatter)?;
    print_record(app, formatter)
}

fn parse_field(name: &str) -> Result<Field> {
    Field::parse(name).ok_or_else(|| {
        let names: Vec<&str> = Field::ALL.iter().map(|f| f.as_str()).collect();
        CliError::InvalidInput(format!(
            "Unknown field '{}'. Valid fields: {}",
            name,
            names.join(", ")
        ))
    })
}
