//! Show command implementation.

use crate::app::App;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use ecolens_domain::IntakeService;
use ecolens_workflow::SessionStore;

/// Execute the show command.
pub async fn execute_show<S, St>(app: &mut App<S, St>, formatter: &Formatter) -> Result<()>
where
    S: IntakeService,
    St: SessionStore,
{
    app.ensure_confirming(formatter).await?;
    if formatter.format() == OutputFormat::Table {
        println!("{}", formatter.status_line(&app.ctx));
    }
    print_record(app, formatter)
}

/// Print the current record, if any.
pub(crate) fn print_record<S, St>(app: &App<S, St>, formatter: &Formatter) -> Result<()>
where
    S: IntakeService,
    St: SessionStore,
{
    if let Some(record) = &app.ctx.record {
        println!("{}", formatter.format_record(record)?);
    }
    Ok(())
}
