//! Submit command implementation.

use crate::app::App;
use crate::cli::SubmitArgs;
use crate::commands::show::print_record;
use crate::error::Result;
use crate::output::Formatter;
use ecolens_domain::IntakeService;
use ecolens_workflow::{EntryMode, SessionStore};

/// Execute the submit command.
pub async fn execute_submit<S, St>(
    args: SubmitArgs,
    app: &mut App<S, St>,
    formatter: &Formatter,
) -> Result<()>
where
    S: IntakeService,
    St: SessionStore,
{
    app.prepare_intake().await?;
    let selected = app
        .orchestrator
        .select_mode(&mut app.ctx, EntryMode::Form)
        .await;
    app.report(selected, formatter)?;

    app.ctx.form_input = args.into();
    let outcome = app.orchestrator.submit(&mut app.ctx).await;
    app.report(outcome, formatter)?;

    print_record(app, formatter)
}
