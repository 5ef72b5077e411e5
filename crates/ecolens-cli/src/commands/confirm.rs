//! Confirm command implementation.

use crate::app::App;
use crate::error::Result;
use crate::output::Formatter;
use ecolens_domain::IntakeService;
use ecolens_workflow::SessionStore;

/// Execute the confirm command.
pub async fn execute_confirm<S, St>(app: &mut App<S, St>, formatter: &Formatter) -> Result<()>
where
    S: IntakeService,
    St: SessionStore,
{
    app.ensure_confirming(formatter).await?;
    let outcome = app.orchestrator.confirm(&mut app.ctx).await;
    app.report(outcome, formatter)?;
    println!(
        "{}",
        formatter.info(&format!("Continue at {}", app.ctx.page.path()))
    );
    Ok(())
}
