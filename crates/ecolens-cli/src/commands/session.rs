//! Login, logout and back commands.

use crate::app::App;
use crate::cli::LoginArgs;
use crate::error::Result;
use crate::output::Formatter;
use ecolens_domain::IntakeService;
use ecolens_workflow::{SessionStore, WorkflowState};

/// Execute the login command.
pub fn execute_login<S, St>(args: LoginArgs, app: &mut App<S, St>, formatter: &Formatter) -> Result<()>
where
    S: IntakeService,
    St: SessionStore,
{
    app.orchestrator.sign_in(&mut app.ctx, &args.username)?;
    println!(
        "{}",
        formatter.success(&format!("Signed in as {}", args.username.trim()))
    );
    Ok(())
}

/// Execute the logout command.
pub async fn execute_logout<S, St>(app: &mut App<S, St>, formatter: &Formatter) -> Result<()>
where
    S: IntakeService,
    St: SessionStore,
{
    let outcome = app.orchestrator.logout(&mut app.ctx).await;
    app.report(outcome, formatter)?;
    println!("{}", formatter.success("Session cleared"));
    Ok(())
}

/// Execute the back command.
pub async fn execute_back<S, St>(app: &mut App<S, St>, formatter: &Formatter) -> Result<()>
where
    S: IntakeService,
    St: SessionStore,
{
    match app.ctx.state {
        WorkflowState::Intake => {}
        WorkflowState::Confirming | WorkflowState::Failed => {
            let outcome = app.orchestrator.back(&mut app.ctx).await;
            app.report(outcome, formatter)?;
        }
        _ => {
            app.prepare_intake().await?;
            let outcome = app.orchestrator.resume(&mut app.ctx).await;
            let state = app.report(outcome, formatter)?;
            if state == WorkflowState::Confirming {
                let outcome = app.orchestrator.back(&mut app.ctx).await;
                app.report(outcome, formatter)?;
            }
        }
    }
    println!(
        "{}",
        formatter.info(&format!("Back at {}", app.ctx.page.path()))
    );
    Ok(())
}
