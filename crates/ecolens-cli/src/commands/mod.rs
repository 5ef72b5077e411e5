//! Command implementations.

pub mod analyze;
pub mod confirm;
pub mod dataset;
pub mod edit;
pub mod profile;
pub mod session;
pub mod show;
pub mod submit;

pub use self::analyze::execute_analyze;
pub use self::confirm::execute_confirm;
pub use self::dataset::execute_dataset;
pub use self::edit::execute_edit;
pub use self::profile::execute_profile;
pub use self::session::{execute_back, execute_login, execute_logout};
pub use self::show::execute_show;
pub use self::submit::execute_submit;

use crate::app::RemoteApp;
use crate::cli::Command;
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute a command that works on the current workflow run.
pub async fn execute_workflow_command(
    command: Command,
    app: &mut RemoteApp,
    formatter: &Formatter,
) -> Result<()> {
    match command {
        Command::Login(args) => execute_login(args, app, formatter),
        Command::Logout => execute_logout(app, formatter).await,
        Command::Dataset(args) => execute_dataset(args, app, formatter).await,
        Command::Analyze(args) => execute_analyze(args, app, formatter).await,
        Command::Submit(args) => execute_submit(args, app, formatter).await,
        Command::Show => execute_show(app, formatter).await,
        Command::Edit(args) => execute_edit(args, app, formatter).await,
        Command::Confirm => execute_confirm(app, formatter).await,
        Command::Back => execute_back(app, formatter).await,
        Command::Profile(_) | Command::Repl => Err(CliError::NotPermitted(
            "not a workflow command".to_string(),
        )),
    }
}
