//! Ecolens Workflow
//!
//! Drives product-data intake: free text or a structured form is analyzed,
//! missing fields are gap-filled, and the resulting record is confirmed.
//!
//! # Architecture
//!
//! ```text
//! Idle → Intake → Analyzing → GapFilling → Confirming → Done
//!                     ↓                        ↑
//!                   Failed            (gap-fill failure: fail-open)
//! ```
//!
//! [`transition`] is a pure function from a state and an event to the next
//! state plus a list of [`Effect`]s. The [`Orchestrator`] runs those effects
//! against an [`IntakeService`](ecolens_domain::IntakeService) and a
//! [`SessionStore`], feeding service responses back in as events. All
//! per-run state lives in a caller-owned [`WorkflowContext`].
//!
//! # Example Usage
//!
//! ```
//! use ecolens_domain::{Analysis, ProductRecord};
//! use ecolens_workflow::{MemorySession, MockService, Orchestrator, WorkflowConfig, WorkflowState};
//!
//! # async fn example() -> Result<(), ecolens_workflow::WorkflowError> {
//! let service = MockService::new();
//! service.push_analysis(Analysis::default());
//!
//! let mut orchestrator = Orchestrator::new(service, MemorySession::new(), WorkflowConfig::default());
//! let mut ctx = orchestrator.start()?;
//! ctx.text_input = "500g aluminum bottle, 30% recycled".to_string();
//!
//! let state = orchestrator.submit(&mut ctx).await?;
//! assert_eq!(state, WorkflowState::Confirming);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod context;
mod editor;
mod error;
mod form;
mod machine;
mod orchestrator;
mod state;

pub mod mock;
pub mod session;

#[cfg(test)]
mod tests;

pub use config::WorkflowConfig;
pub use context::WorkflowContext;
pub use editor::FieldEditor;
pub use error::WorkflowError;
pub use form::FormInput;
pub use machine::{transition, Effect, Event, Failure, Level, Notification, Step, Submission};
pub use mock::{Call, MockFailure, MockService};
pub use orchestrator::Orchestrator;
pub use session::{FileSession, MemorySession, SessionError, SessionExt, SessionStore};
pub use state::{EntryMode, Page, WorkflowState};
