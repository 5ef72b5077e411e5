//! Ecolens Rust SDK
//!
//! HTTP client for the product analysis backend. [`IntakeClient`] implements
//! the [`IntakeService`](ecolens_domain::IntakeService) trait used by the
//! workflow, and adds the dataset endpoints used before intake starts.
//!
//! # Example
//!
//! ```no_run
//! use ecolens_domain::{DataSource, IntakeService};
//! use ecolens_sdk::IntakeClient;
//!
//! # async fn example() -> Result<(), ecolens_sdk::SdkError> {
//! let client = IntakeClient::new("http://localhost:5000");
//!
//! let analysis = client
//!     .analyze_text("500g aluminum bottle, 30% recycled", DataSource::Builtin)
//!     .await?;
//! println!("missing: {:?}", analysis.missing);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod wire;

pub use client::{IntakeClient, DATASET_EXTENSIONS};
pub use error::SdkError;
pub use wire::{DatasetLoad, UploadReceipt};
