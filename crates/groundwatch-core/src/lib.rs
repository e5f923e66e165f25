//! # Groundwatch
//!
//! Operator dashboard for satellite ground-contact alerts.
//!
//! Groundwatch fetches a contact/alert document from a single data source,
//! flattens it into display-ready alert records, and lets the operator filter
//! by severity, inspect detail, and acknowledge alerts. Acknowledgments
//! persist locally and survive restarts.
//!
//! ## Architecture
//!
//! - **Source**: one fetch of the contact document (HTTP or local file)
//! - **Service**: flattens contacts into alert views and publishes them over
//!   watch channels, together with the load lifecycle
//! - **Store**: the persisted acknowledgment set behind a key-value contract
//! - **TUI**: terminal dashboard for filtering, detail, and acknowledgment
//!
//! ## Quick Start
//!
//! ```bash
//! # View the dashboard against the bundled sample document
//! groundwatch dashboard
//!
//! # One-shot listing, critical alerts only
//! groundwatch alerts list --severity critical
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod source;
pub mod store;
pub mod tui;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::service::AlertService;
    pub use crate::source::{ContactSource, FileSource, HttpSource};
    pub use crate::store::{AckStore, FileStore, KeyValueStore, MemoryStore};
}
