//! Data access and transform layer
//!
//! Fetches the contact collection, flattens it into display-ready alert
//! views, tracks the load lifecycle, and manages the acknowledgment set.

mod alerts;

pub use alerts::AlertService;
