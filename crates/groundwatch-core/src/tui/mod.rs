//! Terminal dashboard for Groundwatch
//!
//! Renders the published alert collection, applies the severity filter, and
//! routes operator intents (inspect, acknowledge, retry) back to the alert
//! service.

mod app;
mod components;
mod event;
mod ui;
mod view;

pub use app::App;
pub use event::{Event, EventHandler};
pub use view::{apply_filter, sort_for_display, SeverityFilter};
