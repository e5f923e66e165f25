//! Data models for Groundwatch

mod alert_view;
mod contact;

pub use alert_view::*;
pub use contact::*;
