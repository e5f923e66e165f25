//! Flattened, display-ready alert projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RawAlert, RawContact, Severity};

/// One alert merged with the fields of its parent contact
///
/// Exactly one view exists per raw alert. The parent-derived fields are copied
/// by value, so a contact mutated after flattening never changes an
/// already-produced view. `acknowledged` is the only field that changes after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertView {
    /// Unique alert identifier
    pub error_id: String,

    /// Severity classification
    pub error_severity: Severity,

    /// Alert category
    pub error_category: String,

    /// Short message
    pub error_message: String,

    /// Long-form message
    pub long_message: String,

    /// Occurrence time, milliseconds since epoch
    pub error_time: i64,

    /// Parent contact name
    pub contact_name: i64,

    /// Parent window begin, seconds since epoch
    pub contact_begin_timestamp: i64,

    /// Parent window end, seconds since epoch
    pub contact_end_timestamp: i64,

    /// Parent satellite name
    pub contact_satellite: String,

    /// Parent detail string
    pub contact_detail: String,

    /// Whether the operator has acknowledged this alert
    pub acknowledged: bool,
}

impl AlertView {
    /// Build a view from a raw alert and its parent contact
    pub fn from_parts(contact: &RawContact, alert: &RawAlert, acknowledged: bool) -> Self {
        Self {
            error_id: alert.error_id.clone(),
            error_severity: alert.error_severity,
            error_category: alert.error_category.clone(),
            error_message: alert.error_message.clone(),
            long_message: alert.long_message.clone(),
            error_time: alert.error_time,
            contact_name: contact.contact_name,
            contact_begin_timestamp: contact.contact_begin_timestamp,
            contact_end_timestamp: contact.contact_end_timestamp,
            contact_satellite: contact.contact_satellite.clone(),
            contact_detail: contact.contact_detail.clone(),
            acknowledged,
        }
    }

    /// Occurrence time formatted for display
    pub fn occurred_display(&self) -> String {
        format_timestamp_millis(self.error_time)
    }

    /// Contact window formatted for display
    pub fn window_display(&self) -> String {
        format!(
            "{} - {}",
            format_timestamp_secs(self.contact_begin_timestamp),
            format_timestamp_secs(self.contact_end_timestamp)
        )
    }
}

/// Format a seconds-since-epoch timestamp as `MM/DD/YYYY HH:MM` (UTC)
pub fn format_timestamp_secs(secs: i64) -> String {
    match DateTime::<Utc>::from_timestamp(secs, 0) {
        Some(dt) => dt.format("%m/%d/%Y %H:%M").to_string(),
        None => String::new(),
    }
}

/// Format a milliseconds-since-epoch timestamp as `MM/DD/YYYY HH:MM` (UTC)
pub fn format_timestamp_millis(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(dt) => dt.format("%m/%d/%Y %H:%M").to_string(),
        None => String::new(),
    }
}
