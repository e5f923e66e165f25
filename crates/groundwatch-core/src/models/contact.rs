//! Contact and raw alert models, as received from the data source

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Alert severity level
///
/// Ordered by urgency, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Immediate operator action required
    Critical,
    /// Serious anomaly
    Serious,
    /// Warning
    Warning,
    /// Caution
    Caution,
    /// Informational
    Info,
}

impl Severity {
    /// Every severity, in display order
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::Serious,
        Severity::Warning,
        Severity::Caution,
        Severity::Info,
    ];

    /// Wire name, as it appears in the contact document
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Serious => "serious",
            Severity::Warning => "warning",
            Severity::Caution => "caution",
            Severity::Info => "info",
        }
    }

    /// Capitalized label for filter bars and tables
    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Serious => "Serious",
            Severity::Warning => "Warning",
            Severity::Caution => "Caution",
            Severity::Info => "Info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "serious" => Ok(Severity::Serious),
            "warning" => Ok(Severity::Warning),
            "caution" => Ok(Severity::Caution),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// A raw alert object nested inside a contact
///
/// Field names follow the contact document exactly. The `selected`, `new` and
/// `expanded` flags are transient UI state carried by the document; the
/// transform ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAlert {
    /// Unique alert identifier
    pub error_id: String,

    /// Severity classification
    pub error_severity: Severity,

    /// Alert category (hardware, software, telemetry, ...)
    pub error_category: String,

    /// Short message
    pub error_message: String,

    /// Long-form message
    pub long_message: String,

    /// Occurrence time, milliseconds since epoch
    pub error_time: i64,

    /// Transient UI flag
    pub selected: bool,

    /// Transient UI flag
    #[serde(rename = "new")]
    pub is_new: bool,

    /// Transient UI flag
    pub expanded: bool,
}

/// A ground-station contact window and its associated alerts
///
/// Top-level record of the contact document. Immutable once fetched; unknown
/// extra fields are ignored, missing fields are a malformed-document error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContact {
    /// Document identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Contact identifier
    pub contact_id: String,

    /// Contact status
    pub contact_status: String,

    /// Contact name (numeric designator)
    pub contact_name: i64,

    /// Ground station
    pub contact_ground: String,

    /// Satellite name
    pub contact_satellite: String,

    /// Equipment string
    pub contact_equipment: String,

    /// Contact state
    pub contact_state: String,

    /// Current step
    pub contact_step: String,

    /// Free-form detail string
    pub contact_detail: String,

    /// Window begin, seconds since epoch
    pub contact_begin_timestamp: i64,

    /// Window end, seconds since epoch
    pub contact_end_timestamp: i64,

    /// Ground station latitude
    pub contact_latitude: f64,

    /// Ground station longitude
    pub contact_longitude: f64,

    /// Antenna azimuth
    pub contact_azimuth: f64,

    /// Antenna elevation
    pub contact_elevation: f64,

    /// Resolution note
    pub contact_resolution: String,

    /// Resolution status
    pub contact_resolution_status: String,

    /// Alerts raised during this contact, in document order
    pub alerts: Vec<RawAlert>,
}
