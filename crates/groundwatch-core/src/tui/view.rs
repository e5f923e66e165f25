//! Derived display view: sort order and severity filtering
//!
//! Pure functions of the published collection and the current selection.
//! Nothing here mutates the published collection.

use crate::models::{AlertView, Severity};

/// The severity filter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityFilter {
    /// Show every alert
    #[default]
    All,
    /// Show only alerts of one severity
    Only(Severity),
}

impl SeverityFilter {
    /// Every filter position, in cycling order
    pub const ALL: [SeverityFilter; 6] = [
        SeverityFilter::All,
        SeverityFilter::Only(Severity::Critical),
        SeverityFilter::Only(Severity::Serious),
        SeverityFilter::Only(Severity::Warning),
        SeverityFilter::Only(Severity::Caution),
        SeverityFilter::Only(Severity::Info),
    ];

    /// Label shown in the filter bar
    pub fn label(self) -> &'static str {
        match self {
            SeverityFilter::All => "All",
            SeverityFilter::Only(severity) => severity.label(),
        }
    }

    /// Position in [`Self::ALL`]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Next filter position, wrapping
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous filter position, wrapping
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Whether `alert` passes this filter
    pub fn matches(self, alert: &AlertView) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::Only(severity) => alert.error_severity == severity,
        }
    }
}

/// Sort alerts into display order: occurrence time descending, stable
pub fn sort_for_display(alerts: &mut [AlertView]) {
    alerts.sort_by(|a, b| b.error_time.cmp(&a.error_time));
}

/// The filtered subset of `alerts`, order preserved
pub fn apply_filter(alerts: &[AlertView], filter: SeverityFilter) -> Vec<AlertView> {
    alerts
        .iter()
        .filter(|alert| filter.matches(alert))
        .cloned()
        .collect()
}
