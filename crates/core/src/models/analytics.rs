use serde::{Deserialize, Serialize};

/// Look-back window for period filtering, ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsWindow {
    /// The last 7 days
    Week,
    /// Since the same day last month
    Month,
    /// Since the same day last year
    Year,
}

/// Sum of all dated entries in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// `YYYY-M`, month not zero-padded (e.g. `2025-3`)
    pub month: String,

    /// Sum of entry amounts in that month
    pub total: f64,
}

/// Sum of all entries sharing one display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTotal {
    /// Entry label (`type`, else `name`, else the domain's unnamed label)
    pub source: String,

    /// Sum of entry amounts under this label
    pub total: f64,

    /// Color of the first entry with this label that has one
    pub color: String,
}
