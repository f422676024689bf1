use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::amount::{self, AmountInput};
use super::domain::RecordId;

/// How often a recurring entry repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Quarterly,
    Annually,
}

impl Frequency {
    /// Approximate occurrences over `months` months (30-day months, 4-week months).
    pub fn occurrences(&self, months: u32) -> f64 {
        let months = f64::from(months);
        match self {
            Frequency::Daily => 30.0 * months,
            Frequency::Weekly => 4.0 * months,
            Frequency::Biweekly => 2.0 * months,
            Frequency::Monthly => months,
            Frequency::Quarterly => months / 3.0,
            Frequency::Annually => months / 12.0,
        }
    }
}

/// Caller-supplied fields for an income or expense record.
///
/// Every field is optional; the normalizer fills in whatever is missing.
/// Empty strings count as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryInput {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
}

impl EntryInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<AmountInput>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn recurring(mut self, frequency: Frequency) -> Self {
        self.recurring = Some(true);
        self.frequency = Some(frequency);
        self
    }
}

/// Canonical income/expense body sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub description: String,
    /// Always set on create. On update, `None` leaves the stored date alone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub name: String,
    pub color: String,
    /// Stringified record id, present on update payloads only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    /// `color` is a palette default not yet recorded in the palette store.
    /// The owner records it once the backend has assigned an id.
    #[serde(skip)]
    pub unrecorded_color: bool,
}

/// An income or expense record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: RecordId,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub amount: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub frequency: Option<Frequency>,
}

impl EntryRecord {
    /// Display label: `type`, else `name`.
    pub fn label(&self) -> Option<&str> {
        self.kind
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.name.as_deref().filter(|s| !s.is_empty()))
    }
}
