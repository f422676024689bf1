use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::amount::coerce_amount;
use crate::models::domain::{EntryDomain, RecordId};
use crate::models::entry::{EntryInput, EntryRecord};

/// Identity of an entry in an editable collection.
///
/// Entries created locally stay `Pending` until the backend accepts them and
/// hands back an id; only then do they become `Persisted`. The two id spaces
/// never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryId {
    Pending(Uuid),
    Persisted(RecordId),
}

impl EntryId {
    pub fn new_pending() -> Self {
        EntryId::Pending(Uuid::new_v4())
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, EntryId::Pending(_))
    }

    /// The server id, if persisted.
    pub fn record_id(&self) -> Option<&RecordId> {
        match self {
            EntryId::Persisted(id) => Some(id),
            EntryId::Pending(_) => None,
        }
    }
}

impl From<RecordId> for EntryId {
    fn from(id: RecordId) -> Self {
        EntryId::Persisted(id)
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        EntryId::Persisted(RecordId::Number(id))
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryId::Pending(uuid) => write!(f, "pending-{uuid}"),
            EntryId::Persisted(id) => write!(f, "{id}"),
        }
    }
}

/// One card in an editable list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: EntryId,
    /// Display label (the record's `type`)
    pub label: String,
    pub amount: f64,
    pub color: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl CollectionEntry {
    pub fn new(id: impl Into<EntryId>, label: impl Into<String>, amount: f64, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            amount,
            color: color.into(),
            date: None,
            description: None,
        }
    }

    /// Build from a backend record, using `color` when the record has none.
    pub fn from_record(record: &EntryRecord, fallback_label: &str, color: String) -> Self {
        Self {
            id: EntryId::Persisted(record.id.clone()),
            label: record.label().unwrap_or(fallback_label).to_string(),
            amount: record.amount,
            color: record.color.clone().filter(|c| !c.is_empty()).unwrap_or(color),
            date: record.date,
            description: record.description.clone(),
        }
    }

    /// After a relabel, replace a description that was synthesized from
    /// `previous_label` with the one for the current label. Custom
    /// descriptions are kept.
    pub fn refresh_description(&mut self, domain: EntryDomain, previous_label: &str) {
        if self.label == previous_label {
            return;
        }
        let stale = domain.default_description(Some(previous_label));
        if self.description.as_deref() == Some(stale.as_str()) {
            self.description = Some(domain.default_description(Some(&self.label)));
        }
    }

    /// The service input that persists this entry as shown.
    pub fn to_input(&self) -> EntryInput {
        let mut input = EntryInput::new()
            .with_kind(self.label.clone())
            .with_amount(self.amount)
            .with_color(self.color.clone());
        input.date = self.date;
        input.description = self.description.clone();
        input
    }
}

/// Transient edit buffers for an entry in the `Editing` state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub label: String,
    /// Raw text of the amount field; coerced only on save.
    pub amount: String,
}

impl EditBuffer {
    pub(crate) fn capture(entry: &CollectionEntry) -> Self {
        Self {
            label: entry.label.clone(),
            amount: entry.amount.to_string(),
        }
    }

    pub fn coerced_amount(&self) -> f64 {
        coerce_amount(&self.amount)
    }
}

/// Per-entry UI state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    Viewing,
    Editing(EditBuffer),
}
