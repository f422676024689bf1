use serde::{Deserialize, Serialize};

/// The record domains served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Income,
    Expense,
    Budget,
    Goal,
}

impl Domain {
    /// Path segment of the domain's collection endpoint.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Domain::Income => "income",
            Domain::Expense => "expenses",
            Domain::Budget => "budgets",
            Domain::Goal => "goals",
        }
    }

    /// `/{endpoint}/`: the trailing slash is significant to the backend.
    pub fn collection_path(&self) -> String {
        format!("/{}/", self.endpoint())
    }

    /// `/{endpoint}/{id}/`
    pub fn resource_path(&self, id: &RecordId) -> String {
        format!("/{}/{}/", self.endpoint(), id)
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Domain::Income => write!(f, "income"),
            Domain::Expense => write!(f, "expense"),
            Domain::Budget => write!(f, "budget"),
            Domain::Goal => write!(f, "goal"),
        }
    }
}

/// The two domains whose records share the type/amount/color shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDomain {
    Income,
    Expense,
}

impl EntryDomain {
    /// Label used when neither `type` nor `name` was supplied.
    pub fn unnamed_label(&self) -> &'static str {
        match self {
            EntryDomain::Income => "Unnamed Income",
            EntryDomain::Expense => "Unnamed Expense",
        }
    }

    /// Synthesized description for a record without one.
    pub fn default_description(&self, kind: Option<&str>) -> String {
        match self {
            EntryDomain::Income => {
                format!("Income from {}", kind.unwrap_or("unknown source"))
            }
            EntryDomain::Expense => {
                format!("Expense for {}", kind.unwrap_or("unknown purpose"))
            }
        }
    }
}

impl From<EntryDomain> for Domain {
    fn from(d: EntryDomain) -> Self {
        match d {
            EntryDomain::Income => Domain::Income,
            EntryDomain::Expense => Domain::Expense,
        }
    }
}

impl std::fmt::Display for EntryDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Domain::from(*self).fmt(f)
    }
}

/// A server-assigned record identifier.
///
/// The backend may hand out numeric or string ids; both render as plain
/// text in paths and payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}
