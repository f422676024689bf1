use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::amount::{self, AmountInput};
use super::domain::RecordId;

/// How often a budget resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetPeriod::Daily => write!(f, "daily"),
            BudgetPeriod::Weekly => write!(f, "weekly"),
            BudgetPeriod::Monthly => write!(f, "monthly"),
            BudgetPeriod::Yearly => write!(f, "yearly"),
        }
    }
}

/// A single planned-vs-actual line inside a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub planned: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub actual: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub remaining: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub progress: f64,
}

impl BudgetItem {
    /// A fresh line with nothing spent yet.
    pub fn planned(category: impl Into<String>, planned: f64) -> Self {
        Self {
            id: None,
            category: category.into(),
            planned,
            actual: 0.0,
            remaining: planned,
            progress: 0.0,
        }
    }
}

/// Caller-supplied budget fields. Accepts both the UI's camelCase names
/// (`totalPlanned`, `startDate`, ...) and the backend's snake_case names;
/// when both are present the camelCase value wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "totalPlanned", skip_serializing_if = "Option::is_none")]
    pub total_planned: Option<AmountInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<AmountInput>,
    #[serde(rename = "totalActual", skip_serializing_if = "Option::is_none")]
    pub total_actual: Option<AmountInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_amount: Option<AmountInput>,
    #[serde(rename = "startDate", skip_serializing_if = "Option::is_none")]
    pub start_date_ui: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate", skip_serializing_if = "Option::is_none")]
    pub end_date_ui: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<BudgetPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<BudgetItem>>,
}

impl BudgetInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_target_amount(mut self, amount: impl Into<AmountInput>) -> Self {
        self.target_amount = Some(amount.into());
        self
    }

    pub fn with_current_amount(mut self, amount: impl Into<AmountInput>) -> Self {
        self.current_amount = Some(amount.into());
        self
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_period(mut self, period: BudgetPeriod) -> Self {
        self.period = Some(period);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_items(mut self, items: Vec<BudgetItem>) -> Self {
        self.items = Some(items);
        self
    }
}

/// Canonical budget body sent to the backend.
///
/// `start_date <= end_date` is not checked here; the server owns that rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPayload {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
    pub period: BudgetPeriod,
    /// Always set on create; on update only when the caller supplied items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<BudgetItem>>,
}

/// A budget as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub target_amount: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub current_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub period: BudgetPeriod,
    #[serde(default)]
    pub items: Vec<BudgetItem>,
}

impl BudgetRecord {
    /// Sum of planned amounts across all items.
    pub fn total_planned(&self) -> f64 {
        self.items.iter().map(|i| i.planned).sum()
    }

    /// Sum of actual amounts across all items.
    pub fn total_actual(&self) -> f64 {
        self.items.iter().map(|i| i.actual).sum()
    }

    /// Id for a new line: one past the largest numeric item id, or 1.
    pub fn next_item_id(&self) -> i64 {
        self.items
            .iter()
            .filter_map(|i| match i.id {
                Some(RecordId::Number(n)) => Some(n),
                _ => None,
            })
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Append a planned line and recompute both totals.
    pub fn add_item(&mut self, category: &str, planned: f64) -> Result<&BudgetItem, CoreError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(CoreError::ValidationError("budget item needs a category".into()));
        }
        if !(planned.is_finite() && planned > 0.0) {
            return Err(CoreError::ValidationError(format!(
                "planned amount must be positive, got {planned}"
            )));
        }

        let mut item = BudgetItem::planned(category, planned);
        item.id = Some(RecordId::Number(self.next_item_id()));
        self.items.push(item);
        self.recompute_totals();
        Ok(&self.items[self.items.len() - 1])
    }

    /// Drop the line with `item_id` and recompute both totals.
    pub fn remove_item(&mut self, item_id: &RecordId) -> Result<BudgetItem, CoreError> {
        let idx = self.item_index(item_id)?;
        let removed = self.items.remove(idx);
        self.recompute_totals();
        Ok(removed)
    }

    /// Set what was actually spent on line `item_id`.
    ///
    /// Updates the line's remaining and progress, and `current_amount`.
    /// `target_amount` is left as stored.
    pub fn record_spending(&mut self, item_id: &RecordId, actual: f64) -> Result<&BudgetItem, CoreError> {
        if !actual.is_finite() {
            return Err(CoreError::ValidationError(format!("spending must be a number, got {actual}")));
        }
        let idx = self.item_index(item_id)?;
        let item = &mut self.items[idx];
        item.actual = actual;
        item.remaining = item.planned - actual;
        item.progress = if item.planned > 0.0 {
            (actual / item.planned * 100.0).min(100.0)
        } else {
            0.0
        };
        self.current_amount = self.total_actual();
        Ok(&self.items[idx])
    }

    /// Spent share of the target in percent, `0` without a target.
    pub fn percent_spent(&self) -> f64 {
        if self.target_amount > 0.0 {
            self.current_amount / self.target_amount * 100.0
        } else {
            0.0
        }
    }

    pub fn status(&self) -> BudgetStatus {
        BudgetStatus::from_percent_spent(self.percent_spent())
    }

    fn recompute_totals(&mut self) {
        self.target_amount = self.total_planned();
        self.current_amount = self.total_actual();
    }

    fn item_index(&self, item_id: &RecordId) -> Result<usize, CoreError> {
        self.items
            .iter()
            .position(|i| i.id.as_ref() == Some(item_id))
            .ok_or_else(|| CoreError::RecordNotFound(format!("budget {} item {item_id}", self.id)))
    }
}

/// Overall health of a budget by share of the target already spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    /// Up to 75 %
    Good,
    /// Over 75 %
    Warning,
    /// Over 90 %
    Critical,
}

impl BudgetStatus {
    pub fn from_percent_spent(percent: f64) -> Self {
        if percent > 90.0 {
            BudgetStatus::Critical
        } else if percent > 75.0 {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Good
        }
    }

    /// Indicator color name shown next to the status.
    pub fn color(&self) -> &'static str {
        match self {
            BudgetStatus::Good => "green",
            BudgetStatus::Warning => "orange",
            BudgetStatus::Critical => "red",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetStatus::Good => write!(f, "Good"),
            BudgetStatus::Warning => write!(f, "Warning"),
            BudgetStatus::Critical => write!(f, "Critical"),
        }
    }
}
