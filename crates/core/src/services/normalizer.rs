use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::amount::AmountInput;
use crate::models::budget::{BudgetInput, BudgetPayload};
use crate::models::domain::{Domain, EntryDomain, RecordId};
use crate::models::entry::{EntryInput, EntryPayload};
use crate::models::goal::GoalPayload;

use super::palette_service::PaletteService;

pub const UNNAMED_BUDGET: &str = "Unnamed Budget";

/// Input for any domain, tagged by domain.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordInput {
    Income(EntryInput),
    Expense(EntryInput),
    Budget(BudgetInput),
    Goal(GoalPayload),
}

/// Backend-ready body for any domain.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalPayload {
    Income(EntryPayload),
    Expense(EntryPayload),
    Budget(BudgetPayload),
    Goal(GoalPayload),
}

impl CanonicalPayload {
    pub fn domain(&self) -> Domain {
        match self {
            CanonicalPayload::Income(_) => Domain::Income,
            CanonicalPayload::Expense(_) => Domain::Expense,
            CanonicalPayload::Budget(_) => Domain::Budget,
            CanonicalPayload::Goal(_) => Domain::Goal,
        }
    }

    pub fn to_json(&self) -> Result<Value, CoreError> {
        let value = match self {
            CanonicalPayload::Income(p) | CanonicalPayload::Expense(p) => serde_json::to_value(p),
            CanonicalPayload::Budget(p) => serde_json::to_value(p),
            CanonicalPayload::Goal(p) => serde_json::to_value(p),
        };
        value.map_err(|e| CoreError::Serialization(format!("Failed to serialize payload: {e}")))
    }
}

/// Turns caller input into the canonical payloads the backend expects.
///
/// Total: every input normalizes, nothing is rejected. Missing fields get
/// documented defaults, present fields pass through verbatim. The only side
/// effect is recording default color assignments in the palette.
pub struct Normalizer {
    palette: Arc<PaletteService>,
    fixed_today: Option<NaiveDate>,
}

impl Normalizer {
    pub fn new(palette: Arc<PaletteService>) -> Self {
        Self {
            palette,
            fixed_today: None,
        }
    }

    /// Pin "today" (used for date defaults) to a fixed date.
    pub fn with_fixed_date(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today.unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn palette(&self) -> &Arc<PaletteService> {
        &self.palette
    }

    /// Normalize any domain's input for a create request.
    pub fn normalize(&self, input: &RecordInput) -> CanonicalPayload {
        match input {
            RecordInput::Income(i) => CanonicalPayload::Income(self.normalize_entry(EntryDomain::Income, i)),
            RecordInput::Expense(i) => CanonicalPayload::Expense(self.normalize_entry(EntryDomain::Expense, i)),
            RecordInput::Budget(i) => CanonicalPayload::Budget(self.normalize_budget(i)),
            RecordInput::Goal(g) => CanonicalPayload::Goal(g.clone()),
        }
    }

    /// Income/expense create payload. The date defaults to today.
    ///
    /// A default color is only previewed here (`unrecorded_color`); it is
    /// recorded in the palette once the backend returns the new record's id,
    /// so failed creates never consume a palette slot.
    pub fn normalize_entry(&self, domain: EntryDomain, input: &EntryInput) -> EntryPayload {
        let mut payload = self.entry_payload(domain, input, |domain| self.palette.peek_next(domain));
        payload.unrecorded_color = non_empty(&input.color).is_none();
        payload.date = Some(input.date.unwrap_or_else(|| self.today()));
        payload
    }

    /// Income/expense update payload for record `id`.
    ///
    /// Carries the stringified id and leaves `date` unset when the caller did
    /// not supply one, so the backend keeps the stored date. A default color
    /// is the one already assigned to `id`, or a fresh assignment.
    pub fn normalize_entry_update(&self, domain: EntryDomain, id: &RecordId, input: &EntryInput) -> EntryPayload {
        let key = id.to_string();
        let mut payload = self.entry_payload(domain, input, |domain| self.palette.assign(domain, &key));
        payload.date = input.date;
        payload.id = Some(key);
        payload
    }

    /// Budget create payload. Items default to an empty list.
    pub fn normalize_budget(&self, input: &BudgetInput) -> BudgetPayload {
        let mut payload = self.budget_payload(input);
        payload.items = Some(input.items.clone().unwrap_or_default());
        payload
    }

    /// Budget update payload. Items are only sent when supplied.
    pub fn normalize_budget_update(&self, input: &BudgetInput) -> BudgetPayload {
        let mut payload = self.budget_payload(input);
        payload.items = input.items.clone();
        payload
    }

    fn entry_payload<F>(&self, domain: EntryDomain, input: &EntryInput, default_color: F) -> EntryPayload
    where
        F: FnOnce(EntryDomain) -> String,
    {
        let kind = non_empty(&input.kind);
        let unnamed = domain.unnamed_label();

        EntryPayload {
            kind: kind.unwrap_or(unnamed).to_string(),
            amount: input.amount.as_ref().map(AmountInput::coerce).unwrap_or(0.0),
            description: non_empty(&input.description)
                .map(str::to_string)
                .unwrap_or_else(|| domain.default_description(kind)),
            date: None,
            name: non_empty(&input.name).or(kind).unwrap_or(unnamed).to_string(),
            color: match non_empty(&input.color) {
                Some(c) => c.to_string(),
                None => default_color(domain),
            },
            id: None,
            recurring: input.recurring,
            frequency: input.frequency,
            unrecorded_color: false,
        }
    }

    fn budget_payload(&self, input: &BudgetInput) -> BudgetPayload {
        let today = self.today();
        let name = non_empty(&input.name).unwrap_or(UNNAMED_BUDGET).to_string();

        BudgetPayload {
            target_amount: first_truthy(&input.total_planned, &input.target_amount),
            current_amount: first_truthy(&input.total_actual, &input.current_amount),
            start_date: input.start_date_ui.or(input.start_date).unwrap_or(today),
            end_date: input.end_date_ui.or(input.end_date).unwrap_or(today),
            description: non_empty(&input.description)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Budget for {name}")),
            period: input.period.unwrap_or_default(),
            items: None,
            name,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// First amount that coerces to a non-zero value, else `0.0`.
fn first_truthy(preferred: &Option<AmountInput>, fallback: &Option<AmountInput>) -> f64 {
    [preferred, fallback]
        .into_iter()
        .flatten()
        .find(|a| a.is_truthy())
        .map(AmountInput::coerce)
        .unwrap_or(0.0)
}
