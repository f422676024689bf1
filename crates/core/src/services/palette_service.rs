use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use crate::errors::CoreError;
use crate::models::domain::EntryDomain;
use crate::storage::traits::KeyValueStore;

/// Default income colors, cycled in order.
pub const INCOME_PALETTE: [&str; 5] = ["#3B82F6", "#8B5CF6", "#10B981", "#6366F1", "#0EA5E9"];

/// Default expense colors, cycled in order.
pub const EXPENSE_PALETTE: [&str; 5] = ["#EF4444", "#F59E0B", "#6366F1", "#EC4899", "#84CC16"];

/// Assigns default display colors round-robin from a fixed palette per domain.
///
/// Assignments are persisted in a `KeyValueStore` as a JSON object
/// `{ record_key: color }` under `incomeColors` / `expenseColors`. The next
/// color is `palette[assigned_count % palette.len()]`, so the Nth assignment
/// (0-indexed) for a domain is always `palette[N % 5]`. Clearing the store
/// restarts the cycle.
///
/// Every read-modify-write of a color map runs under one lock, so
/// concurrent assignments through the same service never share a slot.
pub struct PaletteService {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl PaletteService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub fn palette(domain: EntryDomain) -> &'static [&'static str; 5] {
        match domain {
            EntryDomain::Income => &INCOME_PALETTE,
            EntryDomain::Expense => &EXPENSE_PALETTE,
        }
    }

    /// Store key holding this domain's assignments.
    pub fn storage_key(domain: EntryDomain) -> &'static str {
        match domain {
            EntryDomain::Income => "incomeColors",
            EntryDomain::Expense => "expenseColors",
        }
    }

    /// Color used when the assignment history cannot be read.
    pub fn fallback_color(domain: EntryDomain) -> &'static str {
        Self::palette(domain)[0]
    }

    /// All recorded assignments for a domain.
    pub fn assignments(&self, domain: EntryDomain) -> Result<BTreeMap<String, String>, CoreError> {
        match self.store.get(Self::storage_key(domain))? {
            None => Ok(BTreeMap::new()),
            Some(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                CoreError::Storage(format!("Corrupt {} color map: {e}", domain))
            }),
        }
    }

    pub fn assigned_count(&self, domain: EntryDomain) -> Result<usize, CoreError> {
        Ok(self.assignments(domain)?.len())
    }

    /// The color the next assignment would receive, without recording anything.
    pub fn peek_next(&self, domain: EntryDomain) -> String {
        match self.assigned_count(domain) {
            Ok(count) => Self::color_at(domain, count).to_string(),
            Err(e) => {
                warn!(%domain, error = %e, "failed to read color assignments, using fallback");
                Self::fallback_color(domain).to_string()
            }
        }
    }

    /// Assign a color to `record_key` and persist it.
    ///
    /// A key that already has a color keeps it. Read failures are swallowed
    /// and the fallback color is returned; write failures are logged and the
    /// chosen color is still returned.
    pub fn assign(&self, domain: EntryDomain, record_key: &str) -> String {
        let _guard = self.lock();
        let mut assignments = match self.assignments(domain) {
            Ok(map) => map,
            Err(e) => {
                warn!(%domain, error = %e, "failed to read color assignments, using fallback");
                return Self::fallback_color(domain).to_string();
            }
        };

        if let Some(existing) = assignments.get(record_key) {
            return existing.clone();
        }

        let color = Self::color_at(domain, assignments.len()).to_string();
        assignments.insert(record_key.to_string(), color.clone());
        if let Err(e) = self.save(domain, &assignments) {
            warn!(%domain, key = record_key, error = %e, "failed to persist color assignment");
        }
        color
    }

    /// Move an assignment to a new key (e.g. after a record was re-created under a new id).
    /// A missing `from` key is a no-op.
    pub fn rebind(&self, domain: EntryDomain, from: &str, to: &str) -> Result<(), CoreError> {
        let _guard = self.lock();
        let mut assignments = self.assignments(domain)?;
        if let Some(color) = assignments.remove(from) {
            assignments.insert(to.to_string(), color);
            self.save(domain, &assignments)?;
        }
        Ok(())
    }

    /// Record an explicit color for a key, overriding any previous assignment.
    pub fn remember(&self, domain: EntryDomain, record_key: &str, color: &str) -> Result<(), CoreError> {
        let _guard = self.lock();
        let mut assignments = self.assignments(domain)?;
        assignments.insert(record_key.to_string(), color.to_string());
        self.save(domain, &assignments)
    }

    /// Drop all assignments for a domain, restarting the cycle.
    pub fn reset(&self, domain: EntryDomain) -> Result<(), CoreError> {
        let _guard = self.lock();
        self.store.remove(Self::storage_key(domain))
    }

    // The guarded data is `()`, so a poisoned lock carries no broken state.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn color_at(domain: EntryDomain, index: usize) -> &'static str {
        let palette = Self::palette(domain);
        palette[index % palette.len()]
    }

    fn save(&self, domain: EntryDomain, assignments: &BTreeMap<String, String>) -> Result<(), CoreError> {
        let json = serde_json::to_string(assignments)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize color map: {e}")))?;
        self.store.set(Self::storage_key(domain), &json)
    }
}
