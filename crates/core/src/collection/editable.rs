use std::collections::HashMap;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::chart::ChartSlice;

use super::entry::{CollectionEntry, EditBuffer, EntryId, ItemState};

/// Label given to entries created with `add`.
pub const NEW_ENTRY_LABEL: &str = "New Income Source";

/// Hues cycled by `add`, indexed by the new entry's position.
pub const NEW_ENTRY_HUES: [u16; 5] = [210, 30, 120, 270, 180];

/// Delay before a scroll request should be honored, giving layout time to
/// settle after an append.
pub const SCROLL_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Ask the view to scroll its list container so `entry` is visible.
///
/// Always produced after the entry is appended; the view should wait
/// `delay` before scrolling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub entry: EntryId,
    pub delay: Duration,
}

/// Ordered, locally mutable list of entries with per-entry edit state.
///
/// Each entry is either `Viewing` or `Editing` with its own buffers.
/// `begin_edit` captures the current values, `set_label`/`set_amount`
/// mutate only the buffers, `save` commits them to exactly the matching
/// entry, and `cancel` discards them. Nothing here talks to the backend;
/// see `IncomeBoard` for the persisting wrapper.
#[derive(Debug, Clone, Default)]
pub struct EditableCollection {
    entries: Vec<CollectionEntry>,
    editing: HashMap<EntryId, EditBuffer>,
}

impl EditableCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<CollectionEntry>) -> Self {
        Self {
            entries,
            editing: HashMap::new(),
        }
    }

    pub fn entries(&self) -> &[CollectionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<&CollectionEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn state(&self, id: &EntryId) -> Option<ItemState> {
        self.get(id)?;
        Some(match self.editing.get(id) {
            Some(buffer) => ItemState::Editing(buffer.clone()),
            None => ItemState::Viewing,
        })
    }

    /// Replace every entry (e.g. after loading from the backend). Open edits are dropped.
    pub fn replace_all(&mut self, entries: Vec<CollectionEntry>) {
        self.entries = entries;
        self.editing.clear();
    }

    // ── Add / Delete ────────────────────────────────────────────────

    /// Append a placeholder entry with a pending id, zero amount and a hue
    /// picked from `NEW_ENTRY_HUES`. Returns the scroll request for it.
    pub fn add(&mut self) -> ScrollRequest {
        let position = self.entries.len() + 1;
        let hue = NEW_ENTRY_HUES[position % NEW_ENTRY_HUES.len()];
        let id = EntryId::new_pending();

        self.entries.push(CollectionEntry::new(
            id.clone(),
            NEW_ENTRY_LABEL,
            0.0,
            format!("hsl({hue}, 85%, 60%)"),
        ));

        ScrollRequest {
            entry: id,
            delay: SCROLL_SETTLE_DELAY,
        }
    }

    /// Remove the entry with `id`. Returns its former index and the entry so
    /// the removal can be undone with `restore`.
    pub fn delete(&mut self, id: &EntryId) -> Result<(usize, CollectionEntry), CoreError> {
        let idx = self.index_of(id)?;
        self.editing.remove(id);
        Ok((idx, self.entries.remove(idx)))
    }

    /// Re-insert an entry at `index` (clamped to the end).
    pub fn restore(&mut self, index: usize, entry: CollectionEntry) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
    }

    // ── Edit state machine ──────────────────────────────────────────

    /// Viewing → Editing, capturing the entry's current label and amount.
    /// Calling it on an entry already being edited resets the buffers.
    pub fn begin_edit(&mut self, id: &EntryId) -> Result<(), CoreError> {
        let buffer = EditBuffer::capture(&self.entries[self.index_of(id)?]);
        self.editing.insert(id.clone(), buffer);
        Ok(())
    }

    pub fn set_label(&mut self, id: &EntryId, label: impl Into<String>) -> Result<(), CoreError> {
        self.buffer_mut(id)?.label = label.into();
        Ok(())
    }

    /// Set the raw amount text. Not validated until `save`.
    pub fn set_amount(&mut self, id: &EntryId, amount: impl Into<String>) -> Result<(), CoreError> {
        self.buffer_mut(id)?.amount = amount.into();
        Ok(())
    }

    /// Editing → Viewing, discarding the buffers.
    pub fn cancel(&mut self, id: &EntryId) -> Result<(), CoreError> {
        self.index_of(id)?;
        self.editing
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CoreError::InvalidState(format!("entry {id} is not being edited")))
    }

    /// Editing → Viewing, committing the buffers into the matching entry.
    /// The amount text coerces to `0` when it is not a number.
    ///
    /// Returns the entry as it was before the commit.
    pub fn save(&mut self, id: &EntryId) -> Result<CollectionEntry, CoreError> {
        let idx = self.index_of(id)?;
        let buffer = self
            .editing
            .remove(id)
            .ok_or_else(|| CoreError::InvalidState(format!("entry {id} is not being edited")))?;

        let entry = &mut self.entries[idx];
        let previous = entry.clone();
        entry.label = buffer.label.clone();
        entry.amount = buffer.coerced_amount();
        Ok(previous)
    }

    /// Overwrite the entry with `id` wholesale (used to roll back a save).
    pub fn replace(&mut self, id: &EntryId, entry: CollectionEntry) -> Result<(), CoreError> {
        let idx = self.index_of(id)?;
        if entry.id != *id {
            if let Some(buffer) = self.editing.remove(id) {
                self.editing.insert(entry.id.clone(), buffer);
            }
        }
        self.entries[idx] = entry;
        Ok(())
    }

    /// Change an entry's id, carrying any open edit along.
    pub fn rekey(&mut self, from: &EntryId, to: EntryId) -> Result<(), CoreError> {
        let idx = self.index_of(from)?;
        if let Some(buffer) = self.editing.remove(from) {
            self.editing.insert(to.clone(), buffer);
        }
        self.entries[idx].id = to;
        Ok(())
    }

    // ── Aggregates ──────────────────────────────────────────────────

    /// Sum of all amounts, zero entries included.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Chart slices for entries with a positive amount, in list order.
    pub fn chart_slices(&self) -> Vec<ChartSlice> {
        self.entries
            .iter()
            .filter(|e| e.amount > 0.0)
            .map(|e| ChartSlice {
                name: e.label.clone(),
                value: e.amount,
                color: e.color.clone(),
            })
            .collect()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn index_of(&self, id: &EntryId) -> Result<usize, CoreError> {
        self.entries
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| CoreError::RecordNotFound(id.to_string()))
    }

    fn buffer_mut(&mut self, id: &EntryId) -> Result<&mut EditBuffer, CoreError> {
        self.index_of(id)?;
        self.editing
            .get_mut(id)
            .ok_or_else(|| CoreError::InvalidState(format!("entry {id} is not being edited")))
    }
}
