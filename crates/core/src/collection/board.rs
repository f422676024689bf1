use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::services::entry_service::EntryService;
use crate::services::palette_service::PaletteService;

use super::editable::{EditableCollection, ScrollRequest};
use super::entry::{CollectionEntry, EntryId};

/// The income page's editable list, kept in sync with the backend.
///
/// Every mutation is applied locally first (optimistic) and then persisted:
/// - `save` on a pending entry creates it and swaps the pending id for the
///   server id; on a persisted entry it updates it.
/// - `delete` removes a persisted entry on the server too; pending entries
///   never reached the server and are only dropped locally.
///
/// When persistence fails the local change is rolled back and the error is
/// returned.
pub struct IncomeBoard {
    collection: EditableCollection,
    service: EntryService,
    palette: Arc<PaletteService>,
}

impl IncomeBoard {
    pub fn new(service: EntryService, palette: Arc<PaletteService>) -> Self {
        Self {
            collection: EditableCollection::new(),
            service,
            palette,
        }
    }

    pub fn collection(&self) -> &EditableCollection {
        &self.collection
    }

    /// Direct access for the pure edit transitions (`begin_edit`,
    /// `set_label`, `set_amount`, `cancel`).
    pub fn collection_mut(&mut self) -> &mut EditableCollection {
        &mut self.collection
    }

    /// Replace the local list with the server's. Records without a color get
    /// (and keep) a palette color keyed by their id.
    pub async fn load(&mut self) -> Result<usize, CoreError> {
        let domain = self.service.domain();
        let records = self.service.list().await?;

        let entries: Vec<CollectionEntry> = records
            .iter()
            .map(|record| {
                let color = match record.color.as_deref().filter(|c| !c.is_empty()) {
                    Some(c) => c.to_string(),
                    None => self.palette.assign(domain, &record.id.to_string()),
                };
                CollectionEntry::from_record(record, domain.unnamed_label(), color)
            })
            .collect();

        let count = entries.len();
        self.collection.replace_all(entries);
        debug!(%domain, count, "loaded entries");
        Ok(count)
    }

    /// Append a local placeholder. It stays pending until saved.
    pub fn add(&mut self) -> ScrollRequest {
        self.collection.add()
    }

    /// Commit the edit buffers of `id` and persist the result.
    /// Returns the entry's id afterwards (the server id for a newly created entry).
    pub async fn save(&mut self, id: &EntryId) -> Result<EntryId, CoreError> {
        let previous = self.collection.save(id)?;
        let mut entry = match self.collection.get(id) {
            Some(entry) => entry.clone(),
            None => return Err(CoreError::RecordNotFound(id.to_string())),
        };
        if entry.label != previous.label {
            entry.refresh_description(self.service.domain(), &previous.label);
            self.collection.replace(id, entry.clone())?;
        }
        let input = entry.to_input();

        let result = match id {
            EntryId::Pending(_) => self.service.create(&input).await.map(|resp| resp.record_id()),
            EntryId::Persisted(record_id) => self.service.update(record_id, &input).await.map(|_| None),
        };

        match result {
            Ok(Some(server_id)) => {
                let new_id = EntryId::Persisted(server_id);
                self.collection.rekey(id, new_id.clone())?;
                Ok(new_id)
            }
            Ok(None) => {
                if id.is_pending() {
                    warn!(entry = %id, "create response carried no id, entry stays pending");
                }
                Ok(id.clone())
            }
            Err(e) => {
                self.collection.replace(id, previous)?;
                Err(e)
            }
        }
    }

    /// Remove `id` locally and, for persisted entries, on the server.
    pub async fn delete(&mut self, id: &EntryId) -> Result<(), CoreError> {
        let (index, removed) = self.collection.delete(id)?;

        let Some(record_id) = id.record_id() else {
            return Ok(());
        };

        if let Err(e) = self.service.delete(record_id).await {
            self.collection.restore(index, removed);
            return Err(e);
        }
        Ok(())
    }

    /// Sum of all amounts.
    pub fn total(&self) -> f64 {
        self.collection.total()
    }
}
