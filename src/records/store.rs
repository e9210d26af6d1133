//! Canonical ordered record collection.

use super::slot::Slot;
use crate::error::{Result, RosterError};
use crate::types::{Record, RecordId, RowKey};
use tracing::{debug, warn};

/// A record paired with its stable id.
#[derive(Clone, Debug)]
struct Entry {
    id: RecordId,
    record: Record,
}

/// Owns the ordered record sequence and the slot it persists to.
///
/// Entries stay sorted by id: ids are handed out in increasing order on
/// append, removal preserves relative order and replacement keeps the id.
pub struct RecordStore {
    slot: Box<dyn Slot>,
    entries: Vec<Entry>,
    next_id: RecordId,
}

impl RecordStore {
    /// Create an empty store without reading the slot.
    pub fn new(slot: Box<dyn Slot>) -> Self {
        Self {
            slot,
            entries: Vec::new(),
            next_id: RecordId(1),
        }
    }

    /// Load the store from its slot.
    ///
    /// Absent data yields an empty store. Corrupt data is discarded with a
    /// warning and also yields an empty store.
    pub fn load(slot: Box<dyn Slot>) -> Result<Self> {
        let records = match Self::try_load(&*slot) {
            Ok(records) => records,
            Err(RosterError::CorruptPersistedData(reason)) => {
                warn!(%reason, "discarding corrupt persisted records");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let mut store = Self::new(slot);
        for record in records {
            store.append(record);
        }
        debug!(count = store.len(), "loaded records");
        Ok(store)
    }

    /// Read and decode the slot without falling back.
    ///
    /// IO failures are returned as-is; undecodable contents become
    /// `CorruptPersistedData`.
    pub fn try_load(slot: &dyn Slot) -> Result<Vec<Record>> {
        match slot.read()? {
            None => Ok(Vec::new()),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| RosterError::CorruptPersistedData(e.to_string())),
        }
    }

    /// Serialize the whole sequence and overwrite the slot.
    pub fn persist(&self) -> Result<()> {
        let records: Vec<&Record> = self.entries.iter().map(|e| &e.record).collect();
        let bytes = serde_json::to_vec(&records)?;
        self.slot.write(&bytes)?;
        debug!(count = records.len(), bytes = bytes.len(), "persisted records");
        Ok(())
    }

    /// Append a record, returning its new id.
    pub fn append(&mut self, record: Record) -> RecordId {
        let id = self.next_id;
        self.next_id = id.next();
        self.entries.push(Entry { id, record });
        id
    }

    /// Replace the record at `index`, keeping its id.
    pub fn replace_at(&mut self, index: usize, record: Record) -> Result<RecordId> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(RosterError::IndexOutOfRange { index, len })?;
        entry.record = record;
        Ok(entry.id)
    }

    /// Remove the record at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<Record> {
        self.check_index(index)?;
        Ok(self.entries.remove(index).record)
    }

    /// Current position of `id`, if it is still held.
    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.entries.binary_search_by_key(&id, |e| e.id).ok()
    }

    /// Position of a rendered row, checked against the current contents.
    ///
    /// Fails with `IndexOutOfRange` when the index is past the end and with
    /// `StaleIndex` when another record now sits at that position.
    pub fn resolve(&self, key: RowKey) -> Result<usize> {
        let index = key.original_index;
        self.check_index(index)?;
        let found = self.id_at(index);
        if found != Some(key.id) {
            return Err(RosterError::StaleIndex {
                index,
                expected: key.id,
                found,
            });
        }
        Ok(index)
    }

    /// Id of the record at `index`.
    pub fn id_at(&self, index: usize) -> Option<RecordId> {
        self.entries.get(index).map(|e| e.id)
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.entries.get(index).map(|e| &e.record)
    }

    pub fn get_by_id(&self, id: RecordId) -> Option<&Record> {
        self.position_of(id).map(|i| &self.entries[i].record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(id, record)` in store order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Record)> + '_ {
        self.entries.iter().map(|e| (e.id, &e.record))
    }

    /// Clone out the records in store order.
    pub fn records(&self) -> Vec<Record> {
        self.entries.iter().map(|e| e.record.clone()).collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(RosterError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }
}
