//! Main Roster struct tying all components together.

use crate::error::{Result, RosterError};
use crate::records::{FileSlot, MemorySlot, RecordStore, Slot, DEFAULT_SLOT};
use crate::subscriptions::{
    SubscriptionConfig, SubscriptionId, SubscriptionManager, ViewChange, ViewSubscription,
};
use crate::types::{Record, RecordId, Row, RowKey, ViewSnapshot};
use crate::view::{
    filter, FilterSpec, Paginator, SortCoordinator, SortDirection, SortField, SortSpec,
    DEFAULT_PAGE_SIZE,
};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Roster configuration.
#[derive(Clone, Debug)]
pub struct RosterConfig {
    /// Directory holding the persisted slot.
    pub path: PathBuf,

    /// Rows per page.
    pub page_size: usize,

    /// Whether to create the directory if it doesn't exist.
    pub create_if_missing: bool,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./roster"),
            page_size: DEFAULT_PAGE_SIZE,
            create_if_missing: true,
        }
    }
}

/// The single owner of records and view state.
///
/// Every command updates the store (persisting after each mutation),
/// re-derives the view and notifies subscribers before returning.
pub struct Roster {
    /// Record store.
    store: RecordStore,

    /// Current filter.
    filter: FilterSpec,

    /// Per-field sort toggles.
    sorter: SortCoordinator,

    /// Sort applied to `filtered`, if any since the last re-filter.
    sort: Option<SortSpec>,

    paginator: Paginator,

    /// Derived rows for the current filter (and sort).
    filtered: Vec<Row>,

    /// 1-based page being viewed.
    current_page: usize,

    /// Record under edit, by stable id.
    editing: Option<RecordId>,

    /// View change notifications.
    subscriptions: SubscriptionManager,
}

impl Roster {
    /// Open an existing roster or create a new one.
    pub fn open_or_create(config: RosterConfig) -> Result<Self> {
        if config.path.exists() {
            Self::open(config)
        } else if config.create_if_missing {
            Self::create(config)
        } else {
            Err(RosterError::NotInitialized)
        }
    }

    /// Create a roster directory (if needed) and open it.
    pub fn create(config: RosterConfig) -> Result<Self> {
        fs::create_dir_all(&config.path)?;
        Self::open(config)
    }

    /// Open the roster stored under `config.path`.
    pub fn open(config: RosterConfig) -> Result<Self> {
        if !config.path.is_dir() {
            return Err(RosterError::NotInitialized);
        }

        let slot = FileSlot::open(&config.path, DEFAULT_SLOT)?;
        info!(path = %slot.path().display(), "opening roster");
        Self::with_slot(config, Box::new(slot))
    }

    /// A roster persisting to a fresh in-memory slot.
    pub fn in_memory(config: RosterConfig) -> Result<Self> {
        Self::with_slot(config, Box::new(MemorySlot::new()))
    }

    /// A roster persisting to `slot`.
    pub fn with_slot(config: RosterConfig, slot: Box<dyn Slot>) -> Result<Self> {
        let store = RecordStore::load(slot)?;
        let filter_spec = FilterSpec::default();
        let filtered = filter(store.iter(), &filter_spec);

        Ok(Self {
            store,
            filter: filter_spec,
            sorter: SortCoordinator::new(),
            sort: None,
            paginator: Paginator::new(config.page_size),
            filtered,
            current_page: 1,
            editing: None,
            subscriptions: SubscriptionManager::new(),
        })
    }

    // --- Mutations ---

    /// Append `record`, or replace the record behind the rendered row `edit`.
    ///
    /// The view is re-filtered and returns to page 1.
    pub fn create_or_update(&mut self, record: Record, edit: Option<RowKey>) -> Result<RecordId> {
        match edit {
            None => {
                let id = self.store.append(record);
                debug!(%id, "created record");
                self.after_upsert(ViewChange::Created)?;
                Ok(id)
            }
            Some(key) => {
                let index = self.store.resolve(key)?;
                self.replace_index(index, record)
            }
        }
    }

    /// Replace the record with stable id `id`.
    pub fn update_record(&mut self, id: RecordId, record: Record) -> Result<()> {
        let index = self
            .store
            .position_of(id)
            .ok_or(RosterError::RecordNotFound(id))?;
        self.replace_index(index, record)?;
        Ok(())
    }

    /// Remove the record behind the rendered row `key`.
    ///
    /// Steps the current page back by one if it no longer exists.
    pub fn delete(&mut self, key: RowKey) -> Result<Record> {
        let index = self.store.resolve(key)?;
        self.remove_index(index)
    }

    /// Remove the record with stable id `id`.
    pub fn delete_record(&mut self, id: RecordId) -> Result<Record> {
        let index = self
            .store
            .position_of(id)
            .ok_or(RosterError::RecordNotFound(id))?;
        self.remove_index(index)
    }

    // --- Edit mode ---

    /// Start editing the record behind the rendered row `key`.
    ///
    /// The record is remembered by id, so later mutations don't retarget
    /// the edit.
    pub fn begin_edit(&mut self, key: RowKey) -> Result<&Record> {
        let index = self.store.resolve(key)?;
        self.editing = Some(key.id);
        self.store
            .get(index)
            .ok_or(RosterError::RecordNotFound(key.id))
    }

    /// Record under edit, if any.
    pub fn editing(&self) -> Option<RecordId> {
        self.editing
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Save a form submission: update the record under edit, or create.
    ///
    /// Edit mode ends whether or not the update succeeds.
    pub fn submit(&mut self, record: Record) -> Result<RecordId> {
        match self.editing.take() {
            Some(id) => {
                self.update_record(id, record)?;
                Ok(id)
            }
            None => self.create_or_update(record, None),
        }
    }

    // --- View state ---

    /// Replace the filter. Discards any applied sort and returns to page 1.
    pub fn set_filter(&mut self, spec: FilterSpec) {
        debug!(query = %spec.query, gender = ?spec.gender, "set filter");
        self.filter = spec;
        self.refilter();
        self.current_page = 1;
        self.notify(ViewChange::Filtered);
    }

    /// Sort the current view by `field`, returning the direction used.
    ///
    /// The next call for the same field sorts the other way.
    pub fn set_sort(&mut self, field: SortField) -> SortDirection {
        let rows = std::mem::take(&mut self.filtered);
        let (sorted, spec) = self.sorter.sort(rows, field);
        self.filtered = sorted;
        self.sort = Some(spec);
        self.current_page = 1;
        self.notify(ViewChange::Sorted);
        spec.direction
    }

    /// Show the 1-based `page`. Pages past the end show no rows.
    pub fn go_to_page(&mut self, page: usize) -> Result<()> {
        if page == 0 {
            return Err(RosterError::InvalidPage(page));
        }
        self.current_page = page;
        self.notify(ViewChange::Paged);
        Ok(())
    }

    // --- Accessors ---

    /// The currently visible view.
    pub fn view(&self) -> ViewSnapshot {
        let page = self.paginator.paginate(&self.filtered, self.current_page);
        ViewSnapshot {
            rows: page.rows,
            page_count: page.page_count,
            current_page: page.page,
            total_matches: self.filtered.len(),
        }
    }

    /// The whole filtered (and possibly sorted) sequence.
    pub fn filtered(&self) -> &[Row] {
        &self.filtered
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.paginator.page_count_for(self.filtered.len())
    }

    pub fn page_size(&self) -> usize {
        self.paginator.page_size()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Records in store order.
    pub fn records(&self) -> Vec<Record> {
        self.store.records()
    }

    pub fn filter_spec(&self) -> &FilterSpec {
        &self.filter
    }

    /// Sort applied to the current view, if any.
    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    /// Direction the next sort on `field` will use.
    pub fn sort_direction(&self, field: SortField) -> SortDirection {
        self.sorter.direction(field)
    }

    // --- Subscriptions ---

    /// Call `listener` after every view change.
    pub fn on_view_changed<F>(&self, listener: F)
    where
        F: FnMut(ViewChange, &ViewSnapshot) + Send + 'static,
    {
        self.subscriptions.add_listener(Box::new(listener));
    }

    /// Receive view changes over a bounded channel.
    pub fn subscribe(&self, config: SubscriptionConfig) -> ViewSubscription {
        self.subscriptions.subscribe(config)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }

    // --- Internals ---

    fn replace_index(&mut self, index: usize, record: Record) -> Result<RecordId> {
        let id = self.store.replace_at(index, record)?;
        debug!(%id, index, "updated record");
        self.after_upsert(ViewChange::Updated)?;
        Ok(id)
    }

    fn remove_index(&mut self, index: usize) -> Result<Record> {
        let id = self.store.id_at(index);
        let removed = self.store.remove_at(index)?;
        debug!(index, "deleted record");

        if id.is_some() && self.editing == id {
            self.editing = None;
        }

        let persisted = self.store.persist();
        self.refilter();
        self.current_page = self
            .paginator
            .page_after_delete(self.current_page, self.filtered.len());
        self.notify(ViewChange::Deleted);

        persisted?;
        Ok(removed)
    }

    fn after_upsert(&mut self, change: ViewChange) -> Result<()> {
        let persisted = self.store.persist();
        self.refilter();
        self.current_page = 1;
        self.notify(change);
        persisted
    }

    /// Re-derive rows from the store in store order.
    fn refilter(&mut self) {
        self.filtered = filter(self.store.iter(), &self.filter);
        self.sort = None;
        debug!(
            matches = self.filtered.len(),
            total = self.store.len(),
            "filtered view"
        );
    }

    fn notify(&self, change: ViewChange) {
        if self.subscriptions.listener_count() == 0 && self.subscriptions.subscription_count() == 0
        {
            return;
        }
        self.subscriptions.broadcast(change, &self.view());
    }
}
