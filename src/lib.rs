//! # Roster
//!
//! An in-memory store of user records with filtered, sorted and paginated
//! views, persisted to a single slot after every mutation.
//!
//! ## Core Concepts
//!
//! - **Records**: Ordered user records with stable in-memory ids
//! - **Slots**: Durable storage holding the collection as a JSON array
//! - **Views**: Filter, per-field toggled sort, and fixed-size pages
//! - **Subscriptions**: Callbacks and channels notified on every view change
//!
//! ## Example
//!
//! ```ignore
//! use roster::{FilterSpec, Gender, Record, Roster, RosterConfig, SortField};
//!
//! let mut roster = Roster::open_or_create(RosterConfig {
//!     path: "./my-roster".into(),
//!     ..Default::default()
//! })?;
//!
//! roster.create_or_update(
//!     Record::new("Alice", "alice@example.com", "Secret123", Gender::Female, 30,
//!         vec!["1234567890".into()]),
//!     None,
//! )?;
//!
//! roster.set_filter(FilterSpec::query("ali"));
//! roster.set_sort(SortField::Age);
//!
//! let view = roster.view();
//! for row in &view.rows {
//!     println!("{} ({})", row.record.name, row.original_index);
//! }
//! ```

pub mod error;
pub mod records;
pub mod roster;
pub mod subscriptions;
pub mod types;
pub mod validation;
pub mod view;

// Re-exports
pub use error::{Result, RosterError};
pub use records::{FileSlot, MemorySlot, RecordStore, Slot, DEFAULT_SLOT};
pub use roster::{Roster, RosterConfig};
pub use subscriptions::{
    DropReason, SubscriptionConfig, SubscriptionId, SubscriptionManager, ViewChange, ViewEvent,
    ViewListener, ViewSubscription,
};
pub use types::*;
pub use validation::{Field, RecordDraft, ValidationError, ValidationErrors};
pub use view::{
    filter, FilterSpec, Page, Paginator, SortCoordinator, SortDirection, SortField, SortSpec,
    DEFAULT_PAGE_SIZE,
};
