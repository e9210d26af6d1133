//! Record storage.
//!
//! The store keeps records in insertion order and persists the whole
//! collection to a slot after each mutation.

mod slot;
mod store;

pub use slot::{FileSlot, MemorySlot, Slot, DEFAULT_SLOT};
pub use store::RecordStore;
