//! View change notifications.
//!
//! Every command that changes the visible view notifies:
//! - Callbacks registered with `Roster::on_view_changed`
//! - Channel subscribers created with `Roster::subscribe`
//!
//! Channel subscribers have bounded buffers; a subscriber that falls behind
//! is dropped instead of blocking the writer.
//!
//! # Example
//!
//! ```ignore
//! let handle = roster.subscribe(SubscriptionConfig::default());
//! roster.set_filter(FilterSpec::query("ali"));
//!
//! match handle.recv() {
//!     Ok(ViewEvent::Changed { snapshot, .. }) => render(&snapshot.rows),
//!     Ok(ViewEvent::Dropped { reason }) => eprintln!("dropped: {:?}", reason),
//!     Err(_) => {}
//! }
//! ```

mod manager;
mod types;

pub use manager::{SubscriptionManager, ViewListener};
pub use types::{
    DropReason, SubscriptionConfig, SubscriptionId, ViewChange, ViewEvent, ViewSubscription,
};
