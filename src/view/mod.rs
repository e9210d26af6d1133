//! View derivation: filter, sort and paginate.
//!
//! Views are pure functions of the record store plus the current filter,
//! sort and page state. Sorting reorders the derived sequence only; the
//! store keeps insertion order.

mod filter;
mod page;
mod sort;

pub use filter::{filter, FilterSpec};
pub use page::{Page, Paginator, DEFAULT_PAGE_SIZE};
pub use sort::{SortCoordinator, SortDirection, SortField, SortSpec};
