//! Product filtering and ordering over an in-memory product list.

pub mod filter;
pub mod sort;

pub use filter::{Criterion, FilterSpec};
pub use sort::SortKey;
