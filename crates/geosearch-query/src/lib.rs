//! Query assembly: request parameters to a backend-ready query document.
//!
//! The flow is strictly leaf-first: `params` normalizes the raw parameter
//! strings, `filter` and `sort` turn them into validated specs against the
//! field mapping registry, and `assemble` combines everything into one
//! query document. Nothing here talks to the network.

pub mod assemble;
pub mod filter;
pub mod params;
pub mod sort;

pub use assemble::{assemble, QueryTuning};
pub use filter::{build_filters, FilterSpec};
pub use params::SearchParams;
pub use sort::{build_sort, SortOrder, SortSpec};
