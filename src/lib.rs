//! Client library for the federation membership platform: typed REST
//! access, per-resource state containers, list filtering and header stats.

pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod output;
pub mod slice;
pub mod store;
pub mod summary;

pub use error::{ClientError, ClientResult};
pub use filter::{Filterable, FilterCriteria};
pub use slice::{RemoteSlice, SliceStatus};
pub use store::Store;
