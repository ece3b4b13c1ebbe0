//! Client side of the expense tracker.
//!
//! [`ApiClient`] talks to the server, [`Ledger`] mirrors the signed-in user's
//! list (seeded from an [`ExpenseCache`]) and [`summary`] derives the
//! dashboard figures from it.

pub use api::ApiClient;
pub use cache::{ExpenseCache, FileCache, MemoryCache, cache_key};
pub use error::{CacheError, ClientError};
pub use ledger::Ledger;
pub use summary::Summary;

mod api;
mod cache;
mod error;
mod ledger;
pub mod summary;
