//! Persistent point stores.
//!
//! Stores implement [`PointResolver`](crate::PointResolver) and surface read
//! failures as [`ResolveError::StoreUnavailable`](crate::ResolveError) so a
//! [`FallbackResolver`](crate::FallbackResolver) can take over.

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqlitePointStore, SqlitePointStoreError};
