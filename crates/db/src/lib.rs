//! Data access for the `books` collection.
//!
//! Handlers only ever see [`BookStore`]; the MongoDB driver stays behind
//! [`MongoBookStore`].

use std::sync::Arc;

use shelf_kernel::settings::DatabaseSettings;

pub mod convert;
pub mod disconnected;
pub mod error;
pub mod filter;
pub mod id;
pub mod memory;
pub mod mongo;
pub mod store;

pub use disconnected::DisconnectedStore;
pub use error::StoreError;
pub use filter::BookFilter;
pub use id::{BookId, InvalidBookId};
pub use memory::MemoryBookStore;
pub use mongo::MongoBookStore;
pub use store::{Book, BookStore, DeleteAck, InsertAck, SharedStore, UpdateAck};

/// Open the store the server runs against.
///
/// A client that cannot be built (unparseable URI, failed SRV lookup) is
/// logged and replaced by a [`DisconnectedStore`] so the listener still
/// comes up and each request fails on its own.
///
/// `Settings::validate` already rejects a missing URI at startup, so the
/// binary never reaches this function without one. Callers that build
/// [`DatabaseSettings`] by hand get the same fallback instead of a panic.
pub async fn open_store(settings: &DatabaseSettings) -> SharedStore {
    match MongoBookStore::connect(settings).await {
        Ok(store) => {
            tracing::info!(
                target: "shelf-db",
                database = %settings.name,
                collection = %settings.collection,
                "mongodb client ready"
            );
            Arc::new(store)
        }
        Err(err) => {
            tracing::error!(
                target: "shelf-db",
                error = %err,
                "failed to build mongodb client; serving without a database"
            );
            let reason = match err {
                StoreError::Unavailable(reason) => reason,
                other => other.to_string(),
            };
            Arc::new(DisconnectedStore::new(reason))
        }
    }
}
