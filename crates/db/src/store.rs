use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{BookFilter, BookId, StoreError};

/// A schemaless book record. Only `_id` is guaranteed once stored.
pub type Book = Map<String, Value>;

/// Handle shared by every request handler.
pub type SharedStore = Arc<dyn BookStore>;

/// Acknowledgement of an insert, shaped like the MongoDB driver's result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: Value,
}

/// Acknowledgement of an update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<Value>,
}

/// Acknowledgement of a delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// One call per request: every method maps to exactly one collection
/// operation.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Round-trip to the deployment without touching the collection.
    async fn ping(&self) -> Result<(), StoreError>;

    /// All books matching `filter`, in the store's natural order.
    async fn find(&self, filter: &BookFilter) -> Result<Vec<Book>, StoreError>;

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError>;

    /// Insert `book` as a new record. Any `_id` in the payload is dropped so
    /// the store assigns one.
    async fn insert(&self, book: Book) -> Result<InsertAck, StoreError>;

    /// `$set` the fields of `changes` on the record with `id`, inserting a
    /// record with that id when none exists.
    async fn update(&self, id: BookId, changes: Book) -> Result<UpdateAck, StoreError>;

    async fn delete(&self, id: BookId) -> Result<DeleteAck, StoreError>;

    /// Release the underlying connection. Called once at shutdown.
    async fn close(&self) {}
}
