use async_trait::async_trait;

use crate::{Book, BookFilter, BookId, BookStore, DeleteAck, InsertAck, StoreError, UpdateAck};

/// Stand-in used when no client could be built at startup. Every call
/// fails with [`StoreError::Unavailable`] carrying the original reason.
#[derive(Debug, Clone)]
pub struct DisconnectedStore {
    reason: String,
}

impl DisconnectedStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable(&self) -> StoreError {
        StoreError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl BookStore for DisconnectedStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Err(self.unavailable())
    }

    async fn find(&self, _filter: &BookFilter) -> Result<Vec<Book>, StoreError> {
        Err(self.unavailable())
    }

    async fn find_by_id(&self, _id: BookId) -> Result<Option<Book>, StoreError> {
        Err(self.unavailable())
    }

    async fn insert(&self, _book: Book) -> Result<InsertAck, StoreError> {
        Err(self.unavailable())
    }

    async fn update(&self, _id: BookId, _changes: Book) -> Result<UpdateAck, StoreError> {
        Err(self.unavailable())
    }

    async fn delete(&self, _id: BookId) -> Result<DeleteAck, StoreError> {
        Err(self.unavailable())
    }
}
