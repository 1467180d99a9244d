use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::convert::{book_to_document, document_to_book};
use crate::{Book, BookFilter, BookId, BookStore, DeleteAck, InsertAck, StoreError, UpdateAck};

const ID_FIELD: &str = "_id";

/// In-process [`BookStore`] with the collection's observable behaviour:
/// insertion order, server-assigned ids, `$set` merges and id-keyed
/// upserts. Records are kept as BSON and pass through the same encoding
/// as [`crate::MongoBookStore`]. Used to run the HTTP surface without a
/// deployment.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<Vec<(BookId, Document)>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

fn with_id(id: BookId, mut fields: Document) -> Document {
    fields.remove(ID_FIELD);
    let mut doc = Document::new();
    doc.insert(ID_FIELD, Bson::ObjectId(id.object_id()));
    doc.extend(fields);
    doc
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find(&self, filter: &BookFilter) -> Result<Vec<Book>, StoreError> {
        let books = self.books.read().await;
        Ok(books
            .iter()
            .map(|(_, doc)| document_to_book(doc.clone()))
            .filter(|book| filter.matches(book))
            .collect())
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        let books = self.books.read().await;
        Ok(books
            .iter()
            .find(|(stored, _)| *stored == id)
            .map(|(_, doc)| document_to_book(doc.clone())))
    }

    async fn insert(&self, book: Book) -> Result<InsertAck, StoreError> {
        let doc = book_to_document(&book)?;
        let id = BookId::generate();
        self.books.write().await.push((id, with_id(id, doc)));
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: Value::String(id.to_hex()),
        })
    }

    async fn update(&self, id: BookId, changes: Book) -> Result<UpdateAck, StoreError> {
        let mut set = book_to_document(&changes)?;
        set.remove(ID_FIELD);
        let mut books = self.books.write().await;

        if let Some((_, doc)) = books.iter_mut().find(|(stored, _)| *stored == id) {
            let mut modified = false;
            for (field, value) in set {
                if doc.get(&field) != Some(&value) {
                    doc.insert(field, value);
                    modified = true;
                }
            }
            return Ok(UpdateAck {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_count: 0,
                upserted_id: None,
            });
        }

        books.push((id, with_id(id, set)));
        Ok(UpdateAck {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(Value::String(id.to_hex())),
        })
    }

    async fn delete(&self, id: BookId) -> Result<DeleteAck, StoreError> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|(stored, _)| *stored != id);
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: (before - books.len()) as u64,
        })
    }
}
