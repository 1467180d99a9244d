use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use shelf_kernel::settings::DatabaseSettings;

use crate::convert::{bson_to_json, book_to_document, document_to_book};
use crate::{Book, BookFilter, BookId, BookStore, DeleteAck, InsertAck, StoreError, UpdateAck};

/// [`BookStore`] over a single MongoDB collection.
///
/// `Client` is internally pooled and cheap to clone; one instance serves
/// every concurrent request.
#[derive(Clone)]
pub struct MongoBookStore {
    client: Client,
    collection: Collection<Document>,
}

impl MongoBookStore {
    /// Build the client from settings. Only parsing and SRV resolution
    /// happen here; sockets are opened lazily by the driver.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let uri = settings
            .connection_uri()
            .ok_or_else(|| StoreError::Unavailable("database.uri is not configured".into()))?;

        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(settings.app_name.clone());
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options)?;
        let collection = client
            .database(&settings.name)
            .collection::<Document>(&settings.collection);

        Ok(Self { client, collection })
    }

    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }
}

fn by_id(id: BookId) -> Document {
    doc! { "_id": id.object_id() }
}

fn insert_document(book: &Book) -> Result<Document, StoreError> {
    let mut doc = book_to_document(book)?;
    doc.remove("_id");
    Ok(doc)
}

/// `$set` of every submitted field except `_id`, which stays immutable.
fn update_document(changes: &Book) -> Result<Document, StoreError> {
    let mut set = book_to_document(changes)?;
    set.remove("_id");
    Ok(doc! { "$set": set })
}

#[async_trait]
impl BookStore for MongoBookStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn find(&self, filter: &BookFilter) -> Result<Vec<Book>, StoreError> {
        let cursor = self.collection.find(filter.to_document()).await?;
        let docs: Vec<Document> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(document_to_book).collect())
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        let found = self.collection.find_one(by_id(id)).await?;
        Ok(found.map(document_to_book))
    }

    async fn insert(&self, book: Book) -> Result<InsertAck, StoreError> {
        let result = self.collection.insert_one(insert_document(&book)?).await?;
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: bson_to_json(result.inserted_id),
        })
    }

    async fn update(&self, id: BookId, changes: Book) -> Result<UpdateAck, StoreError> {
        let result = self
            .collection
            .update_one(by_id(id), update_document(&changes)?)
            .upsert(true)
            .await?;

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: result.upserted_id.map(bson_to_json),
        })
    }

    async fn delete(&self, id: BookId) -> Result<DeleteAck, StoreError> {
        let result = self.collection.delete_one(by_id(id)).await?;
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn close(&self) {
        tracing::info!(target: "shelf-db", "shutting down mongodb client");
        self.client.clone().shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;
    use serde_json::{json, Value};

    fn book(value: Value) -> Book {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn by_id_filters_on_the_object_id() {
        let id = BookId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        let filter = by_id(id);

        assert_eq!(filter.len(), 1);
        assert_eq!(filter.get("_id"), Some(&Bson::ObjectId(id.object_id())));
    }

    #[test]
    fn update_sets_submitted_fields_without_the_id() {
        let update = update_document(&book(json!({
            "_id": "65a1f0c2e4b0a1b2c3d4e5f6",
            "genre": "classic",
            "pages": 412,
        })))
        .unwrap();

        assert_eq!(
            update,
            doc! { "$set": { "genre": "classic", "pages": 412_i64 } }
        );
    }

    #[test]
    fn update_with_only_an_id_sets_nothing() {
        let update = update_document(&book(json!({"_id": "x"}))).unwrap();
        assert_eq!(update, doc! { "$set": {} });
    }

    #[test]
    fn insert_drops_a_supplied_id() {
        let doc = insert_document(&book(json!({"_id": "mine", "title": "Dune"}))).unwrap();
        assert_eq!(doc, doc! { "title": "Dune" });
    }

    #[test]
    fn unencodable_updates_fail_before_reaching_the_driver() {
        let err = update_document(&book(json!({"copies": u64::MAX}))).unwrap_err();
        assert!(matches!(err, StoreError::Encode(_)));
    }
}
