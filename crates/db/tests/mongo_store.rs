//! Runs against a live deployment. Skipped unless `MONGODB_URI` is set.
//!
//! Each test works in its own throwaway collection and drops it afterwards.

use mongodb::bson::oid::ObjectId;
use serde_json::{json, Value};
use shelf_db::{Book, BookFilter, BookId, BookStore, MongoBookStore};
use shelf_kernel::settings::DatabaseSettings;

async fn scratch_store() -> Option<MongoBookStore> {
    let Ok(uri) = std::env::var("MONGODB_URI") else {
        eprintln!("MONGODB_URI not set; skipping");
        return None;
    };
    let settings = DatabaseSettings {
        uri: Some(uri),
        collection: format!("books_test_{}", ObjectId::new().to_hex()),
        ..DatabaseSettings::default()
    };
    let store = MongoBookStore::connect(&settings)
        .await
        .expect("client build");
    store.ping().await.expect("ping");
    Some(store)
}

async fn drop_scratch(store: MongoBookStore) {
    store.collection().drop().await.expect("drop collection");
    store.close().await;
}

fn book(value: Value) -> Book {
    value.as_object().cloned().expect("object literal")
}

async fn insert(store: &MongoBookStore, value: Value) -> BookId {
    let ack = store.insert(book(value)).await.expect("insert");
    assert!(ack.acknowledged);
    BookId::parse(ack.inserted_id.as_str().expect("hex id")).expect("object id")
}

#[tokio::test]
async fn insert_then_find_by_id_returns_the_record() {
    let Some(store) = scratch_store().await else {
        return;
    };

    let id = insert(
        &store,
        json!({"_id": "mine", "title": "Dune", "pages": 412, "tags": ["a", "b"]}),
    )
    .await;

    let stored = store.find_by_id(id).await.expect("find_one").expect("present");
    assert_eq!(
        Value::Object(stored),
        json!({"_id": id.to_hex(), "title": "Dune", "pages": 412, "tags": ["a", "b"]})
    );
    assert!(store
        .find_by_id(BookId::generate())
        .await
        .expect("find_one")
        .is_none());

    drop_scratch(store).await;
}

#[tokio::test]
async fn find_filters_by_genre_and_user() {
    let Some(store) = scratch_store().await else {
        return;
    };

    insert(&store, json!({"title": "A", "genre": "scifi", "userId": "u1"})).await;
    insert(&store, json!({"title": "B", "genre": "fantasy", "userId": "u2"})).await;
    insert(&store, json!({"title": "C", "genre": "scifi", "userId": "u2"})).await;

    let titles = |books: Vec<Book>| -> Vec<Value> {
        books.into_iter().map(|b| b["title"].clone()).collect()
    };

    let all = store.find(&BookFilter::default()).await.expect("find");
    assert_eq!(all.len(), 3);

    let scifi = store
        .find(&BookFilter::default().with_genre(Some("scifi".to_string())))
        .await
        .expect("find");
    assert_eq!(titles(scifi), vec![json!("A"), json!("C")]);

    let u2 = store
        .find(&BookFilter::default().with_user("u2"))
        .await
        .expect("find");
    assert_eq!(titles(u2), vec![json!("B"), json!("C")]);

    let nobody = store
        .find(&BookFilter::default().with_user("nobody"))
        .await
        .expect("find");
    assert!(nobody.is_empty());

    drop_scratch(store).await;
}

#[tokio::test]
async fn update_merges_fields_and_reports_counts() {
    let Some(store) = scratch_store().await else {
        return;
    };

    let id = insert(&store, json!({"title": "Dune", "genre": "scifi"})).await;

    let ack = store
        .update(id, book(json!({"genre": "classic", "_id": "ignored"})))
        .await
        .expect("update");
    assert_eq!((ack.matched_count, ack.modified_count), (1, 1));
    assert_eq!((ack.upserted_count, ack.upserted_id), (0, None));

    let again = store
        .update(id, book(json!({"genre": "classic"})))
        .await
        .expect("update");
    assert_eq!((again.matched_count, again.modified_count), (1, 0));

    let stored = store.find_by_id(id).await.expect("find_one").expect("present");
    assert_eq!(
        Value::Object(stored),
        json!({"_id": id.to_hex(), "title": "Dune", "genre": "classic"})
    );

    drop_scratch(store).await;
}

#[tokio::test]
async fn update_of_unknown_id_upserts_under_that_id() {
    let Some(store) = scratch_store().await else {
        return;
    };

    let id = BookId::generate();
    let ack = store
        .update(id, book(json!({"title": "New"})))
        .await
        .expect("upsert");
    assert_eq!(ack.matched_count, 0);
    assert_eq!(ack.modified_count, 0);
    assert_eq!(ack.upserted_count, 1);
    assert_eq!(ack.upserted_id, Some(json!(id.to_hex())));

    let stored = store.find_by_id(id).await.expect("find_one").expect("upserted");
    assert_eq!(
        Value::Object(stored),
        json!({"_id": id.to_hex(), "title": "New"})
    );

    drop_scratch(store).await;
}

#[tokio::test]
async fn delete_is_idempotent() {
    let Some(store) = scratch_store().await else {
        return;
    };

    let id = insert(&store, json!({"title": "Dune"})).await;

    assert_eq!(store.delete(id).await.expect("delete").deleted_count, 1);
    assert_eq!(store.delete(id).await.expect("delete").deleted_count, 0);
    assert!(store.find_by_id(id).await.expect("find_one").is_none());

    drop_scratch(store).await;
}

#[tokio::test]
async fn extended_json_wrappers_round_trip_literally() {
    let Some(store) = scratch_store().await else {
        return;
    };

    let id = insert(
        &store,
        json!({"ref": {"$oid": "65a1f0c2e4b0a1b2c3d4e5f6"}, "at": {"$date": "2024-01-01"}}),
    )
    .await;

    let stored = store.find_by_id(id).await.expect("find_one").expect("present");
    assert_eq!(stored["ref"], json!({"$oid": "65a1f0c2e4b0a1b2c3d4e5f6"}));
    assert_eq!(stored["at"], json!({"$date": "2024-01-01"}));

    drop_scratch(store).await;
}
