//! Request handlers. Each one issues at most a single store call.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use shelf_db::{Book, BookFilter, BookId, InsertAck, SharedStore, UpdateAck};
use shelf_http::AppError;

use super::models::{ListBooksQuery, DELETE_CONFIRMATION, GREETING, NOT_FOUND_MESSAGE};

pub async fn greet() -> &'static str {
    GREETING
}

/// `GET /all-books[?genre=G]`
pub async fn list_books(
    State(store): State<SharedStore>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Book>>, AppError> {
    let query = ListBooksQuery::from_pairs(params);
    tracing::debug!(genre = ?query.genre, "genre from query parameter");

    let filter = BookFilter::default().with_genre(query.genre);
    tracing::debug!(?filter, "list filter");

    let books = store.find(&filter).await.map_err(AppError::internal_text)?;
    Ok(Json(books))
}

/// `GET /single-book/{id}`
pub async fn single_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let Some(book_id) = BookId::parse(&id) else {
        tracing::debug!(book_id = %id, "malformed book id");
        return Err(AppError::not_found(NOT_FOUND_MESSAGE));
    };

    store
        .find_by_id(book_id)
        .await
        .map_err(AppError::internal_json)?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND_MESSAGE))
}

/// `GET /user-books/{uid}`
pub async fn user_books(
    State(store): State<SharedStore>,
    Path(uid): Path<String>,
) -> Result<Json<Vec<Book>>, AppError> {
    let filter = BookFilter::default().with_user(uid);
    let books = store.find(&filter).await.map_err(AppError::internal_json)?;
    Ok(Json(books))
}

/// `POST /uploadbook`
pub async fn upload_book(
    State(store): State<SharedStore>,
    Json(book): Json<Book>,
) -> Result<Json<InsertAck>, AppError> {
    let ack = store.insert(book).await.map_err(AppError::internal_text)?;
    tracing::info!(inserted_id = %ack.inserted_id, "book inserted");
    Ok(Json(ack))
}

/// `PATCH /update-book/{id}`
pub async fn update_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(changes): Json<Book>,
) -> Result<Json<UpdateAck>, AppError> {
    let Some(book_id) = BookId::parse(&id) else {
        tracing::debug!(book_id = %id, "malformed book id");
        return Err(AppError::not_found(NOT_FOUND_MESSAGE));
    };

    let ack = store
        .update(book_id, changes)
        .await
        .map_err(AppError::internal_text)?;
    tracing::info!(
        book_id = %book_id,
        matched = ack.matched_count,
        modified = ack.modified_count,
        upserted = ack.upserted_count,
        "book updated"
    );
    Ok(Json(ack))
}

/// `DELETE /delete-book/{id}`. Answers the same confirmation whether or not
/// a record was removed.
pub async fn delete_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<&'static str, AppError> {
    let Some(book_id) = BookId::parse(&id) else {
        tracing::debug!(book_id = %id, "malformed book id, nothing to delete");
        return Ok(DELETE_CONFIRMATION);
    };

    let ack = store
        .delete(book_id)
        .await
        .map_err(AppError::internal_text)?;
    tracing::info!(book_id = %book_id, deleted_count = ack.deleted_count, "book delete");
    Ok(DELETE_CONFIRMATION)
}
