use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use shelf_db::SharedStore;

use super::handlers;

/// Routes of the books API, bound to `store`.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(handlers::greet))
        .route("/all-books", get(handlers::list_books))
        .route("/single-book/{id}", get(handlers::single_book))
        .route("/user-books/{uid}", get(handlers::user_books))
        .route("/uploadbook", post(handlers::upload_book))
        .route("/update-book/{id}", patch(handlers::update_book))
        .route("/delete-book/{id}", delete(handlers::delete_book))
        .with_state(store)
}
