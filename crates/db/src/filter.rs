use mongodb::bson::{doc, Document};
use serde_json::Value;

use crate::Book;

pub const GENRE_FIELD: &str = "genre";
pub const USER_FIELD: &str = "userId";

/// Field-equality filter over books. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub genre: Option<String>,
    pub user_id: Option<String>,
}

impl BookFilter {
    /// Restrict to `genre`. An empty string is treated like no genre at all.
    pub fn with_genre(mut self, genre: Option<String>) -> Self {
        self.genre = genre.filter(|g| !g.is_empty());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.genre.is_none() && self.user_id.is_none()
    }

    pub fn to_document(&self) -> Document {
        let mut filter = doc! {};
        if let Some(genre) = &self.genre {
            filter.insert(GENRE_FIELD, genre.as_str());
        }
        if let Some(user_id) = &self.user_id {
            filter.insert(USER_FIELD, user_id.as_str());
        }
        filter
    }

    /// Evaluate the filter in-process with MongoDB's equality semantics for
    /// string values: a field matches when it equals the value or is an
    /// array containing it.
    pub fn matches(&self, book: &Book) -> bool {
        field_matches(book, GENRE_FIELD, self.genre.as_deref())
            && field_matches(book, USER_FIELD, self.user_id.as_deref())
    }
}

fn field_matches(book: &Book, field: &str, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    match book.get(field) {
        Some(Value::String(actual)) => actual == expected,
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| item.as_str() == Some(expected)),
        _ => false,
    }
}
