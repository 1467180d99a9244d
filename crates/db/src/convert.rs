//! Translation between stored BSON and the JSON clients exchange.
//!
//! ObjectIds are rendered as bare hex strings and dates as RFC 3339, which
//! is what JavaScript clients of the collection already expect. Everything
//! else uses relaxed extended JSON.
//!
//! The JSON → BSON direction is literal: `{"$oid": ...}` in a request body
//! is stored as a nested document with a `$oid` key, not as an ObjectId.

use mongodb::bson::{Bson, Document};
use serde_json::{Map, Number, Value};

use crate::{Book, StoreError};

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(date) => match date.try_to_rfc3339_string() {
            Ok(text) => Value::String(text),
            Err(_) => Value::from(date.timestamp_millis()),
        },
        Bson::Document(doc) => Value::Object(document_to_book(doc)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

pub fn document_to_book(doc: Document) -> Map<String, Value> {
    doc.into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect()
}

/// Encode a request payload for storage, field by field.
pub fn book_to_document(book: &Book) -> Result<Document, StoreError> {
    book.iter()
        .map(|(key, value)| Ok((key.clone(), json_to_bson(value)?)))
        .collect()
}

pub fn json_to_bson(value: &Value) -> Result<Bson, StoreError> {
    Ok(match value {
        Value::Null => Bson::Null,
        Value::Bool(flag) => Bson::Boolean(*flag),
        Value::Number(number) => number_to_bson(number)?,
        Value::String(text) => Bson::String(text.clone()),
        Value::Array(items) => Bson::Array(
            items
                .iter()
                .map(json_to_bson)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Object(fields) => Bson::Document(book_to_document(fields)?),
    })
}

fn number_to_bson(number: &Number) -> Result<Bson, StoreError> {
    if let Some(int) = number.as_i64() {
        Ok(Bson::Int64(int))
    } else if let Some(float) = number.as_f64().filter(|_| !number.is_u64()) {
        Ok(Bson::Double(float))
    } else {
        Err(StoreError::Encode(format!(
            "integer {} exceeds the signed 64-bit range",
            number
        )))
    }
}
