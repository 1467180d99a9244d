use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use thiserror::Error;

/// Store-assigned identifier of a book (`_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookId(ObjectId);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a valid book id")]
pub struct InvalidBookId(pub String);

impl BookId {
    /// Fresh identifier, generated the way the server would.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Lenient parse for path segments: anything that is not a 24-digit hex
    /// ObjectId yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl FromStr for BookId {
    type Err = InvalidBookId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| InvalidBookId(raw.to_string()))
    }
}

impl From<ObjectId> for BookId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}
