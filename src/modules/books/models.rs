/// Plain-text greeting served at `/`.
pub const GREETING: &str = "Hello World!";

/// Message of the 404 body for a missing or malformed book id.
pub const NOT_FOUND_MESSAGE: &str = "Book not found";

/// Fixed body of every successful delete.
pub const DELETE_CONFIRMATION: &str = "Deleted Successfully";

/// Query string of `GET /all-books`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBooksQuery {
    pub genre: Option<String>,
}

impl ListBooksQuery {
    /// Read from raw query pairs. A repeated `genre` keeps its first value;
    /// unknown parameters are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let genre = pairs
            .into_iter()
            .find(|(key, _)| key == "genre")
            .map(|(_, value)| value);
        Self { genre }
    }
}
