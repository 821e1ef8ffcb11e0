use std::collections::HashMap;
use std::fmt;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};

use crate::dynamodb::Item;
use crate::error::Result;

/// Name of the partition key attribute.
pub const BOOK_ID: &str = "book_id";
/// Name of the sort key attribute.
pub const TITLE: &str = "title";
pub const AUTHOR: &str = "author";
pub const ISBN: &str = "isbn";
pub const YEAR_OF_PUBLICATION: &str = "year_of_publication";

/// A record in the Books table.
///
/// `book_id` and `title` together form the primary key. The remaining
/// attributes are optional and are left out of the stored item when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_of_publication: Option<String>,
}

impl Book {
    /// Creates a book with only its key attributes set.
    pub fn new(book_id: u64, title: impl Into<String>) -> Self {
        Self {
            book_id,
            title: title.into(),
            author: None,
            isbn: None,
            year_of_publication: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn with_year_of_publication(mut self, year: impl Into<String>) -> Self {
        self.year_of_publication = Some(year.into());
        self
    }

    /// Returns the primary key of this record.
    pub fn key(&self) -> BookKey {
        BookKey::new(self.book_id, self.title.clone())
    }

    /// Converts the record into a DynamoDB attribute map.
    pub fn to_item(&self) -> Result<Item> {
        let attributes: HashMap<String, AttributeValue> = serde_dynamo::to_item(self)?;
        Ok(Item::from(attributes))
    }

    /// Reads a record back from a DynamoDB attribute map.
    pub fn from_item(item: Item) -> Result<Self> {
        Ok(serde_dynamo::from_item(item.into_attributes())?)
    }
}

/// The composite primary key of a [`Book`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookKey {
    pub book_id: u64,
    pub title: String,
}

impl BookKey {
    pub fn new(book_id: u64, title: impl Into<String>) -> Self {
        Self {
            book_id,
            title: title.into(),
        }
    }

    /// Builds the key attribute map sent with item-level requests.
    pub fn to_item(&self) -> Item {
        Item::new()
            .set_number(BOOK_ID, self.book_id)
            .set_string(TITLE, self.title.as_str())
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}, {}={:?}", BOOK_ID, self.book_id, TITLE, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn americanah() -> Book {
        Book::new(1001, "Americanah")
            .with_author("Chimamanda Ngozi Adichie")
            .with_isbn("9780307455925")
            .with_year_of_publication("2013")
    }

    #[test]
    fn test_to_item_uses_number_and_string_types() {
        let item = americanah().to_item().unwrap();

        assert_eq!(item.get_number(BOOK_ID), Some(1001.0));
        assert_eq!(item.get_string(TITLE), Some(&"Americanah".to_string()));
        assert_eq!(item.get_string(ISBN), Some(&"9780307455925".to_string()));
        assert_eq!(
            item.get_string(YEAR_OF_PUBLICATION),
            Some(&"2013".to_string())
        );
    }

    #[test]
    fn test_to_item_omits_unset_attributes() {
        let item = Book::new(1005, "There Was a Country").to_item().unwrap();

        assert_eq!(item.len(), 2);
        assert!(item.get(AUTHOR).is_none());
        assert!(item.get(ISBN).is_none());
    }

    #[test]
    fn test_from_item_reads_stored_attributes() {
        let item = Item::new()
            .set_number(BOOK_ID, 1002u64)
            .set_string(TITLE, "Half of a Yellow Sun")
            .set_string(AUTHOR, "Chimamanda Ngozi Adichie");

        let book = Book::from_item(item).unwrap();

        assert_eq!(book.book_id, 1002);
        assert_eq!(book.title, "Half of a Yellow Sun");
        assert_eq!(book.author.as_deref(), Some("Chimamanda Ngozi Adichie"));
        assert_eq!(book.isbn, None);
    }

    #[test]
    fn test_from_item_without_key_fails() {
        let item = Item::new().set_string(AUTHOR, "Anonymous");
        assert!(Book::from_item(item).is_err());
    }

    #[test]
    fn test_key_item_has_only_key_attributes() {
        let key = americanah().key();
        let item = key.to_item();

        assert_eq!(item.len(), 2);
        assert_eq!(item.get(BOOK_ID), Some(&AttributeValue::N("1001".into())));
        assert_eq!(
            item.get(TITLE),
            Some(&AttributeValue::S("Americanah".into()))
        );
    }

    #[test]
    fn test_book_deserializes_from_json() {
        let json = r#"{"book_id": 1003, "title": "Purple Hibiscus", "isbn": "1616202416"}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book, Book::new(1003, "Purple Hibiscus").with_isbn("1616202416"));
    }
}
