//! In-memory Books table.
//!
//! Keeps raw items in a `BTreeMap` ordered by (`book_id`, `title`) behind a
//! `tokio::sync::RwLock`, and reproduces the parts of DynamoDB's behavior the
//! facade relies on: provisioning once, overwrite on put, key validation,
//! sort-key ordering and conditional writes. Nothing is persisted.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, TableStatus};
use tokio::sync::RwLock;
use tracing::info;

use crate::book::{Book, BookKey, ISBN};
use crate::dynamodb::Item;
use crate::error::{FacadeError, Result};
use crate::store::{BookStore, WriteAck};

/// In-process [`BookStore`] for tests and local runs.
#[derive(Debug, Clone)]
pub struct InMemoryBookStore {
    table_name: String,
    items: Arc<RwLock<Option<BTreeMap<BookKey, Item>>>>,
}

impl InMemoryBookStore {
    /// Creates a store whose table has not been provisioned yet.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            items: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a store with an empty, already provisioned table.
    pub fn provisioned(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            items: Arc::new(RwLock::new(Some(BTreeMap::new()))),
        }
    }

    /// Number of records currently stored.
    pub async fn len(&self) -> usize {
        self.items.read().await.as_ref().map_or(0, BTreeMap::len)
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns the raw stored item at `key`.
    pub async fn raw_item(&self, key: &BookKey) -> Option<Item> {
        self.items
            .read()
            .await
            .as_ref()
            .and_then(|items| items.get(key).cloned())
    }

    fn table_not_found(&self) -> FacadeError {
        FacadeError::TableNotFound(format!(
            "Requested resource not found: Table: {} not found",
            self.table_name
        ))
    }
}

fn validate_key(key: &BookKey) -> Result<()> {
    if key.title.is_empty() {
        return Err(FacadeError::Validation(
            "One or more parameter values are not valid. The AttributeValue for a key attribute cannot contain an empty string value. Key: title".to_string(),
        ));
    }
    Ok(())
}

fn check_isbn(stored: Option<&Item>, key: &BookKey, expected_isbn: Option<&str>) -> Result<()> {
    let Some(expected) = expected_isbn else {
        return Ok(());
    };
    let current = stored.and_then(|item| item.get_string(ISBN));
    if current.map(String::as_str) == Some(expected) {
        Ok(())
    } else {
        Err(FacadeError::ConditionalCheckFailed(
            key.to_item().describe_key(),
        ))
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn provision_table(&self) -> Result<TableStatus> {
        let mut items = self.items.write().await;
        if items.is_some() {
            return Err(FacadeError::AlreadyExists(self.table_name.clone()));
        }
        *items = Some(BTreeMap::new());
        info!("Table '{}' created in memory", self.table_name);
        Ok(TableStatus::Active)
    }

    async fn insert(&self, book: &Book) -> Result<WriteAck> {
        let key = book.key();
        validate_key(&key)?;
        let item = book.to_item()?;

        let mut guard = self.items.write().await;
        let items = guard.as_mut().ok_or_else(|| self.table_not_found())?;
        let replaced = items.insert(key, item);
        Ok(WriteAck {
            attributes: replaced,
            consumed_capacity: None,
        })
    }

    async fn get(&self, key: &BookKey) -> Result<Option<Book>> {
        validate_key(key)?;
        let guard = self.items.read().await;
        let items = guard.as_ref().ok_or_else(|| self.table_not_found())?;
        items.get(key).cloned().map(Book::from_item).transpose()
    }

    async fn find_by_key(&self, book_id: u64) -> Result<Vec<Book>> {
        let guard = self.items.read().await;
        let items = guard.as_ref().ok_or_else(|| self.table_not_found())?;
        items
            .range(BookKey::new(book_id, "")..)
            .take_while(|(key, _)| key.book_id == book_id)
            .map(|(_, item)| Book::from_item(item.clone()))
            .collect()
    }

    async fn update_isbn(
        &self,
        key: &BookKey,
        new_isbn: &str,
        expected_isbn: Option<&str>,
    ) -> Result<WriteAck> {
        validate_key(key)?;
        let mut guard = self.items.write().await;
        let items = guard.as_mut().ok_or_else(|| self.table_not_found())?;
        check_isbn(items.get(key), key, expected_isbn)?;

        let item = items.entry(key.clone()).or_insert_with(|| key.to_item());
        item.attributes
            .insert(ISBN.to_string(), AttributeValue::S(new_isbn.to_string()));
        Ok(WriteAck {
            attributes: Some(Item::new().set_string(ISBN, new_isbn)),
            consumed_capacity: None,
        })
    }

    async fn delete(&self, key: &BookKey, expected_isbn: Option<&str>) -> Result<WriteAck> {
        validate_key(key)?;
        let mut guard = self.items.write().await;
        let items = guard.as_mut().ok_or_else(|| self.table_not_found())?;
        check_isbn(items.get(key), key, expected_isbn)?;

        Ok(WriteAck {
            attributes: items.remove(key),
            consumed_capacity: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_operations_before_provisioning_fail() {
        let store = InMemoryBookStore::new("Books");

        let err = store.find_by_key(1001).await.unwrap_err();
        assert!(matches!(err, FacadeError::TableNotFound(_)));

        let err = store.insert(&Book::new(1001, "Americanah")).await.unwrap_err();
        assert!(matches!(err, FacadeError::TableNotFound(_)));
    }

    #[tokio::test]
    async fn test_find_by_key_orders_by_title() {
        let store = InMemoryBookStore::provisioned("Books");
        for title in ["Zikora", "Americanah", "Half of a Yellow Sun"] {
            store.insert(&Book::new(1001, title)).await.unwrap();
        }
        store.insert(&Book::new(1002, "Aardvark")).await.unwrap();
        store.insert(&Book::new(1000, "Zebra")).await.unwrap();

        let titles: Vec<String> = store
            .find_by_key(1001)
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.title)
            .collect();
        assert_eq!(titles, ["Americanah", "Half of a Yellow Sun", "Zikora"]);
    }

    #[tokio::test]
    async fn test_find_by_key_without_match_is_empty() {
        let store = InMemoryBookStore::provisioned("Books");
        store.insert(&Book::new(1001, "Americanah")).await.unwrap();

        assert!(store.find_by_key(4242).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_returns_replaced_item() {
        let store = InMemoryBookStore::provisioned("Books");
        let first = Book::new(1001, "Americanah").with_isbn("0000000000");

        let ack = store.insert(&first).await.unwrap();
        assert_eq!(ack.attributes, None);

        let ack = store
            .insert(&Book::new(1001, "Americanah").with_isbn("9780307455925"))
            .await
            .unwrap();
        assert_eq!(ack.attributes, Some(first.to_item().unwrap()));
    }

    #[tokio::test]
    async fn test_unconditional_update_of_missing_record_creates_it() {
        let store = InMemoryBookStore::provisioned("Books");
        let key = BookKey::new(1001, "Americanah");

        let ack = store.update_isbn(&key, "9780307455925", None).await.unwrap();
        assert_eq!(
            ack.attributes.and_then(|a| a.get_string(ISBN).cloned()),
            Some("9780307455925".to_string())
        );

        let book = store.get(&key).await.unwrap().unwrap();
        assert_eq!(book, Book::new(1001, "Americanah").with_isbn("9780307455925"));
    }

    #[tokio::test]
    async fn test_conditional_update_of_missing_record_fails() {
        let store = InMemoryBookStore::provisioned("Books");
        let key = BookKey::new(1001, "Americanah");

        let err = store
            .update_isbn(&key, "9780307455925", Some("0000000000"))
            .await
            .unwrap_err();
        assert!(matches!(err, FacadeError::ConditionalCheckFailed(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_missing_record_is_noop() {
        let store = InMemoryBookStore::provisioned("Books");

        let ack = store
            .delete(&BookKey::new(1001, "Americanah"), None)
            .await
            .unwrap();
        assert_eq!(ack, WriteAck::default());
    }

    #[tokio::test]
    async fn test_empty_title_is_rejected() {
        let store = InMemoryBookStore::provisioned("Books");

        let err = store.insert(&Book::new(1001, "")).await.unwrap_err();
        assert!(matches!(err, FacadeError::Validation(_)));
        assert!(store.is_empty().await);
    }
}
