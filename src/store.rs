//! The data-access contract for the Books table.
//!
//! [`BookStore`] is the facade every program goes through. [`DynamoBookStore`]
//! forwards each call to DynamoDB; [`InMemoryBookStore`](crate::InMemoryBookStore)
//! mirrors the service's semantics in process.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, TableStatus};
use tracing::info;

use crate::book::{Book, BookKey, BOOK_ID, ISBN};
use crate::dynamodb::{DynamoDb, Item, Table};
use crate::error::{BulkLoadError, FacadeError, Result};

/// What the service returned for a write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteAck {
    /// Replaced item for puts, updated attributes for updates, removed item for deletes.
    pub attributes: Option<Item>,
    /// Capacity units consumed, when the backend reports them.
    pub consumed_capacity: Option<f64>,
}

/// Operations against the Books table.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Creates the table and returns its provisioning status.
    async fn provision_table(&self) -> Result<TableStatus>;

    /// Writes a record, replacing any record with the same key.
    async fn insert(&self, book: &Book) -> Result<WriteAck>;

    /// Fetches the record at an exact key.
    async fn get(&self, key: &BookKey) -> Result<Option<Book>>;

    /// Returns every record with the given `book_id`, ordered by title.
    async fn find_by_key(&self, book_id: u64) -> Result<Vec<Book>>;

    /// Sets the `isbn` of the record at `key`.
    ///
    /// With `expected_isbn`, the write only happens if the stored ISBN matches.
    async fn update_isbn(
        &self,
        key: &BookKey,
        new_isbn: &str,
        expected_isbn: Option<&str>,
    ) -> Result<WriteAck>;

    /// Removes the record at `key`.
    ///
    /// With `expected_isbn`, the delete only happens if the stored ISBN matches.
    async fn delete(&self, key: &BookKey, expected_isbn: Option<&str>) -> Result<WriteAck>;
}

/// Inserts `books` one after another.
///
/// `on_record` is called with each record's position before it is written.
/// The load is not transactional: the first failure stops it, records before
/// it stay written and the rest are never attempted.
pub async fn bulk_load<S, I, F>(
    store: &S,
    books: I,
    on_record: F,
) -> std::result::Result<usize, BulkLoadError>
where
    S: BookStore + ?Sized,
    I: IntoIterator<Item = Book>,
    F: FnMut(usize, &Book),
{
    load_records(store, books.into_iter().map(Ok), on_record).await
}

/// Inserts raw JSON records one after another, reading each as a [`Book`]
/// only when its turn comes.
///
/// A record that is not a valid book (for example one missing `title`)
/// stops the load at its position with [`FacadeError::Validation`]; the
/// records before it stay written.
pub async fn bulk_load_json<S, I, F>(
    store: &S,
    records: I,
    on_record: F,
) -> std::result::Result<usize, BulkLoadError>
where
    S: BookStore + ?Sized,
    I: IntoIterator<Item = serde_json::Value>,
    F: FnMut(usize, &Book),
{
    let books = records.into_iter().map(|record| {
        serde_json::from_value::<Book>(record)
            .map_err(|e| FacadeError::Validation(format!("not a valid book record: {e}")))
    });
    load_records(store, books, on_record).await
}

async fn load_records<S, I, F>(
    store: &S,
    books: I,
    mut on_record: F,
) -> std::result::Result<usize, BulkLoadError>
where
    S: BookStore + ?Sized,
    I: Iterator<Item = Result<Book>>,
    F: FnMut(usize, &Book),
{
    let mut loaded = 0;
    for (position, book) in books.enumerate() {
        let book = book.map_err(|source| BulkLoadError {
            position,
            key: None,
            source,
        })?;
        on_record(position, &book);
        info!("Loading book {} ({})", position, book.key());
        store
            .insert(&book)
            .await
            .map_err(|source| BulkLoadError {
                position,
                key: Some(book.key()),
                source,
            })?;
        loaded += 1;
    }
    info!("Loaded {loaded} books");
    Ok(loaded)
}

/// [`BookStore`] backed by a DynamoDB table.
#[derive(Debug, Clone)]
pub struct DynamoBookStore {
    ddb: DynamoDb,
    table: Table,
}

impl DynamoBookStore {
    pub fn new(ddb: DynamoDb, table: Table) -> Self {
        Self { ddb, table }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The underlying client, for table-level calls outside the facade.
    pub fn client(&self) -> &DynamoDb {
        &self.ddb
    }
}

#[async_trait]
impl BookStore for DynamoBookStore {
    async fn provision_table(&self) -> Result<TableStatus> {
        self.ddb.create_table(&self.table).await
    }

    async fn insert(&self, book: &Book) -> Result<WriteAck> {
        self.ddb.put_item(self.table.name(), book.to_item()?).await
    }

    async fn get(&self, key: &BookKey) -> Result<Option<Book>> {
        self.ddb
            .get_item(self.table.name(), key.to_item())
            .await?
            .map(Book::from_item)
            .transpose()
    }

    async fn find_by_key(&self, book_id: u64) -> Result<Vec<Book>> {
        self.ddb
            .query_partition(
                self.table.name(),
                (BOOK_ID, AttributeValue::N(book_id.to_string())),
            )
            .await?
            .into_iter()
            .map(Book::from_item)
            .collect()
    }

    async fn update_isbn(
        &self,
        key: &BookKey,
        new_isbn: &str,
        expected_isbn: Option<&str>,
    ) -> Result<WriteAck> {
        let updates = Item::new().set_string(ISBN, new_isbn);
        let expected = expected_isbn.map(|isbn| Item::new().set_string(ISBN, isbn));
        self.ddb
            .update_item(self.table.name(), key.to_item(), updates, expected)
            .await
    }

    async fn delete(&self, key: &BookKey, expected_isbn: Option<&str>) -> Result<WriteAck> {
        let expected = expected_isbn.map(|isbn| Item::new().set_string(ISBN, isbn));
        self.ddb
            .delete_item(self.table.name(), key.to_item(), expected)
            .await
    }
}
