//! Create/read/update/delete access to the `Books` DynamoDB table.
//!
//! Records are [`Book`]s keyed by `book_id` (partition key) and `title`
//! (sort key). All access goes through the [`BookStore`] trait, implemented
//! over DynamoDB by [`DynamoBookStore`] and in process by
//! [`InMemoryBookStore`].

pub mod book;
pub mod config;
pub mod dynamodb;
pub mod error;
pub mod logging;
pub mod memory;
pub mod store;


pub use book::{Book, BookKey};
pub use config::Config;
pub use error::{BulkLoadError, FacadeError, Result};
pub use memory::InMemoryBookStore;
pub use store::{bulk_load, bulk_load_json, BookStore, DynamoBookStore, WriteAck};
