//! # DynamoDB Module
//!
//! Thin, typed layer over the AWS SDK for DynamoDB.
//!
//! ## Components
//!
//! - `DynamoDb`: A client wrapper for table and item requests.
//! - `Item`: A raw attribute map, used for keys, records and returned attributes.
//! - `KeyAttribute` / `FieldType`: Key attribute names and their scalar types.
//! - `Table`: A provisioned table definition (name, key schema, throughput).
//!
//! ## Usage
//!
//! The client is built from an `aws_config::SdkConfig`, so credentials and
//! region follow the SDK's default provider chain:
//!
//! - `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` (and optionally `AWS_SESSION_TOKEN`)
//! - `AWS_REGION`
//! - `AWS_ENDPOINT_URL`: For using a custom endpoint (e.g., DynamoDB Local).

mod client;
mod item;
mod schema;
mod table;

pub use client::DynamoDb;
pub use item::Item;
pub use schema::{FieldType, KeyAttribute};
pub use table::{Table, Throughput, BOOKS_TABLE_NAME};
