use aws_sdk_dynamodb::types::{
    AttributeDefinition, KeySchemaElement, KeyType, ProvisionedThroughput,
};

use crate::book::{BOOK_ID, TITLE};
use crate::dynamodb::{FieldType, KeyAttribute};
use crate::error::Result;

/// Default table name used by every program in this crate.
pub const BOOKS_TABLE_NAME: &str = "Books";

/// Read and write capacity units reserved for a provisioned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

impl Default for Throughput {
    fn default() -> Self {
        Self {
            read_capacity_units: 10,
            write_capacity_units: 10,
        }
    }
}

/// DynamoDB table configuration.
///
/// A table is identified by its name and keyed by a partition key plus an
/// optional sort key. Tables declared here use provisioned capacity mode, so
/// the definition also carries the reserved throughput.
///
/// # Example
///
/// ```
/// use books_dynamodb::dynamodb::{Table, Throughput};
///
/// let table = Table::books("Books", Throughput::default());
/// assert_eq!(table.partition_key().name(), "book_id");
/// assert_eq!(table.sort_key().map(|k| k.name()), Some("title"));
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    partition_key: KeyAttribute,
    sort_key: Option<KeyAttribute>,
    throughput: Throughput,
}

impl Table {
    /// Creates a new `Table` instance.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the DynamoDB table.
    /// * `partition_key` - The partition key attribute.
    /// * `sort_key` - The sort key attribute, if any.
    pub fn new(
        name: impl Into<String>,
        partition_key: KeyAttribute,
        sort_key: Option<KeyAttribute>,
    ) -> Self {
        Self {
            name: name.into(),
            partition_key,
            sort_key,
            throughput: Throughput::default(),
        }
    }

    /// The Books table: `book_id` (number) partition key, `title` (string) sort key.
    pub fn books(name: impl Into<String>, throughput: Throughput) -> Self {
        Self::new(
            name,
            KeyAttribute::new(BOOK_ID, FieldType::Number),
            Some(KeyAttribute::new(TITLE, FieldType::String)),
        )
        .with_throughput(throughput)
    }

    /// Sets the provisioned throughput and returns the modified `Table`.
    pub fn with_throughput(mut self, throughput: Throughput) -> Self {
        self.throughput = throughput;
        self
    }

    /// Returns the name of the table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the partition key of the table.
    pub fn partition_key(&self) -> &KeyAttribute {
        &self.partition_key
    }

    /// Returns the sort key of the table, if any.
    pub fn sort_key(&self) -> Option<&KeyAttribute> {
        self.sort_key.as_ref()
    }

    pub fn throughput(&self) -> Throughput {
        self.throughput
    }

    pub(crate) fn attribute_definitions(&self) -> Result<Vec<AttributeDefinition>> {
        let mut definitions = vec![self.partition_key.attribute_definition()?];
        if let Some(sort_key) = &self.sort_key {
            definitions.push(sort_key.attribute_definition()?);
        }
        Ok(definitions)
    }

    pub(crate) fn key_schema(&self) -> Result<Vec<KeySchemaElement>> {
        let mut schema = vec![self.partition_key.key_schema_element(KeyType::Hash)?];
        if let Some(sort_key) = &self.sort_key {
            schema.push(sort_key.key_schema_element(KeyType::Range)?);
        }
        Ok(schema)
    }

    pub(crate) fn provisioned_throughput(&self) -> Result<ProvisionedThroughput> {
        Ok(ProvisionedThroughput::builder()
            .read_capacity_units(self.throughput.read_capacity_units)
            .write_capacity_units(self.throughput.write_capacity_units)
            .build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_operations() {
        let table = Table::new(
            "test_table",
            KeyAttribute::new("partition_key", FieldType::String),
            None,
        );

        assert_eq!(table.name(), "test_table");
        assert_eq!(table.partition_key().name(), "partition_key");
        assert!(table.sort_key().is_none());
        assert_eq!(table.throughput(), Throughput::default());
        assert_eq!(table.key_schema().unwrap().len(), 1);
    }

    #[test]
    fn test_books_key_schema() {
        let table = Table::books(BOOKS_TABLE_NAME, Throughput::default());

        let schema = table.key_schema().unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema[0].attribute_name(), BOOK_ID);
        assert_eq!(schema[0].key_type(), &KeyType::Hash);
        assert_eq!(schema[1].attribute_name(), TITLE);
        assert_eq!(schema[1].key_type(), &KeyType::Range);

        let definitions = table.attribute_definitions().unwrap();
        assert_eq!(definitions.len(), 2);
        assert_eq!(table.partition_key().field_type(), FieldType::Number);
    }

    #[test]
    fn test_provisioned_throughput() {
        let table = Table::books(
            BOOKS_TABLE_NAME,
            Throughput {
                read_capacity_units: 5,
                write_capacity_units: 2,
            },
        );

        let throughput = table.provisioned_throughput().unwrap();
        assert_eq!(throughput.read_capacity_units(), 5);
        assert_eq!(throughput.write_capacity_units(), 2);
    }
}
