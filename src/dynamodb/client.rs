use aws_sdk_dynamodb::{
    types::{AttributeValue, ReturnConsumedCapacity, ReturnValue, TableStatus},
    Client,
};
use std::collections::HashMap;
use tracing::{error, info};

use crate::dynamodb::{Item, Table};
use crate::error::{map_sdk_error, FacadeError, Result, Target};
use crate::store::WriteAck;

/// DynamoDB client wrapper for high-level operations.
///
/// This struct provides a convenient interface for interacting with Amazon DynamoDB,
/// abstracting away many of the low-level details of the AWS SDK.
///
/// # Features
///
/// - Table management: Create, describe, delete, and check existence of tables
/// - Item operations: Put, get, update, and delete items, optionally conditioned
///   on the current value of attributes
/// - Querying: All items sharing a partition key, following pagination
/// - Authentication: Verify AWS credentials
///
/// Every call is a single request (queries may page) and nothing is retried;
/// failures are mapped onto [`FacadeError`] and returned as is.
///
/// # Example
///
/// ```no_run
/// use books_dynamodb::dynamodb::{DynamoDb, Item, Table, Throughput};
///
/// # async fn example() -> books_dynamodb::Result<()> {
/// let config = aws_config::load_from_env().await;
/// let client = DynamoDb::new(&config);
///
/// let table = Table::books("Books", Throughput::default());
/// client.create_table(&table).await?;
///
/// let item = Item::new()
///     .set_number("book_id", 1001)
///     .set_string("title", "Americanah");
/// client.put_item(table.name(), item).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DynamoDb {
    client: Client,
}

impl DynamoDb {
    /// Creates a new `DynamoDb` instance.
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    /// Verifies authentication by attempting to list tables.
    pub async fn check_auth(&self) -> Result<()> {
        self.client.list_tables().send().await.map_err(|e| {
            error!("Authentication failed: {}", e);
            map_sdk_error(e, Target::Service)
        })?;
        info!("Authentication successful");
        Ok(())
    }

    // --- Table Operations ---

    /// Creates a provisioned table and returns its status.
    ///
    /// Fails with [`FacadeError::AlreadyExists`] if a table with the same name exists.
    pub async fn create_table(&self, table: &Table) -> Result<TableStatus> {
        let output = self
            .client
            .create_table()
            .table_name(table.name())
            .set_attribute_definitions(Some(table.attribute_definitions()?))
            .set_key_schema(Some(table.key_schema()?))
            .provisioned_throughput(table.provisioned_throughput()?)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Target::Table(table.name())))?;

        let status = output
            .table_description()
            .and_then(|description| description.table_status())
            .cloned()
            .ok_or_else(|| missing_status(table.name()))?;
        info!("Table '{}' created with status {:?}", table.name(), status);
        Ok(status)
    }

    /// Deletes a table.
    pub async fn delete_table(&self, table_name: &str) -> Result<()> {
        self.client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Target::Table(table_name)))?;
        info!("Table '{table_name}' deleted");
        Ok(())
    }

    /// Checks if a table exists.
    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let mut start_table_name = None;
        loop {
            let tables = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start_table_name)
                .send()
                .await
                .map_err(|e| map_sdk_error(e, Target::Table(table_name)))?;

            if tables.table_names().iter().any(|name| name == table_name) {
                return Ok(true);
            }

            start_table_name = tables.last_evaluated_table_name;
            if start_table_name.is_none() {
                return Ok(false);
            }
        }
    }

    /// Retrieves the current status of a table.
    pub async fn describe_table(&self, table_name: &str) -> Result<TableStatus> {
        let output = self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Target::Table(table_name)))?;

        output
            .table()
            .and_then(|description| description.table_status())
            .cloned()
            .ok_or_else(|| missing_status(table_name))
    }

    // --- Item Operations ---

    /// Puts an item into a DynamoDB table, replacing any item with the same key.
    ///
    /// The acknowledgment carries the replaced item, if there was one.
    pub async fn put_item(&self, table_name: &str, item: Item) -> Result<WriteAck> {
        let key = item.clone();
        let output = self
            .client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item.attributes))
            .return_values(ReturnValue::AllOld)
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Target::Record(&key)))?;

        info!("Item added to '{table_name}'");
        Ok(WriteAck {
            attributes: output.attributes.map(Item::from),
            consumed_capacity: output
                .consumed_capacity
                .and_then(|capacity| capacity.capacity_units),
        })
    }

    /// Gets an item from a DynamoDB table.
    pub async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Item>> {
        let target = key.clone();
        let response = self
            .client
            .get_item()
            .table_name(table_name)
            .set_key(Some(key.attributes))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Target::Record(&target)))?;

        Ok(response.item.map(Item::from))
    }

    /// Updates an item in a DynamoDB table.
    ///
    /// Every attribute in `updates` is `SET`. When `expected` is given, the
    /// write only happens if each of its attributes currently holds the given
    /// value; otherwise it fails with [`FacadeError::ConditionalCheckFailed`].
    /// The acknowledgment carries the updated attributes as stored.
    pub async fn update_item(
        &self,
        table_name: &str,
        key: Item,
        updates: Item,
        expected: Option<Item>,
    ) -> Result<WriteAck> {
        let mut expressions = Expressions::default();
        let update_expression = expressions.set_clause(updates);
        let condition_expression = expected.map(|expected| expressions.condition(expected));
        let (expression_attribute_names, expression_attribute_values) = expressions.into_maps();

        let target = key.clone();
        let output = self
            .client
            .update_item()
            .table_name(table_name)
            .set_key(Some(key.attributes))
            .update_expression(update_expression)
            .set_condition_expression(condition_expression)
            .set_expression_attribute_names(expression_attribute_names)
            .set_expression_attribute_values(expression_attribute_values)
            .return_values(ReturnValue::UpdatedNew)
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Target::Record(&target)))?;

        info!("Item updated in '{table_name}'");
        Ok(WriteAck {
            attributes: output.attributes.map(Item::from),
            consumed_capacity: output
                .consumed_capacity
                .and_then(|capacity| capacity.capacity_units),
        })
    }

    /// Deletes an item from a DynamoDB table.
    ///
    /// `expected` conditions the delete the same way as in [`DynamoDb::update_item`].
    /// Deleting an item that doesn't exist without a condition succeeds and
    /// returns no attributes.
    pub async fn delete_item(
        &self,
        table_name: &str,
        key: Item,
        expected: Option<Item>,
    ) -> Result<WriteAck> {
        let mut expressions = Expressions::default();
        let condition_expression = expected.map(|expected| expressions.condition(expected));
        let (expression_attribute_names, expression_attribute_values) = expressions.into_maps();

        let target = key.clone();
        let output = self
            .client
            .delete_item()
            .table_name(table_name)
            .set_key(Some(key.attributes))
            .set_condition_expression(condition_expression)
            .set_expression_attribute_names(expression_attribute_names)
            .set_expression_attribute_values(expression_attribute_values)
            .return_values(ReturnValue::AllOld)
            .return_consumed_capacity(ReturnConsumedCapacity::Total)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, Target::Record(&target)))?;

        info!("Item deleted from '{table_name}'");
        Ok(WriteAck {
            attributes: output.attributes.map(Item::from),
            consumed_capacity: output
                .consumed_capacity
                .and_then(|capacity| capacity.capacity_units),
        })
    }

    // --- Query Operations ---

    /// Queries every item sharing a partition key value.
    ///
    /// Pages through the result until the service reports no further key, so
    /// the returned items are ordered by sort key ascending.
    pub async fn query_partition(
        &self,
        table_name: &str,
        partition_key: (&str, AttributeValue),
    ) -> Result<Vec<Item>> {
        let (key_name, key_value) = partition_key;
        let mut items = Vec::new();
        let mut last_evaluated_key = None;

        loop {
            let response = self
                .client
                .query()
                .table_name(table_name)
                .key_condition_expression("#pk = :pkval")
                .expression_attribute_names("#pk", key_name)
                .expression_attribute_values(":pkval", key_value.clone())
                .set_exclusive_start_key(last_evaluated_key)
                .send()
                .await
                .map_err(|e| map_sdk_error(e, Target::Table(table_name)))?;

            if let Some(new_items) = response.items {
                items.extend(new_items.into_iter().map(Item::from));
            }

            last_evaluated_key = response.last_evaluated_key;

            if last_evaluated_key.is_none() {
                break;
            }
        }

        Ok(items)
    }
}

/// Placeholder maps shared by the update and condition expressions of one request.
#[derive(Debug, Default)]
struct Expressions {
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl Expressions {
    /// Builds `SET #attrN = :valN, ...` over the attributes in `updates`.
    fn set_clause(&mut self, updates: Item) -> String {
        let mut assignments = Vec::with_capacity(updates.len());
        for (i, (attr_name, attr_value)) in updates.attributes.into_iter().enumerate() {
            let placeholder = format!("#attr{}", i);
            let value_placeholder = format!(":val{}", i);
            assignments.push(format!("{} = {}", placeholder, value_placeholder));
            self.names.insert(placeholder, attr_name);
            self.values.insert(value_placeholder, attr_value);
        }
        format!("SET {}", assignments.join(", "))
    }

    /// Builds `#condN = :condN AND ...` over the expected attributes.
    fn condition(&mut self, expected: Item) -> String {
        let mut clauses = Vec::with_capacity(expected.len());
        for (i, (attr_name, attr_value)) in expected.attributes.into_iter().enumerate() {
            let placeholder = format!("#cond{}", i);
            let value_placeholder = format!(":cond{}", i);
            clauses.push(format!("{} = {}", placeholder, value_placeholder));
            self.names.insert(placeholder, attr_name);
            self.values.insert(value_placeholder, attr_value);
        }
        clauses.join(" AND ")
    }

    /// The maps to send, `None` when no placeholder was registered.
    #[allow(clippy::type_complexity)]
    fn into_maps(
        self,
    ) -> (
        Option<HashMap<String, String>>,
        Option<HashMap<String, AttributeValue>>,
    ) {
        let names = (!self.names.is_empty()).then_some(self.names);
        let values = (!self.values.is_empty()).then_some(self.values);
        (names, values)
    }
}

fn missing_status(table_name: &str) -> FacadeError {
    FacadeError::Service(format!("no status reported for table '{table_name}'"))
}
