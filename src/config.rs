use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::dynamodb::{DynamoDb, Table, Throughput, BOOKS_TABLE_NAME};
use crate::store::DynamoBookStore;

/// Settings shared by the programs in this crate.
///
/// Read from the process environment after loading any `.env` file:
///
/// - `BOOKS_TABLE_NAME`: table to operate on (default `Books`)
/// - `BOOKS_READ_CAPACITY` / `BOOKS_WRITE_CAPACITY`: provisioned throughput (default 10)
/// - `BOOKS_DATA_FILE`: JSON array read by `load_data` (default `data.json`)
/// - `AWS_ENDPOINT_URL`: custom endpoint, e.g. DynamoDB Local
///
/// Credentials and region come from the AWS SDK's default provider chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub table_name: String,
    pub throughput: Throughput,
    pub data_file: PathBuf,
    pub endpoint_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name: BOOKS_TABLE_NAME.to_string(),
            throughput: Throughput::default(),
            data_file: PathBuf::from("data.json"),
            endpoint_url: None,
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the settings from the environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the settings through `lookup`, falling back to defaults for unset values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            table_name: lookup("BOOKS_TABLE_NAME").unwrap_or(defaults.table_name),
            throughput: Throughput {
                read_capacity_units: parse(&lookup, "BOOKS_READ_CAPACITY")?
                    .unwrap_or(defaults.throughput.read_capacity_units),
                write_capacity_units: parse(&lookup, "BOOKS_WRITE_CAPACITY")?
                    .unwrap_or(defaults.throughput.write_capacity_units),
            },
            data_file: lookup("BOOKS_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|url| !url.is_empty()),
        })
    }

    /// The Books table definition these settings describe.
    pub fn table(&self) -> Table {
        Table::books(self.table_name.as_str(), self.throughput)
    }

    /// Loads the AWS SDK configuration, pointing it at `endpoint_url` when set.
    pub async fn sdk_config(&self) -> aws_config::SdkConfig {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(endpoint) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        loader.load().await
    }

    /// Builds a DynamoDB-backed store for a single unit of work.
    pub async fn connect(&self) -> DynamoBookStore {
        let sdk_config = self.sdk_config().await;
        DynamoBookStore::new(DynamoDb::new(&sdk_config), self.table())
    }
}

fn parse<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .with_context(|| format!("invalid value for {name}: {value:?}"))
        })
        .transpose()
}
