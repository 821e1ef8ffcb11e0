use anyhow::{Context, Result};
use books_dynamodb::{bulk_load_json, logging, Config};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;
    let config = Config::from_env()?;

    let data = std::fs::read_to_string(&config.data_file)
        .with_context(|| format!("reading {}", config.data_file.display()))?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&data)
        .with_context(|| format!("parsing {}", config.data_file.display()))?;

    let store = config.connect().await;
    let loaded = bulk_load_json(&store, records, |_, book| {
        println!("Displaying book data: {} {}", book.book_id, book.title);
    })
    .await?;
    println!("Loaded {loaded} books into {}", config.table_name);

    Ok(())
}
