use anyhow::Result;
use books_dynamodb::{logging, BookStore, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;
    let config = Config::from_env()?;

    let store = config.connect().await;

    let status = store.provision_table().await?;
    info!("Table name: {}", store.table().name());
    println!("Status: {}", status.as_str());

    Ok(())
}
