use anyhow::Result;
use books_dynamodb::{logging, BookKey, BookStore, Config};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;
    let config = Config::from_env()?;
    let store = config.connect().await;

    let key = BookKey::new(1001, "Americanah");
    let ack = store.update_isbn(&key, "9780307455925", None).await?;
    println!("{ack:?}");

    Ok(())
}
