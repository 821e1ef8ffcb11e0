use anyhow::Result;
use books_dynamodb::{logging, Book, BookStore, Config};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;
    let config = Config::from_env()?;
    let store = config.connect().await;

    let book = Book::new(1005, "There Was a Country")
        .with_author("Chinua Achebe")
        .with_isbn("0143124030")
        .with_year_of_publication("2012");

    let ack = store.insert(&book).await?;
    println!("{ack:?}");

    Ok(())
}
