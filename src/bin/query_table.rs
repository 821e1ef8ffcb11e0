use anyhow::Result;
use books_dynamodb::{logging, BookStore, Config};

const BOOK_ID: u64 = 1001;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;
    let config = Config::from_env()?;
    let store = config.connect().await;

    println!("Book ID: {BOOK_ID}");
    for book in store.find_by_key(BOOK_ID).await? {
        println!("{} : {}", book.book_id, book.title);
    }

    Ok(())
}
