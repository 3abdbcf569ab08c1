use log::info;
use mongodb::{Client, Database};

pub async fn connect_to_database(mongo_uri: &str, db_name: &str) -> mongodb::error::Result<Database> {
    let client = Client::with_uri_str(mongo_uri).await?;
    info!("Connected to MongoDB, using database {}", db_name);
    Ok(client.database(db_name))
}
