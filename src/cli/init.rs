use anyhow::Result;

use crate::core::db::{async_db, database_path, initialize_db};

pub async fn run(database_url: &str) -> Result<()> {
    if database_path(database_url).is_none() {
        println!("Database is in-memory, nothing to initialize");
        return Ok(());
    }

    println!("Initializing db...");
    let db = async_db(database_url).await?;
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await?;
    println!("Finished initializing db");

    Ok(())
}
