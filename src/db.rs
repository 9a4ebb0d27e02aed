use mongodb::{
    options::{ClientOptions, ResolverConfig},
    Client,
};
use std::env;

/// Connect using `MONGODB_URI` and hand back the drylog database.
pub async fn get_db() -> mongodb::error::Result<mongodb::Database> {
    let client_uri =
        env::var("MONGODB_URI").expect("You must set the MONGODB_URI environment var!");

    // Explicit resolver to dodge a DNS issue with SRV lookups on Windows.
    let options =
        ClientOptions::parse_with_resolver_config(&client_uri, ResolverConfig::cloudflare())
            .await?;
    let client = Client::with_options(options)?;

    Ok(client.database("drylog"))
}
