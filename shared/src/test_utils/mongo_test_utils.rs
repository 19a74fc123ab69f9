use log::info;
use mongodb::Client;

use crate::store::mongo::MongoStore;
use crate::store::StoreResult;

/// Set to a MongoDB URI to run store-backed tests against a real database
pub const MONGODB_TEST_URI_VAR: &str = "MONGODB_TEST_URI";

pub fn use_mongodb() -> bool {
    std::env::var(MONGODB_TEST_URI_VAR)
        .map(|uri| !uri.trim().is_empty())
        .unwrap_or(false)
}

/// Connects to the test deployment and returns an emptied store on `db_name`
pub async fn create_mongo_store(db_name: &str) -> StoreResult<MongoStore> {
    let uri = std::env::var(MONGODB_TEST_URI_VAR).unwrap_or_default();
    info!("Connecting to test MongoDB database '{}'", db_name);
    let client = Client::with_uri_str(&uri).await?;
    let store = MongoStore::new(client, db_name);
    store.clear().await?;
    Ok(store)
}
