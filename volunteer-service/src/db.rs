use log::{error, info};
use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client,
};
use volunteer_network_shared::store::mongo::MongoStore;

use crate::config::Config;

async fn build_client(config: &Config) -> mongodb::error::Result<Client> {
    let mut client_options = ClientOptions::parse(config.mongodb_uri()).await?;
    client_options.app_name = Some("volunteer-network-service".to_string());
    client_options.server_api = Some(
        ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build(),
    );
    client_options.server_selection_timeout = Some(config.db_timeout);
    client_options.connect_timeout = Some(config.db_timeout);

    Client::with_options(client_options)
}

/// Connects once at startup. Failures are logged and produce an unavailable
/// store; there is no retry and the caller keeps going.
pub async fn init_store(config: &Config) -> MongoStore {
    let store = match build_client(config).await {
        Ok(client) => MongoStore::new(client, &config.db_name),
        Err(e) => {
            error!("Failed to set up MongoDB client: {}", e);
            return MongoStore::unavailable(e.to_string());
        }
    };

    match store.ping().await {
        Ok(()) => info!("Pinged your deployment. You successfully connected to MongoDB!"),
        Err(e) => error!("MongoDB ping failed: {}", e),
    }

    store
}
