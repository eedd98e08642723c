use std::net::TcpListener;
use std::sync::Arc;

use authflow::configuration::{get_configuration, StoreBackend};
use authflow::startup::run;
use authflow::store::{InMemoryUserStore, PostgresUserStore, UserStore};
use authflow::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry("info");

    let configuration = get_configuration().map_err(|e| {
        tracing::error!("Failed to read configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Configuration error")
    })?;
    tracing::info!("Configuration loaded successfully");

    let store: Arc<dyn UserStore> = match configuration.database.backend {
        StoreBackend::Postgres => {
            tracing::info!("Connecting to Postgres");
            let store = PostgresUserStore::connect(&configuration.database)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to set up database: {}", e);
                    std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        "Database connection error",
                    )
                })?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory user store; users are lost on restart");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    run(listener, store, configuration.jwt, configuration.password)?.await
}
