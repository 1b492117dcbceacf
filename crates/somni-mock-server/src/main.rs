//! Standalone mock record store for manual CLI testing.

use somni_mock_server::{serve, Behavior, SharedStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("somni_mock_server=info".parse().expect("valid directive")),
        )
        .init();

    let bind_addr =
        std::env::var("SOMNI_MOCK_ADDR").unwrap_or_else(|_| "127.0.0.1:8787".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("somni-mock-server listening on {}", bind_addr);
    serve(listener, SharedStore::default(), Behavior::default()).await?;
    Ok(())
}
