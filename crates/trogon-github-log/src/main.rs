use trogon_github_log::{GithubLogConfig, NatsEntryStore, serve, store};
use trogon_std::env::SystemEnv;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = GithubLogConfig::from_env(&SystemEnv);

    let nats = store::connect(&config.store).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to connect to the entry store");
        std::process::exit(1);
    });

    let entries = NatsEntryStore::open(nats, &config.store.bucket)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, bucket = %config.store.bucket, "Failed to open entry bucket");
            std::process::exit(1);
        });

    if let Err(e) = serve(config.port, entries).await {
        tracing::error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }
}
