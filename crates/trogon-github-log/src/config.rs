use trogon_std::env::ReadEnv;

use crate::store::DEFAULT_BUCKET;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_NATS_URL: &str = "localhost:4222";

const ENV_NATS_URL: &str = "NATS_URL";
const ENV_PORT: &str = "GITHUB_LOG_PORT";
const ENV_BUCKET: &str = "GITHUB_LOG_BUCKET";

/// Where entries are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub servers: Vec<String>,
    pub bucket: String,
}

/// Configuration for the GitHub activity log server.
///
/// Resolved from environment variables:
/// - `NATS_URL`: store connection string, comma-separated server list (default: `localhost:4222`)
/// - `GITHUB_LOG_PORT`: HTTP listening port (default: 8080)
/// - `GITHUB_LOG_BUCKET`: JetStream KV bucket holding the entries (default: `webhook`)
#[derive(Debug, Clone)]
pub struct GithubLogConfig {
    pub port: u16,
    pub store: StoreConfig,
}

impl GithubLogConfig {
    pub fn from_env<E: ReadEnv>(env: &E) -> Self {
        Self {
            port: env
                .var(ENV_PORT)
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            store: StoreConfig {
                servers: servers_from_env(env),
                bucket: env
                    .non_blank(ENV_BUCKET)
                    .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            },
        }
    }
}

fn servers_from_env<E: ReadEnv>(env: &E) -> Vec<String> {
    let raw = env
        .var(ENV_NATS_URL)
        .unwrap_or_else(|_| DEFAULT_NATS_URL.to_string());
    let servers: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if servers.is_empty() {
        vec![DEFAULT_NATS_URL.to_string()]
    } else {
        servers
    }
}
