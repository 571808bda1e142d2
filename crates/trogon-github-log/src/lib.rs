//! # trogon-github-log
//!
//! Records GitHub repository activity (pushes, opened pull requests, merges)
//! as uniform log entries in a NATS JetStream key-value bucket and serves
//! them back over HTTP.
//!
//! ## How it works
//!
//! 1. GitHub sends `POST /webhook/receiver` with an `X_GITHUB_EVENT`
//!    (or `X-GitHub-Event`) header and a JSON payload.
//! 2. The event type and the payload's `action` pick a mapping:
//!    `push`, `pull_request` + `opened`, or `pull_request` + `closed` with
//!    `merged: true`. Anything else is acknowledged and dropped.
//! 3. The mapping produces a validated [`Entry`], which is stored under
//!    `entries.<uuid>` in the bucket.
//! 4. `GET /api/logs` returns every stored entry; `GET /` serves a small
//!    activity feed page that polls it.
//!
//! Payloads that cannot be mapped and store write failures are logged, and
//! GitHub still gets `200 {}` so it does not redeliver.
//!
//! ## Configuration (env vars)
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `NATS_URL` | `localhost:4222` | Store connection string (comma-separated servers) |
//! | `GITHUB_LOG_PORT` | `8080` | HTTP listening port |
//! | `GITHUB_LOG_BUCKET` | `webhook` | JetStream KV bucket holding entries |
//! | `RUST_LOG` | `info` | Log filter |

pub mod config;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod normalize;
pub mod payload;
pub mod server;
pub mod signal;
pub mod store;

pub use config::{GithubLogConfig, StoreConfig};
pub use entry::{Action, Entry, EntryCandidate, ValidationError};
pub use server::{router, serve};
pub use store::{EntryId, EntryStore, MemoryStore, NatsEntryStore, StoredEntry};
