//! Environment variable lookup.
//!
//! ```
//! use trogon_std::env::{ReadEnv, SystemEnv};
//!
//! fn listen_port<E: ReadEnv>(env: &E) -> u16 {
//!     env.var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8080)
//! }
//!
//! let port = listen_port(&SystemEnv);
//! # let _ = port;
//! ```

mod in_memory;
mod read_env;
mod system;

#[cfg(any(test, feature = "test-support"))]
pub use in_memory::InMemoryEnv;
pub use read_env::ReadEnv;
pub use system::SystemEnv;
