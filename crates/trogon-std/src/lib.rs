//! Environment access behind a trait, so configuration code can be tested
//! without touching the process environment.
//!
//! | Concern | Trait | Production | Test |
//! |---------|-------|------------|------|
//! | Env vars | [`ReadEnv`] | [`SystemEnv`] | [`InMemoryEnv`]* |
//!
//! *Available with `#[cfg(test)]` or the `"test-support"` feature.
//!
//! Both implementations are `Send + Sync`, so they can be shared with
//! `#[tokio::test]` tasks on a multi-threaded runtime.

pub mod env;

pub use env::{ReadEnv, SystemEnv};

#[cfg(any(test, feature = "test-support"))]
pub use env::InMemoryEnv;
