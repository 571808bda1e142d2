#![cfg(any(test, feature = "test-support"))]

use std::collections::HashMap;
use std::env;
use std::sync::{Mutex, PoisonError};

use super::ReadEnv;

/// Environment map that never touches the process environment.
///
/// All methods take `&self`, so a shared reference is enough to set up a
/// test.
#[derive(Default)]
pub struct InMemoryEnv {
    vars: Mutex<HashMap<String, String>>,
}

impl InMemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.vars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl ReadEnv for InMemoryEnv {
    fn var(&self, key: &str) -> Result<String, env::VarError> {
        self.vars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or(env::VarError::NotPresent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_read() {
        let env = InMemoryEnv::new();
        env.set("NATS_URL", "nats://example:4222");

        assert_eq!(env.var("NATS_URL").unwrap(), "nats://example:4222");
    }

    #[test]
    fn unset_key_is_not_present() {
        let env = InMemoryEnv::new();

        assert!(matches!(env.var("MISSING"), Err(std::env::VarError::NotPresent)));
    }

    #[test]
    fn remove_unsets_key() {
        let env = InMemoryEnv::new();
        env.set("KEY", "value");
        env.remove("KEY");

        assert!(env.var("KEY").is_err());
    }

    #[test]
    fn later_set_overwrites() {
        let env = InMemoryEnv::new();
        env.set("KEY", "v1");
        env.set("KEY", "v2");

        assert_eq!(env.var("KEY").unwrap(), "v2");
    }

    #[test]
    fn non_blank_skips_whitespace_values() {
        let env = InMemoryEnv::new();
        env.set("BLANK", "   ");
        env.set("SET", "x");

        assert!(env.non_blank("BLANK").is_none());
        assert_eq!(env.non_blank("SET").as_deref(), Some("x"));
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InMemoryEnv>();
    }
}
