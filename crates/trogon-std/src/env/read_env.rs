use std::env;

pub trait ReadEnv {
    fn var(&self, key: &str) -> Result<String, env::VarError>;

    /// Like [`ReadEnv::var`], but treats a blank value the same as an unset one.
    fn non_blank(&self, key: &str) -> Option<String> {
        self.var(key).ok().filter(|v| !v.trim().is_empty())
    }
}
