//! Session-backed user resolution

use std::collections::HashMap;

use super::{SessionStore, UserProvider};

/// Prefix of the environment variables read by [`EnvSession`]
pub const SESSION_ENV_PREFIX: &str = "REVISIONABLE_SESSION_";

/// Reads the user from session data: key `id`, or a configured key
pub struct SessionAdapter<S> {
    session: S,
    field: Option<String>,
}

impl<S: SessionStore> SessionAdapter<S> {
    pub fn new(session: S, field: Option<String>) -> Self {
        Self { session, field }
    }
}

impl<S: SessionStore> UserProvider for SessionAdapter<S> {
    fn user(&self) -> Option<String> {
        self.session.get(self.field.as_deref().unwrap_or("id"))
    }
}

impl SessionStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Session data taken from `REVISIONABLE_SESSION_<KEY>` variables
///
/// Keys are upper-cased; empty values count as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSession;

impl SessionStore for EnvSession {
    fn get(&self, key: &str) -> Option<String> {
        let name = format!("{}{}", SESSION_ENV_PREFIX, key.to_ascii_uppercase());
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}
