//! Request network metadata

use std::collections::HashMap;

/// Where the current request came from
pub trait RequestMetadata {
    /// `REMOTE_ADDR`
    fn remote_addr(&self) -> Option<String>;

    /// `HTTP_X_FORWARDED_FOR`
    fn forwarded_for(&self) -> Option<String>;
}

/// Server variables, CGI style
#[derive(Debug, Clone, Default)]
pub struct ServerVars {
    vars: HashMap<String, String>,
}

impl ServerVars {
    pub const REMOTE_ADDR: &'static str = "REMOTE_ADDR";
    pub const FORWARDED_FOR: &'static str = "HTTP_X_FORWARDED_FOR";

    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    /// Read both variables from the process environment
    pub fn from_env() -> Self {
        let vars = [Self::REMOTE_ADDR, Self::FORWARDED_FOR]
            .into_iter()
            .filter_map(|name| std::env::var(name).ok().map(|v| (name.to_string(), v)))
            .collect();
        Self { vars }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl RequestMetadata for ServerVars {
    fn remote_addr(&self) -> Option<String> {
        self.var(Self::REMOTE_ADDR)
    }

    fn forwarded_for(&self) -> Option<String> {
        self.var(Self::FORWARDED_FOR)
    }
}

/// No request context (console, queue workers)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRequest;

impl RequestMetadata for NoRequest {
    fn remote_addr(&self) -> Option<String> {
        None
    }

    fn forwarded_for(&self) -> Option<String> {
        None
    }
}
