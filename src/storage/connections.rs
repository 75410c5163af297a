//! Named revision stores

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::config::{RevisionPaths, Settings};
use crate::error::{RevisionError, RevisionResult};

use super::jsonl::JsonlStore;
use super::store::RevisionStore;

/// Registry of stores by connection name, with one default
#[derive(Clone)]
pub struct Connections {
    default: String,
    stores: HashMap<String, Arc<dyn RevisionStore>>,
}

impl Connections {
    /// Start a registry whose default connection is `store`
    pub fn new(default: impl Into<String>, store: Arc<dyn RevisionStore>) -> Self {
        let default = default.into();
        let mut stores = HashMap::new();
        stores.insert(default.clone(), store);
        Self { default, stores }
    }

    /// Register (or replace) a named connection
    pub fn add(&mut self, name: impl Into<String>, store: Arc<dyn RevisionStore>) -> &mut Self {
        self.stores.insert(name.into(), store);
        self
    }

    pub fn default_name(&self) -> &str {
        &self.default
    }

    pub fn default_store(&self) -> Arc<dyn RevisionStore> {
        // `new` always registers the default
        Arc::clone(&self.stores[&self.default])
    }

    /// Look up a connection by name
    pub fn get(&self, name: &str) -> RevisionResult<Arc<dyn RevisionStore>> {
        let store = self
            .stores
            .get(name)
            .map(Arc::clone)
            .ok_or_else(|| RevisionError::UnknownConnection(name.to_string()))?;
        trace!(connection = name, "resolved revision connection");
        Ok(store)
    }

    /// The named connection, or the default one
    pub fn resolve(&self, name: Option<&str>) -> RevisionResult<Arc<dyn RevisionStore>> {
        match name {
            Some(name) => self.get(name),
            None => Ok(self.default_store()),
        }
    }

    /// Sorted connection names
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stores.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Open a `JsonlStore` for the default connection and each configured one
    pub fn from_settings(paths: &RevisionPaths, settings: &Settings) -> RevisionResult<Self> {
        let default_dir = settings.connection_dir(paths, &settings.connection);
        let default = JsonlStore::open(settings.connection.clone(), default_dir)?;
        let mut connections = Self::new(settings.connection.clone(), Arc::new(default));

        for name in settings.connections.keys() {
            if name == &settings.connection {
                continue;
            }
            let store = JsonlStore::open(name.clone(), settings.connection_dir(paths, name))?;
            connections.add(name.clone(), Arc::new(store));
        }

        Ok(connections)
    }
}

impl fmt::Debug for Connections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connections")
            .field("default", &self.default)
            .field("names", &self.names())
            .finish()
    }
}
