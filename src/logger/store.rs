//! Logger writing into a revision store

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::RevisionResult;
use crate::models::{Action, NewRevision, RevisionData, RowId};
use crate::storage::RevisionStore;

use super::request::{NoRequest, RequestMetadata};
use super::{truncate, Logger};

/// Writes each revision as one row of the revisions table
pub struct StoreLogger {
    store: Arc<dyn RevisionStore>,
    /// One-shot override set by [`Logger::on`]
    connection: Option<Arc<dyn RevisionStore>>,
    table: String,
    request: Box<dyn RequestMetadata>,
}

impl StoreLogger {
    pub fn new(store: Arc<dyn RevisionStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            connection: None,
            table: table.into(),
            request: Box::new(NoRequest),
        }
    }

    /// Take `ip`/`ip_forwarded` from this request source
    pub fn with_request(mut self, request: impl RequestMetadata + 'static) -> Self {
        self.request = Box::new(request);
        self
    }

    /// Name of the revisions table written to
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Store the next call will write to
    pub fn target(&self) -> &Arc<dyn RevisionStore> {
        self.connection.as_ref().unwrap_or(&self.store)
    }
}

impl Logger for StoreLogger {
    fn revision_log(
        &mut self,
        action: Action,
        table: &str,
        row_id: RowId,
        old: &RevisionData,
        new: &RevisionData,
        user: Option<&str>,
    ) -> RevisionResult<()> {
        // Consumed before the insert so a failure doesn't leak it into the next call
        let store = self
            .connection
            .take()
            .unwrap_or_else(|| Arc::clone(&self.store));
        trace!(connection = store.name(), table = %self.table, "writing revision");

        let mut revision = NewRevision::new(action, truncate(table), row_id, old.clone(), new.clone())
            .by(user.map(truncate));
        revision.ip = non_empty(self.request.remote_addr());
        revision.ip_forwarded = non_empty(self.request.forwarded_for());

        let revision = store.insert(&self.table, revision)?;
        debug!(
            id = revision.id(),
            action = %action,
            table_name = revision.table_name(),
            row_id,
            "logged revision"
        );
        Ok(())
    }

    fn on(&mut self, connection: Arc<dyn RevisionStore>) -> &mut Self {
        self.connection = Some(connection);
        self
    }
}

impl fmt::Debug for StoreLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreLogger")
            .field("store", &self.store.name())
            .field("connection", &self.connection.as_ref().map(|c| c.name().to_string()))
            .field("table", &self.table)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(|v| truncate(&v))
}
