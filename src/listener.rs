//! Lifecycle event handling
//!
//! The host calls the [`Listener`] after an entity was created, updated,
//! deleted or restored. Each call turns into at most one revision.

use tracing::debug;

use crate::error::{RevisionError, RevisionResult};
use crate::logger::Logger;
use crate::models::{diff_assoc, Action, RevisionData};
use crate::revisionable::Revisionable;
use crate::storage::Connections;
use crate::user::UserProvider;

/// Turns entity lifecycle events into revisions
pub struct Listener<L> {
    users: Box<dyn UserProvider>,
    logger: L,
    connections: Option<Connections>,
}

impl<L: Logger> Listener<L> {
    pub fn new(users: impl UserProvider + 'static, logger: L) -> Self {
        Self {
            users: Box::new(users),
            logger,
            connections: None,
        }
    }

    /// Resolve per-entity connection names through this registry
    pub fn with_connections(mut self, connections: Connections) -> Self {
        self.connections = Some(connections);
        self
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// Revision with empty `old`, `new` holding every revisionable attribute
    pub fn created<E: Revisionable + ?Sized>(&mut self, entity: &E) -> RevisionResult<bool> {
        self.handle(Action::Created, entity)
    }

    /// Revision with full before/after snapshots, skipped when nothing
    /// revisionable changed
    pub fn updated<E: Revisionable + ?Sized>(&mut self, entity: &E) -> RevisionResult<bool> {
        self.handle(Action::Updated, entity)
    }

    pub fn deleted<E: Revisionable + ?Sized>(&mut self, entity: &E) -> RevisionResult<bool> {
        self.handle(Action::Deleted, entity)
    }

    pub fn restored<E: Revisionable + ?Sized>(&mut self, entity: &E) -> RevisionResult<bool> {
        self.handle(Action::Restored, entity)
    }

    /// Log `action` for `entity`
    ///
    /// Returns whether a revision was written.
    pub fn handle<E: Revisionable + ?Sized>(
        &mut self,
        action: Action,
        entity: &E,
    ) -> RevisionResult<bool> {
        if !entity.is_revisioned() || !entity.tracks(action) {
            debug!(%action, table = entity.table(), row_id = entity.key(), "revisioning skipped");
            return Ok(false);
        }

        let (old, new) = match action {
            Action::Created => (RevisionData::new(), entity.new_attributes()),
            Action::Updated => {
                let old = entity.old_attributes();
                let new = entity.new_attributes();
                if diff_assoc(&new, &old).is_empty() {
                    debug!(table = entity.table(), row_id = entity.key(), "nothing to revision");
                    return Ok(false);
                }
                (old, new)
            }
            Action::Deleted | Action::Restored => (RevisionData::new(), RevisionData::new()),
        };

        if let Some(name) = entity.revisionable_connection() {
            let connection = match &self.connections {
                Some(connections) => connections.get(name)?,
                None => return Err(RevisionError::UnknownConnection(name.to_string())),
            };
            self.logger.on(connection);
        }

        let user = self.users.user();
        self.logger.revision_log(
            action,
            entity.table(),
            entity.key(),
            &old,
            &new,
            user.as_deref(),
        )?;

        Ok(true)
    }
}
