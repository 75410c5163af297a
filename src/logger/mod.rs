//! Revision logging
//!
//! A [`Logger`] persists one revision per call. The [`StoreLogger`] writes to
//! a [`RevisionStore`](crate::storage::RevisionStore); callers may redirect a
//! single call to another connection with [`Logger::on`].

mod request;
mod store;

pub use request::{NoRequest, RequestMetadata, ServerVars};
pub use store::StoreLogger;

use std::sync::Arc;

use crate::error::RevisionResult;
use crate::models::{Action, RevisionData, RowId};
use crate::storage::RevisionStore;

/// Longest value stored in the short text columns
pub const MAX_FIELD_LENGTH: usize = 255;

/// Persists revisions
pub trait Logger {
    /// Record one change of `table` row `row_id`
    ///
    /// `table` and `user` are cut to [`MAX_FIELD_LENGTH`] characters.
    fn revision_log(
        &mut self,
        action: Action,
        table: &str,
        row_id: RowId,
        old: &RevisionData,
        new: &RevisionData,
        user: Option<&str>,
    ) -> RevisionResult<()>;

    /// Send only the next revision to `connection`
    fn on(&mut self, connection: Arc<dyn RevisionStore>) -> &mut Self
    where
        Self: Sized;
}

/// Cut to [`MAX_FIELD_LENGTH`] characters
pub(crate) fn truncate(value: &str) -> String {
    value.chars().take(MAX_FIELD_LENGTH).collect()
}
