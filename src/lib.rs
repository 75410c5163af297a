//! revisionable - change history for entities
//!
//! Every time a tracked entity is created, updated, deleted or restored a
//! revision is written: the action, the before and after values of its
//! revisionable attributes, who did it and from where.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Revisions, actions, attribute snapshots and a generic record
//! - `revisionable`: The capability trait entities implement, plus history queries
//! - `user`: Adapters resolving the acting user from an auth back end
//! - `logger`: Persisting revisions into a store
//! - `listener`: Turning lifecycle events into revisions
//! - `presenter`: Labels, pass-through values and HTML diffs
//! - `storage`: Revision stores ("connections") and the table schema
//! - `config`: Paths and settings
//! - `display` / `export` / `cli`: The `revisions` command line tool
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use revisionable::{FixedUser, Listener, MemoryStore, Record, StoreLogger};
//!
//! let store = Arc::new(MemoryStore::default());
//! let mut listener = Listener::new(FixedUser::new("admin"), StoreLogger::new(store, "revisions"));
//!
//! let mut post = Record::new("posts", 1).with_attribute("title", "Hello").synced();
//! post.set("title", "Hello, world");
//! listener.updated(&post)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod listener;
pub mod logger;
pub mod models;
pub mod presenter;
pub mod revisionable;
pub mod storage;
pub mod user;

pub use error::{RevisionError, RevisionResult};
pub use listener::Listener;
pub use logger::{Logger, StoreLogger};
pub use models::{Action, AttributeValue, Record, Revision};
pub use presenter::{Presenter, PresenterConfig};
pub use revisionable::{History, HistoryEntry, RevisionState, Revisionable};
pub use storage::{Connections, JsonlStore, MemoryStore, RevisionStore};
pub use user::{FixedUser, UserProvider};
