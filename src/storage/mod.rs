//! Storage layer for revisions
//!
//! Stores are the "connections" revisions are written to. The JSON-lines
//! store appends one line per revision with an immediate flush; the memory
//! store serves tests and embedding hosts.

pub mod connections;
pub mod file_io;
pub mod init;
pub mod jsonl;
pub mod memory;
pub mod schema;
pub mod store;

pub use connections::Connections;
pub use file_io::write_json_atomic;
pub use init::initialize_storage;
pub use jsonl::JsonlStore;
pub use memory::MemoryStore;
pub use schema::migration_sql;
pub use store::{ordered, validate_table_name, RevisionStore};
