//! Display formatting for terminal output

pub mod revision;

pub use revision::{format_revision_details, format_revision_diff, format_revision_list};
