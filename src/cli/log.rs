//! Recording a revision from the command line
//!
//! The change goes through the same listener an embedding host uses, so
//! field selection, no-op updates and connection overrides all apply.

use clap::Args;

use super::Workspace;
use crate::error::{RevisionError, RevisionResult};
use crate::listener::Listener;
use crate::logger::{ServerVars, StoreLogger};
use crate::models::{Action, AttributeValue, Attributes, Record, RowId};
use crate::revisionable::RevisionState;
use crate::user::{EnvSession, FixedUser, SessionAdapter, UserProvider};

/// Arguments of `log`
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Action (created, updated, deleted, restored)
    pub action: Action,
    /// Table of the changed row
    pub table: String,
    /// Primary key of the changed row
    pub row_id: RowId,
    /// Value before the change (key=value, repeatable)
    #[arg(long = "old", value_name = "KEY=VALUE")]
    pub old: Vec<String>,
    /// Value after the change (key=value, repeatable)
    #[arg(long = "new", value_name = "KEY=VALUE")]
    pub new: Vec<String>,
    /// Acting user; defaults to the session user from the environment
    #[arg(short, long, env = "REVISIONABLE_USER")]
    pub user: Option<String>,
    /// Write to this connection instead of the default one
    #[arg(short, long)]
    pub connection: Option<String>,
}

/// Handle the `log` command
pub fn handle_log_command(workspace: &Workspace, args: LogArgs) -> RevisionResult<()> {
    let old = parse_pairs(&args.old)?;
    let new = parse_pairs(&args.new)?;

    let mut state = RevisionState::new().with_date_format(workspace.settings.date_format.clone());
    if let Some(connection) = &args.connection {
        state = state.on_connection(connection.clone());
    }
    let record = Record::from_parts(args.table.clone(), args.row_id, old, new, state);

    let users: Box<dyn UserProvider> = match args.user {
        Some(user) => Box::new(FixedUser::new(user)),
        None => Box::new(SessionAdapter::new(
            EnvSession,
            workspace.settings.user_field.clone(),
        )),
    };

    let logger = StoreLogger::new(
        workspace.connections.default_store(),
        workspace.settings.table.clone(),
    )
    .with_request(ServerVars::from_env());
    let mut listener = Listener::new(users, logger).with_connections(workspace.connections.clone());

    if listener.handle(args.action, &record)? {
        println!(
            "Recorded {} revision for {}#{}",
            args.action, args.table, args.row_id
        );
    } else {
        println!("Nothing to record.");
    }

    Ok(())
}

/// Parse `key=value` pairs into attributes
pub fn parse_pairs(pairs: &[String]) -> RevisionResult<Attributes> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Ok((
                key.trim().to_string(),
                AttributeValue::Text(value.to_string()),
            )),
            _ => Err(RevisionError::invalid_argument(format!(
                "Expected KEY=VALUE, got '{}'",
                pair
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let pairs = vec!["title=Hello".to_string(), "body=a=b".to_string(), "empty=".to_string()];
        let attributes = parse_pairs(&pairs).unwrap();

        assert_eq!(attributes["title"], AttributeValue::Text("Hello".into()));
        assert_eq!(attributes["body"], AttributeValue::Text("a=b".into()));
        assert_eq!(attributes["empty"], AttributeValue::Text(String::new()));
    }

    #[test]
    fn test_parse_pairs_rejects_malformed() {
        for bad in ["novalue", "=x"] {
            let err = parse_pairs(&[bad.to_string()]).unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }
}
