//! History CLI commands
//!
//! Read-only views over the revisions table.

use clap::Subcommand;

use super::Workspace;
use crate::display::{format_revision_details, format_revision_diff, format_revision_list};
use crate::error::{RevisionError, RevisionResult};
use crate::models::{parse_timestamp, Record, RowId};
use crate::presenter::{Presenter, PresenterConfig};
use crate::revisionable::{actions_by, History};

/// History subcommands
#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List revisions of a row, newest first
    List {
        /// Table of the row
        table: String,
        /// Primary key of the row
        row_id: RowId,
        /// Number of revisions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show one revision
    Show {
        /// Revision ID
        id: u64,
    },
    /// Show what a revision changed
    Diff {
        /// Revision ID
        id: u64,
        /// Render through the HTML diff templates
        #[arg(long)]
        html: bool,
    },
    /// Show the revision in effect at a point in time
    Snapshot {
        table: String,
        row_id: RowId,
        /// Timestamp (RFC 3339, "YYYY-MM-DD HH:MM:SS" or "YYYY-MM-DD")
        at: String,
    },
    /// Show the revision N steps back from the latest (0 = latest)
    Step {
        table: String,
        row_id: RowId,
        n: usize,
    },
    /// List everything a user did
    Actions {
        /// User identifier as stored in revisions
        user: String,
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Handle a history command
pub fn handle_history_command(
    workspace: &Workspace,
    connection: Option<&str>,
    cmd: HistoryCommands,
) -> RevisionResult<()> {
    let store = workspace.connections.resolve(connection)?;
    let table = workspace.settings.table.as_str();

    match cmd {
        HistoryCommands::List {
            table: table_name,
            row_id,
            limit,
        } => {
            let entity = Record::new(table_name, row_id);
            let mut revisions = History::new(store, table, &entity).raw()?;
            revisions.truncate(limit);
            print!("{}", format_revision_list(&revisions));
        }

        HistoryCommands::Show { id } => {
            let revision = store
                .find(table, id)?
                .ok_or_else(|| RevisionError::revision_not_found(id.to_string()))?;
            print!("{}", format_revision_details(&revision));
        }

        HistoryCommands::Diff { id, html } => {
            let revision = store
                .find(table, id)?
                .ok_or_else(|| RevisionError::revision_not_found(id.to_string()))?;

            if html {
                let entity = Record::new(revision.table_name(), revision.row_id());
                let config =
                    PresenterConfig::new().with_templates(workspace.settings.templates.diff.clone());
                let presenter = Presenter::new(revision, entity, config);
                println!("{}", presenter);
            } else {
                print!("{}", format_revision_diff(&revision));
            }
        }

        HistoryCommands::Snapshot {
            table: table_name,
            row_id,
            at,
        } => {
            let at = parse_timestamp(&at)?;
            let entity = Record::new(table_name, row_id);
            match History::new(store, table, &entity).snapshot(at)? {
                Some(entry) => print!("{}", format_revision_details(entry.revision())),
                None => println!("No revision at or before {}.", at.format("%Y-%m-%d %H:%M:%S")),
            }
        }

        HistoryCommands::Step {
            table: table_name,
            row_id,
            n,
        } => {
            let entity = Record::new(table_name, row_id);
            match History::new(store, table, &entity).step(n)? {
                Some(entry) => print!("{}", format_revision_details(entry.revision())),
                None => println!("No revision {} steps back.", n),
            }
        }

        HistoryCommands::Actions { user, limit } => {
            let mut revisions = actions_by(store.as_ref(), table, &user)?;
            revisions.truncate(limit);
            print!("{}", format_revision_list(&revisions));
        }
    }

    Ok(())
}
