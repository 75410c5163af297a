use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use revisionable::cli::{
    handle_export_command, handle_history_command, handle_log_command, handle_table_command,
    ExportFormat, HistoryCommands, LogArgs, Workspace,
};
use revisionable::config::{RevisionPaths, Settings};
use revisionable::storage::initialize_storage;

#[derive(Parser)]
#[command(
    name = "revisions",
    version,
    about = "Record and inspect entity revisions",
    long_about = "Keeps a revisions table: one row per create, update, delete or \
                  restore of a tracked entity, with before/after values and the \
                  acting user. Use it to record changes and browse their history."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the configuration and store directories
    Init,

    /// Show current configuration and paths
    Config,

    /// Write the SQL migration for the revisions table
    Table {
        /// Write here instead of the migrations directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Record a revision
    Log(LogArgs),

    /// Browse revision history
    History {
        /// Read from this connection instead of the default one
        #[arg(short, long, global = true)]
        connection: Option<String>,

        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Export the revisions table
    Export {
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Read from this connection instead of the default one
        #[arg(short, long)]
        connection: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let paths = RevisionPaths::new()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing revisions at: {}", paths.base_dir().display());
            let settings = initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!("  Revisions table: {}", settings.table);
            println!("  Connection:      {}", settings.connection);
        }
        Some(Commands::Config) => {
            let settings = Settings::load_or_create(&paths)?;
            println!("Revisions Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Table:          {}", settings.table);
            println!("  Connection:     {}", settings.connection);
            println!(
                "  Store:          {}",
                settings
                    .connection_dir(&paths, &settings.connection)
                    .display()
            );
            for name in settings.connections.keys() {
                println!(
                    "  Connection {}: {}",
                    name,
                    settings.connection_dir(&paths, name).display()
                );
            }
            println!("  User provider:  {}", settings.user_provider);
            println!(
                "  User field:     {}",
                settings.user_field.as_deref().unwrap_or("(default)")
            );
            println!("  Date format:    {}", settings.date_format);
        }
        Some(Commands::Table { output }) => {
            let workspace = Workspace::open(paths)?;
            handle_table_command(&workspace, output)?;
        }
        Some(Commands::Log(args)) => {
            let workspace = Workspace::open(paths)?;
            handle_log_command(&workspace, args)?;
        }
        Some(Commands::History {
            connection,
            command,
        }) => {
            let workspace = Workspace::open(paths)?;
            handle_history_command(&workspace, connection.as_deref(), command)?;
        }
        Some(Commands::Export {
            format,
            output,
            connection,
        }) => {
            let workspace = Workspace::open(paths)?;
            handle_export_command(&workspace, connection.as_deref(), format, output)?;
        }
        None => {
            println!("revisions - entity change history");
            println!();
            println!("Run 'revisions --help' for usage information.");
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_env("REVISIONABLE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
