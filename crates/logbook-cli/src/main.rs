mod cmd_config;
mod cmd_entry;
mod cmd_init;
mod cmd_nag;
mod cmd_tags;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "logbook", version, about = "Log tasks, notes and payments by client")]
struct Cli {
    /// Store root (defaults to $LOGBOOK_ROOT or the per-user data dir)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the .logbook/ store with default settings
    Init,
    /// Log and browse entries
    Entry {
        #[command(subcommand)]
        cmd: cmd_entry::EntryCmd,
    },
    /// Work with #hashtags
    Tags {
        #[command(subcommand)]
        cmd: cmd_tags::TagsCmd,
    },
    /// Manage settings
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
    /// Daily logging reminders
    Nag {
        #[command(subcommand)]
        cmd: cmd_nag::NagCmd,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("LOGBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = cli.root.unwrap_or_else(logbook_store::store_root);
    tracing::debug!(root = %root.display(), "logbook starting");

    match cli.cmd {
        Command::Init => cmd_init::execute(&root),
        Command::Entry { cmd } => cmd_entry::run(cmd, &root),
        Command::Tags { cmd } => cmd_tags::run(cmd, &root),
        Command::Config { cmd } => cmd_config::run(cmd, &root),
        Command::Nag { cmd } => cmd_nag::run(cmd, &root),
    }
}
