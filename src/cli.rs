use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Employee task board with role-based login.
/// Storage defaults to ~/.ems/storage.json or a path passed via --store.
#[derive(Parser)]
#[command(name = "ems", version, about = "Employee task board: log in, browse, filter and assign tasks")]
pub struct Cli {
    /// Path to the JSON store file.
    #[arg(long, global = true, env = "EMS_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
