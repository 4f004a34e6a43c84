//! # EMS - Employee Task Board
//!
//! A command-line employee task board with role-based login and an optional
//! terminal user interface (TUI).
//!
//! ## Key Features
//!
//! - **Role-based Login**: admins see every employee's tasks, employees see their own
//! - **Filterable Task Views**: filter by status, employee and category, search text,
//!   sort by date, employee, status or priority
//! - **Task Assignment**: admins create dated, categorised tasks for employees
//! - **Live Counters**: new/active/completed/failed counts always match the task list
//! - **Local File Storage**: a single JSON key-value file, seeded with demo data
//!
//! ## Quick Start
//!
//! ```bash
//! # Log in as the demo admin
//! ems login admin@me.com --password 123
//!
//! # Browse all tasks, newest first, only DevOps work
//! ems dashboard --category DevOps
//!
//! # Assign a task to Neha
//! ems create --employee emp002 --title "Client Call" --desc "Weekly sync" \
//!     --date tomorrow --category Meeting
//!
//! # Or do all of it interactively
//! ems ui
//! ```
//!
//! ## Key Commands
//!
//! - `ems login <email>` / `ems logout` / `ems whoami` - session management
//! - `ems dashboard` - role-dependent dashboard
//! - `ems tasks` - your own tasks with a status summary
//! - `ems create` - assign a task (admins)
//! - `ems mark <id> <status>` - change a task's status
//! - `ems ui` - launch the TUI
//!
//! Data is stored locally in `~/.ems/storage.json`. Set `RUST_LOG=ems=debug` to
//! see what the store and session are doing.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod auth;
pub mod cli;
pub mod cmd;
pub mod db;
pub mod employee;
pub mod error;
pub mod fields;
pub mod seed;
pub mod session;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod login_form;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use error::Result;
use session::Session;
use store::Store;
use task::TaskDraft;
use view::TaskQuery;

fn main() {
    // Tracing is opt-in via RUST_LOG and always goes to stderr.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
}

/// Resolve the store path: --store / EMS_STORE, else ~/.ems/storage.json.
fn store_path(cli: &Cli) -> PathBuf {
    if let Some(path) = cli.store.as_ref() {
        return path.clone();
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".ems").join("storage.json")
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return Ok(());
    }

    let mut store = Store::open(&store_path(&cli))?;
    let mut session = Session::restore(&mut store)?;

    match cli.command {
        Commands::Completions { .. } => Ok(()),

        Commands::Ui => cmd_ui(store, session),

        Commands::Login { email, password } => cmd_login(&mut store, &mut session, email, password),

        Commands::Logout => cmd_logout(&mut store, &mut session),

        Commands::Whoami => cmd_whoami(&session),

        Commands::Dashboard { status, employee, category, sort, direction, limit } => {
            let query = TaskQuery { status, employee, category, sort, direction, ..Default::default() };
            cmd_dashboard(&store, &session, query, limit)
        },

        Commands::Tasks { status, search, sort, direction } => {
            let query = TaskQuery { status, search, sort, direction, ..Default::default() };
            cmd_tasks(&store, &session, query)
        },

        Commands::Create { employee, title, desc, date, category, priority } => {
            let draft = TaskDraft { employee_id: employee, title, description: desc, date, category, priority };
            cmd_create(&mut store, &session, draft)
        },

        Commands::Mark { id, status } => cmd_mark(&mut store, &session, id, status),

        Commands::Employees => cmd_employees(&store, &session),

        Commands::Reset => cmd_reset(&mut store, &mut session),
    }
}
