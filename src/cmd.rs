//! Command implementations for the CLI interface.
//!
//! Each handler receives the opened store and the restored session, performs
//! one operation and prints its result. Gated commands fail with
//! `Error::NotLoggedIn` when there is no session.

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use chrono::Local;

use crate::cli::Cli;
use crate::db::*;
use crate::error::Result;
use crate::fields::*;
use crate::session::Session;
use crate::store::Store;
use crate::task::TaskDraft;
use crate::tui::run::run_tui;
use crate::view::{status_counts, TaskQuery};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Log in with email and password.
    Login {
        /// Account email.
        email: String,
        /// Account password.
        #[arg(long, short, default_value = "")]
        password: String,
    },

    /// Log out and clear the stored session.
    Logout,

    /// Show the logged-in account.
    Whoami,

    /// Role-dependent dashboard: all tasks for admins, counters and own tasks otherwise.
    Dashboard {
        /// Filter by status (default: all).
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// Filter by employee first name (admins only).
        #[arg(long)]
        employee: Option<String>,
        /// Filter by category.
        #[arg(long)]
        category: Option<String>,
        /// Sort field.
        #[arg(long, value_enum, default_value_t = SortField::Date)]
        sort: SortField,
        /// Sort direction.
        #[arg(long, value_enum, default_value_t = SortDirection::Desc)]
        direction: SortDirection,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Task manager: your own tasks with a per-status summary.
    Tasks {
        /// Filter by status (default: all).
        #[arg(long, value_enum)]
        status: Option<TaskStatus>,
        /// Only tasks whose title or description contains this text.
        #[arg(long, default_value = "")]
        search: String,
        /// Sort field.
        #[arg(long, value_enum, default_value_t = SortField::Date)]
        sort: SortField,
        /// Sort direction.
        #[arg(long, value_enum, default_value_t = SortDirection::Desc)]
        direction: SortDirection,
    },

    /// Assign a new task to an employee (admins only).
    Create {
        /// Employee id, e.g. emp002.
        #[arg(long, default_value = "")]
        employee: String,
        /// Short title for the task.
        #[arg(long, default_value = "")]
        title: String,
        /// Task description.
        #[arg(long, default_value = "")]
        desc: String,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long, default_value = "")]
        date: String,
        /// Category, e.g. Design, Backend, DevOps.
        #[arg(long, default_value = "")]
        category: String,
        /// Priority: low | medium | high.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// Change the status of a task.
    Mark {
        /// Task id as shown in listings, e.g. emp002-3.
        id: String,
        /// New status: new | active | completed | failed.
        #[arg(value_enum)]
        status: TaskStatus,
    },

    /// List employees with their task counters (admins only).
    Employees,

    /// Re-seed the store with the demo records and clear the session.
    Reset,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(store: Store, session: Session) -> Result<()> {
    run_tui(store, session)
}

/// Log in and persist the session.
pub fn cmd_login(store: &mut Store, session: &mut Session, email: String, password: String) -> Result<()> {
    let identity = session.login(store, &email, &password)?;
    println!("Logged in as {} ({})", identity.display_name(), identity.role.label());
    Ok(())
}

/// Log out.
pub fn cmd_logout(store: &mut Store, session: &mut Session) -> Result<()> {
    let was_logged_in = session.is_authenticated();
    session.logout(store)?;
    if was_logged_in {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

/// Show the current identity.
pub fn cmd_whoami(session: &Session) -> Result<()> {
    let identity = session.require()?;
    println!("ID:     {}", identity.id);
    println!("Email:  {}", identity.email);
    println!("Role:   {}", identity.role.label());
    println!("Name:   {}", identity.name.as_deref().unwrap_or("-"));
    Ok(())
}

/// Print the role-dependent dashboard.
pub fn cmd_dashboard(store: &Store, session: &Session, query: TaskQuery, limit: Option<usize>) -> Result<()> {
    let identity = session.require()?;
    let db = Database::load(store)?;

    if identity.is_admin() {
        let all = db.flatten();
        let mut rows = query.apply(&all);
        if let Some(n) = limit {
            rows.truncate(n);
        }
        println!(
            "All tasks ({}/{}) sorted by {} {}",
            rows.len(),
            all.len(),
            query.sort.label(),
            query.direction.arrow()
        );
        print_table(&rows);
        return Ok(());
    }

    match db.counters_of(&identity.id) {
        Some(counters) => print_counters(identity.display_name(), &counters),
        None => println!("{}'s Task Dashboard\n  No tasks are assigned to this account.", identity.display_name()),
    }
    let own = db.tasks_of(&identity.id);
    if !own.is_empty() {
        let mut rows = query.apply(&own);
        if let Some(n) = limit {
            rows.truncate(n);
        }
        println!();
        print_table(&rows);
    }
    Ok(())
}

/// Print the current identity's tasks with a per-status summary.
pub fn cmd_tasks(store: &Store, session: &Session, query: TaskQuery) -> Result<()> {
    let identity = session.require()?;
    let db = Database::load(store)?;
    let own = db.tasks_of(&identity.id);

    if own.is_empty() {
        println!("You don't have any tasks assigned to you at the moment.");
        return Ok(());
    }

    let summary: Vec<String> = status_counts(&own)
        .iter()
        .map(|(status, n)| format!("{}: {}", status.label(), n))
        .collect();
    println!("{}", summary.join(" | "));

    let rows = query.apply(&own);
    if rows.is_empty() {
        println!("No tasks match your current search and filter criteria.");
    } else {
        print_table(&rows);
    }
    Ok(())
}

/// Create a task for an employee.
pub fn cmd_create(store: &mut Store, session: &Session, draft: TaskDraft) -> Result<()> {
    session.require_admin()?;
    let mut db = Database::load(store)?;
    let today = Local::now().date_naive();
    let view = db.create_task(store, &draft, today)?;
    println!("Created task {} for {}: {}", view.id, view.employee_name, view.title);
    Ok(())
}

/// Change a task's status.
pub fn cmd_mark(store: &mut Store, session: &Session, id: String, status: TaskStatus) -> Result<()> {
    let identity = session.require()?;
    let mut db = Database::load(store)?;
    let view = db.set_status(store, identity, &id, status)?;
    println!("Task {} is now {}", view.id, view.status.label());
    Ok(())
}

/// List employees and their counters.
pub fn cmd_employees(store: &Store, session: &Session) -> Result<()> {
    session.require_admin()?;
    let db = Database::load(store)?;
    println!(
        "{:<8} {:<10} {:<26} {:>4} {:>7} {:>5} {:>6}",
        "ID", "Name", "Email", "New", "Active", "Done", "Failed"
    );
    for e in &db.employees {
        let c = e.counters();
        println!(
            "{:<8} {:<10} {:<26} {:>4} {:>7} {:>5} {:>6}",
            e.id,
            truncate(&e.first_name, 10),
            truncate(&e.email, 26),
            c.new_task,
            c.active,
            c.completed,
            c.failed
        );
    }
    Ok(())
}

/// Re-seed the store.
pub fn cmd_reset(store: &mut Store, session: &mut Session) -> Result<()> {
    session.logout(store)?;
    store.reset()?;
    println!("Store reset to demo data");
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
