//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, renders the interface, and coordinates between
//! the login screen, the role-dependent dashboard, the personal task
//! manager and the overlays drawn on top of them.

use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::{
    db::{format_date_relative, truncate, Database},
    error::{Error, Result},
    fields::*,
    session::Session,
    store::Store,
    task::TaskView,
    view::{categories, cycle_option, employee_names, status_counts, TaskQuery},
    tui::{
        colors::{
            priority_color, status_color, BRAND, FAILED_RED, TILE_LAVENDER, TILE_ORANGE, TILE_TEAL, TILE_YELLOW,
        },
        enums::AppState,
        login_form::{LoginForm, EMAIL_FIELD, PASSWORD_FIELD},
        task_form::{
            TaskForm, CATEGORY_GLOBAL_ORDER, DATE_GLOBAL_ORDER, DESCRIPTION_GLOBAL_ORDER, EMPLOYEE_GLOBAL_ORDER,
            PRIORITY_GLOBAL_ORDER, TITLE_GLOBAL_ORDER,
        },
        utils::centered_rect,
    },
};

/// Main application state for the terminal user interface.
///
/// Owns the store and the session for the lifetime of the UI. `screen` is the
/// route underneath any overlay held in `state`.
pub struct App {
    state: AppState,
    screen: AppState,
    store: Store,
    session: Session,
    db: Database,
    /// Tasks in scope for the current screen, before filtering.
    views: Vec<TaskView>,
    /// `views` after the screen's query.
    visible: Vec<TaskView>,
    table_state: TableState,
    board_query: TaskQuery,
    manager_query: TaskQuery,
    search_active: bool,
    login_form: LoginForm,
    task_form: TaskForm,
    status_message: String,
}

impl App {
    /// Create the app over an opened store and a restored session.
    pub fn new(store: Store, session: Session) -> Result<Self> {
        let db = Database::load(&store)?;
        let task_form = TaskForm::new(&db);
        let mut app = App {
            state: AppState::Login,
            screen: AppState::Login,
            store,
            session,
            db,
            views: Vec::new(),
            visible: Vec::new(),
            table_state: TableState::default(),
            board_query: TaskQuery::default(),
            manager_query: TaskQuery::default(),
            search_active: false,
            login_form: LoginForm::new(),
            task_form,
            status_message: String::new(),
        };
        app.go_to(AppState::Dashboard);
        Ok(app)
    }

    /// Switch to a route, falling back to the login screen without a session.
    fn go_to(&mut self, state: AppState) {
        let state = if state.requires_session() && !self.session.is_authenticated() {
            AppState::Login
        } else {
            state
        };
        if matches!(state, AppState::Login | AppState::Dashboard | AppState::Tasks) {
            self.screen = state;
        }
        self.state = state;
        self.search_active = false;
        self.refresh_tasks();
    }

    /// Open an overlay on top of the current route.
    fn push_overlay(&mut self, overlay: AppState) {
        self.state = overlay;
    }

    fn close_overlay(&mut self) {
        self.state = self.screen;
    }

    fn is_admin(&self) -> bool {
        self.session.identity().is_some_and(|i| i.is_admin())
    }

    fn active_query(&self) -> &TaskQuery {
        match self.screen {
            AppState::Tasks => &self.manager_query,
            _ => &self.board_query,
        }
    }

    /// Recompute the tasks in scope and the filtered list for the current screen.
    fn refresh_tasks(&mut self) {
        let Some(identity) = self.session.identity() else {
            self.views.clear();
            self.visible.clear();
            self.table_state.select(None);
            return;
        };
        self.views = match self.screen {
            AppState::Dashboard if identity.is_admin() => self.db.flatten(),
            _ => self.db.tasks_of(&identity.id),
        };
        self.update_visible();
    }

    fn update_visible(&mut self) {
        self.visible = self.active_query().apply(&self.views).into_iter().cloned().collect();
        let selected = match self.table_state.selected() {
            _ if self.visible.is_empty() => None,
            Some(i) => Some(i.min(self.visible.len() - 1)),
            None => Some(0),
        };
        self.table_state.select(selected);
    }

    /// Re-read the employee record, picking up changes from other processes.
    fn reload(&mut self) -> Result<()> {
        self.db = Database::load(&self.store)?;
        self.refresh_tasks();
        Ok(())
    }

    fn selected_task(&self) -> Option<&TaskView> {
        self.table_state.selected().and_then(|i| self.visible.get(i))
    }

    fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let next = self.table_state.selected().map_or(0, |i| (i + 1) % self.visible.len());
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let len = self.visible.len();
        let prev = self.table_state.selected().map_or(0, |i| (i + len - 1) % len);
        self.table_state.select(Some(prev));
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Log in with the form contents and land on the dashboard.
    fn submit_login(&mut self) -> Result<()> {
        let email = self.login_form.email.value.clone();
        let password = self.login_form.password.value.clone();
        let name = match self.session.login(&mut self.store, &email, &password) {
            Ok(identity) => identity.display_name().to_string(),
            Err(e @ (Error::Io(_) | Error::Json(_))) => return Err(e),
            Err(e) => {
                self.login_form.error = Some(e.to_string());
                self.login_form.password.clear();
                return Ok(());
            }
        };
        self.login_form.clear();
        self.board_query = TaskQuery::default();
        self.manager_query = TaskQuery::default();
        self.reload()?;
        self.go_to(AppState::Dashboard);
        self.set_status_message(format!("Welcome, {}", name));
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.session.logout(&mut self.store)?;
        self.login_form.clear();
        self.go_to(AppState::Login);
        self.set_status_message("Logged out");
        Ok(())
    }

    /// Validate the create form and append the task.
    fn submit_task(&mut self) -> Result<()> {
        if self.session.require_admin().is_err() {
            self.close_overlay();
            self.set_status_message("Only admins can create tasks");
            return Ok(());
        }
        let draft = self.task_form.to_draft();
        let today = Local::now().date_naive();
        match self.db.create_task(&mut self.store, &draft, today) {
            Ok(view) => {
                self.task_form.reset();
                self.go_to(AppState::Dashboard);
                self.set_status_message(format!("Task {} assigned to {}", view.id, view.employee_name));
            }
            Err(Error::Validation(errors)) => {
                self.task_form.errors = errors;
                self.set_status_message("Please fix the highlighted fields");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Step the selected task to the next (or previous) status.
    fn cycle_selected_status(&mut self, forward: bool) -> Result<()> {
        let Some(task) = self.selected_task() else {
            return Ok(());
        };
        let (id, current) = (task.id.clone(), task.status);
        let Some(identity) = self.session.identity() else {
            return Ok(());
        };
        let len = TaskStatus::ALL.len();
        let pos = TaskStatus::ALL.iter().position(|s| *s == current).unwrap_or(0);
        let next = TaskStatus::ALL[if forward { (pos + 1) % len } else { (pos + len - 1) % len }];

        match self.db.set_status(&mut self.store, identity, &id, next) {
            Ok(view) => {
                self.set_status_message(format!("{} is now {}", view.id, view.status.label()));
                self.refresh_tasks();
            }
            Err(e @ (Error::Io(_) | Error::Json(_))) => return Err(e),
            Err(e) => self.set_status_message(e.to_string()),
        }
        Ok(())
    }

    fn handle_login_input(&mut self, key: KeyCode) -> Result<bool> {
        match key {
            KeyCode::Esc => return Ok(true),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.login_form.switch_field(),
            KeyCode::Left => self.login_form.handle_left_right(false),
            KeyCode::Right => self.login_form.handle_left_right(true),
            KeyCode::Backspace => self.login_form.handle_backspace(),
            KeyCode::Enter => {
                if self.login_form.current_field == EMAIL_FIELD && self.login_form.password.value.is_empty() {
                    self.login_form.switch_field();
                } else {
                    self.submit_login()?;
                }
            }
            KeyCode::Char(c) => self.login_form.handle_char(c),
            _ => {}
        }
        Ok(false)
    }

    /// Keys shared by the dashboard and the task manager.
    fn handle_common_list_key(&mut self, key: KeyCode) -> Result<Option<bool>> {
        match key {
            KeyCode::Char('q') => return Ok(Some(true)),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char('m') => self.cycle_selected_status(true)?,
            KeyCode::Char('M') => self.cycle_selected_status(false)?,
            KeyCode::Char('r') => {
                self.reload()?;
                self.set_status_message("Reloaded");
            }
            KeyCode::Char('h') | KeyCode::F(1) => self.push_overlay(AppState::Help),
            KeyCode::Char('L') => self.push_overlay(AppState::ConfirmLogout),
            _ => return Ok(None),
        }
        Ok(Some(false))
    }

    fn handle_dashboard_input(&mut self, key: KeyCode) -> Result<bool> {
        if let Some(quit) = self.handle_common_list_key(key)? {
            return Ok(quit);
        }
        if key == KeyCode::Esc {
            return Ok(true);
        }
        if key == KeyCode::Char('t') {
            self.go_to(AppState::Tasks);
            return Ok(false);
        }
        if !self.is_admin() {
            return Ok(false);
        }

        match key {
            KeyCode::Char(c @ ('s' | 'S')) => {
                self.board_query.status = cycle_option(&self.board_query.status, &TaskStatus::ALL, c == 's');
            }
            KeyCode::Char(c @ ('e' | 'E')) => {
                let names = employee_names(&self.views);
                self.board_query.employee = cycle_option(&self.board_query.employee, &names, c == 'e');
            }
            KeyCode::Char(c @ ('c' | 'C')) => {
                let options = categories(&self.views);
                self.board_query.category = cycle_option(&self.board_query.category, &options, c == 'c');
            }
            KeyCode::Char('x') => self.board_query.clear_filters(),
            KeyCode::Char('1') => self.board_query.select_sort(SortField::Date),
            KeyCode::Char('2') => self.board_query.select_sort(SortField::Employee),
            KeyCode::Char('3') => self.board_query.select_sort(SortField::Status),
            KeyCode::Char('4') => self.board_query.select_sort(SortField::Priority),
            KeyCode::Char('n') => {
                self.task_form = TaskForm::new(&self.db);
                self.push_overlay(AppState::CreateTask);
                return Ok(false);
            }
            _ => return Ok(false),
        }
        self.update_visible();
        Ok(false)
    }

    fn handle_tasks_input(&mut self, key: KeyCode) -> Result<bool> {
        if self.search_active {
            match key {
                KeyCode::Esc => {
                    self.manager_query.search.clear();
                    self.search_active = false;
                }
                KeyCode::Enter => self.search_active = false,
                KeyCode::Backspace => {
                    self.manager_query.search.pop();
                }
                KeyCode::Char(c) => self.manager_query.search.push(c),
                _ => {}
            }
            self.update_visible();
            return Ok(false);
        }

        if let Some(quit) = self.handle_common_list_key(key)? {
            return Ok(quit);
        }
        match key {
            KeyCode::Esc | KeyCode::Char('b') => {
                self.go_to(AppState::Dashboard);
                return Ok(false);
            }
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Char(c @ ('s' | 'S')) => {
                self.manager_query.status = cycle_option(&self.manager_query.status, &TaskStatus::ALL, c == 's');
            }
            KeyCode::Char('p') => {
                self.manager_query.sort = match self.manager_query.sort {
                    SortField::Priority => SortField::Date,
                    _ => SortField::Priority,
                };
            }
            KeyCode::Char('o') => self.manager_query.direction = self.manager_query.direction.toggle(),
            KeyCode::Char('x') => {
                self.manager_query.clear_filters();
                self.manager_query.search.clear();
            }
            _ => return Ok(false),
        }
        self.update_visible();
        Ok(false)
    }

    fn handle_form_input(&mut self, key: KeyCode) -> Result<bool> {
        match key {
            KeyCode::Esc => self.close_overlay(),
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => match self.task_form.current_field {
                TITLE_GLOBAL_ORDER => self.task_form.title.handle_delete(),
                DESCRIPTION_GLOBAL_ORDER => self.task_form.description.handle_delete(),
                DATE_GLOBAL_ORDER => self.task_form.date.handle_delete(),
                _ => {}
            },
            KeyCode::Enter => self.submit_task()?,
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
        Ok(false)
    }

    fn handle_confirm_input(&mut self, key: KeyCode) -> Result<bool> {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.logout()?,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.close_overlay(),
            _ => {}
        }
        Ok(false)
    }

    /// Dispatch one key press. Returns `true` when the app should exit.
    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            return Ok(true);
        }
        debug!(?key, state = ?self.state, "key");
        self.clear_status_message();
        match self.state {
            AppState::Login => self.handle_login_input(key),
            AppState::Dashboard => self.handle_dashboard_input(key),
            AppState::Tasks => self.handle_tasks_input(key),
            AppState::CreateTask => self.handle_form_input(key),
            AppState::Help => {
                self.close_overlay();
                Ok(false)
            }
            AppState::ConfirmLogout => self.handle_confirm_input(key),
        }
    }

    fn handle_input(&mut self) -> Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return self.handle_key(key.code, key.modifiers);
                }
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let who = match self.session.identity() {
            Some(identity) => format!("{} ({})", identity.display_name(), identity.role.label()),
            None => "Not logged in".to_string(),
        };
        let title = match self.screen {
            AppState::Tasks => "MY TASKS",
            AppState::Dashboard if self.is_admin() => "ADMIN DASHBOARD",
            AppState::Dashboard => "MY DASHBOARD",
            _ => "EMPLOYEE TASK MANAGER",
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(who, Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC)),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_login(&self, f: &mut Frame, area: Rect) {
        let area = centered_rect(50, 60, area);
        f.render_widget(Clear, area);
        let outer = Block::default()
            .borders(Borders::ALL)
            .title("Login")
            .border_style(Style::default().fg(BRAND));
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let fields = [
            (EMAIL_FIELD, "Email", &self.login_form.email, chunks[0]),
            (PASSWORD_FIELD, "Password", &self.login_form.password, chunks[1]),
        ];
        for (order, label, field, chunk) in fields {
            let style = if self.login_form.current_field == order {
                Style::default().fg(BRAND)
            } else {
                Style::default()
            };
            let input = Paragraph::new(field.display())
                .block(Block::default().borders(Borders::ALL).title(label).border_style(style));
            f.render_widget(input, chunk);
            if field.active {
                f.set_cursor_position((chunk.x + 1 + field.cursor as u16, chunk.y + 1));
            }
        }

        if let Some(ref error) = self.login_form.error {
            let error = Paragraph::new(error.as_str())
                .style(Style::default().fg(FAILED_RED))
                .alignment(Alignment::Center);
            f.render_widget(error, chunks[2]);
        }

        let help = Paragraph::new(vec![
            Line::from("Tab switch field  Enter log in  Esc quit"),
            Line::from(""),
            Line::from(Span::styled(
                "admin@me.com / 123 for the admin board",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(help, chunks[3]);
    }

    fn render_filter_bar(&self, f: &mut Frame, area: Rect) {
        let q = &self.board_query;
        let label = |value: Option<&str>| value.unwrap_or("All").to_string();
        let line = Line::from(vec![
            Span::styled("Status [s] ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(label(q.status.map(|s| s.label()))),
            Span::raw("   "),
            Span::styled("Employee [e] ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(label(q.employee.as_deref())),
            Span::raw("   "),
            Span::styled("Category [c] ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(label(q.category.as_deref())),
            Span::raw("   "),
            Span::styled("Sort [1-4] ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("{} {}", q.sort.label(), q.direction.arrow())),
        ]);
        let bar = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Filters"));
        f.render_widget(bar, area);
    }

    fn render_counters(&self, f: &mut Frame, area: Rect) {
        let Some(identity) = self.session.identity() else {
            return;
        };
        let Some(counters) = self.db.counters_of(&identity.id) else {
            let none = Paragraph::new("No tasks are assigned to this account.")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center);
            f.render_widget(none, area);
            return;
        };

        let tiles = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);
        let values = [
            ("New Task", counters.new_task, TILE_TEAL),
            ("Active", counters.active, TILE_ORANGE),
            ("Completed", counters.completed, TILE_YELLOW),
            ("Failed", counters.failed, TILE_LAVENDER),
        ];
        for ((label, count, color), tile) in values.into_iter().zip(tiles.iter()) {
            let text = vec![
                Line::from(Span::styled(
                    count.to_string(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )),
                Line::from(label),
            ];
            let widget = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)))
                .alignment(Alignment::Center);
            f.render_widget(widget, *tile);
        }
    }

    fn render_status_summary(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for (status, count) in status_counts(&self.views) {
            spans.push(Span::styled(
                format!(" {} {} ", status.label(), count),
                Style::default().fg(Color::Black).bg(status_color(status)),
            ));
            spans.push(Span::raw(" "));
        }
        let q = &self.manager_query;
        let search = if self.search_active {
            format!("/{}_", q.search)
        } else if q.search.is_empty() {
            "-".to_string()
        } else {
            q.search.clone()
        };
        let filters = Line::from(vec![
            Span::styled("Status [s] ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(q.status.map_or("All", |s| s.label())),
            Span::raw("   "),
            Span::styled("Search [/] ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(search),
            Span::raw("   "),
            Span::styled("Sort [p/o] ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("{} {}", q.sort.label(), q.direction.arrow())),
        ]);
        let summary = Paragraph::new(vec![Line::from(spans), filters])
            .block(Block::default().borders(Borders::ALL).title("Summary"));
        f.render_widget(summary, area);
    }

    fn render_task_table(&mut self, f: &mut Frame, area: Rect, show_employee: bool) {
        if self.views.is_empty() {
            let empty = Paragraph::new("You don't have any tasks assigned to you at the moment.")
                .block(Block::default().borders(Borders::ALL).title("Tasks"))
                .alignment(Alignment::Center);
            f.render_widget(empty, area);
            return;
        }

        let today = Local::now().date_naive();
        let mut headers = vec!["ID"];
        if show_employee {
            headers.push("Employee");
        }
        headers.extend(["Status", "Priority", "Date", "Due", "Category", "Title"]);
        let header = Row::new(
            headers
                .into_iter()
                .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
        )
        .style(Style::default().bg(BRAND).fg(Color::White))
        .height(1);

        let rows: Vec<Row> = self
            .visible
            .iter()
            .map(|task| {
                let mut cells = vec![Cell::from(task.id.clone())];
                if show_employee {
                    cells.push(Cell::from(task.employee_name.clone()));
                }
                cells.extend([
                    Cell::from(task.status.label()).style(Style::default().fg(status_color(task.status))),
                    Cell::from(task.priority.label()).style(Style::default().fg(priority_color(task.priority))),
                    Cell::from(task.date.format("%Y-%m-%d").to_string()),
                    Cell::from(format_date_relative(task.date, today)),
                    Cell::from(truncate(&task.category, 14)),
                    Cell::from(task.title.clone()),
                ]);
                let style = match task.status {
                    TaskStatus::Completed => Style::default().fg(Color::DarkGray),
                    _ => Style::default(),
                };
                Row::new(cells).style(style)
            })
            .collect();

        let mut widths = vec![Constraint::Length(10)];
        if show_employee {
            widths.push(Constraint::Length(10));
        }
        widths.extend([
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(14),
            Constraint::Min(20),
        ]);

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{}) - Press 'h' for help",
                self.visible.len(),
                self.views.len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_dashboard(&mut self, f: &mut Frame, area: Rect) {
        let admin = self.is_admin();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(if admin { 3 } else { 4 }), Constraint::Min(0)])
            .split(area);
        if admin {
            self.render_filter_bar(f, chunks[0]);
        } else {
            self.render_counters(f, chunks[0]);
        }
        self.render_task_table(f, chunks[1], admin);
    }

    fn render_tasks(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);
        self.render_status_summary(f, chunks[0]);
        self.render_task_table(f, chunks[1], false);
    }

    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let area = centered_rect(60, 90, area);
        f.render_widget(Clear, area);
        let outer = Block::default()
            .borders(Borders::ALL)
            .title("Create Task")
            .border_style(Style::default().fg(BRAND));
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Employee
                Constraint::Length(3), // Title
                Constraint::Length(4), // Description (taller)
                Constraint::Length(3), // Date
                Constraint::Length(3), // Category
                Constraint::Length(3), // Priority
                Constraint::Min(1),    // Instructions
            ])
            .split(inner);

        let form = &self.task_form;
        let entries = [
            (EMPLOYEE_GLOBAL_ORDER, Some(FormField::Employee), "Assign to *", format!("< {} >", form.employee_label())),
            (TITLE_GLOBAL_ORDER, Some(FormField::Title), "Title *", form.title.value.clone()),
            (DESCRIPTION_GLOBAL_ORDER, Some(FormField::Description), "Description *", form.description.value.clone()),
            (DATE_GLOBAL_ORDER, Some(FormField::Date), "Date * (YYYY-MM-DD, today, in 3d)", form.date.value.clone()),
            (CATEGORY_GLOBAL_ORDER, Some(FormField::Category), "Category *", format!("< {} >", form.category_label())),
            (PRIORITY_GLOBAL_ORDER, None, "Priority", format!("< {} >", form.priority_label())),
        ];
        for (i, (order, field, label, value)) in entries.into_iter().enumerate() {
            let error = field.and_then(|field| form.error_for(field));
            let mut style = Style::default();
            if error.is_some() {
                style = style.fg(FAILED_RED);
            }
            if form.current_field == order {
                style = style.fg(BRAND).add_modifier(Modifier::BOLD);
            }
            let mut block = Block::default().borders(Borders::ALL).title(label).border_style(style);
            if let Some(message) = error {
                block = block.title_bottom(Line::from(Span::styled(
                    message.to_string(),
                    Style::default().fg(FAILED_RED),
                )));
            }
            let widget = Paragraph::new(value).block(block).wrap(Wrap { trim: true });
            f.render_widget(widget, chunks[i]);
        }

        let cursor = match form.current_field {
            TITLE_GLOBAL_ORDER => Some((&form.title, chunks[1])),
            DESCRIPTION_GLOBAL_ORDER => Some((&form.description, chunks[2])),
            DATE_GLOBAL_ORDER => Some((&form.date, chunks[3])),
            _ => None,
        };
        if let Some((field, chunk)) = cursor {
            f.set_cursor_position((chunk.x + 1 + field.cursor as u16, chunk.y + 1));
        }

        let help = Paragraph::new("Tab/↑↓ move  ←→ change selection  Enter create  Esc cancel")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(help, chunks[6]);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut help_text = vec![
            Line::from(Span::styled("Employee Task Manager Help", bold)),
            Line::from(""),
            Line::from(Span::styled("Everywhere:", bold)),
            Line::from("  ↑/k, ↓/j     Navigate tasks"),
            Line::from("  m / M        Move selected task to next / previous status"),
            Line::from("  t            Open my task manager"),
            Line::from("  r            Reload from storage"),
            Line::from("  L            Log out"),
            Line::from("  h/F1         Show this help"),
            Line::from("  q/Ctrl+C     Quit"),
            Line::from(""),
            Line::from(Span::styled("Task manager:", bold)),
            Line::from("  /            Search title and description"),
            Line::from("  s / S        Cycle status filter"),
            Line::from("  p            Sort by date or priority"),
            Line::from("  o            Flip sort direction"),
            Line::from("  x            Clear filters and search"),
            Line::from("  Esc/b        Back to dashboard"),
        ];
        if self.is_admin() {
            help_text.extend([
                Line::from(""),
                Line::from(Span::styled("Admin dashboard:", bold)),
                Line::from("  s / e / c    Cycle status / employee / category filter"),
                Line::from("  x            Clear filters"),
                Line::from("  1-4          Sort by date, employee, status, priority"),
                Line::from("  n            Create a task"),
            ]);
        }
        help_text.extend([Line::from(""), Line::from("Press any key to return")]);

        let area = centered_rect(70, 80, area);
        f.render_widget(Clear, area);
        let help = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: false });
        f.render_widget(help, area);
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Log out")
            .borders(Borders::ALL)
            .style(Style::default().bg(FAILED_RED));

        let area = centered_rect(40, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "End this session?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.search_active {
            format!("Search: {} (Esc to clear, Enter to confirm)", self.manager_query.search)
        } else {
            match self.state {
                AppState::Login => "Log in to continue".to_string(),
                AppState::Dashboard | AppState::Tasks => {
                    format!("Tasks: {} | Press 'h' for help", self.visible.len())
                }
                AppState::CreateTask => "Create Task".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::ConfirmLogout => "Confirm Logout".to_string(),
            }
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(BRAND).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        self.render_header(f, chunks[0]);
        match self.screen {
            AppState::Login => self.render_login(f, chunks[1]),
            AppState::Tasks => self.render_tasks(f, chunks[1]),
            _ => self.render_dashboard(f, chunks[1]),
        }
        match self.state {
            AppState::CreateTask => self.render_task_form(f, chunks[1]),
            AppState::Help => self.render_help(f, chunks[1]),
            AppState::ConfirmLogout => self.render_confirm(f, chunks[1]),
            _ => {}
        }
        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
