//! Enumerations for TUI state management.

/// Screen currently shown by the terminal user interface.
///
/// `Login`, `Dashboard` and `Tasks` correspond to the `/`, `/dashboard` and
/// `/tasks` routes; the rest are overlays on top of them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Login,
    Dashboard,
    Tasks,
    CreateTask,
    Help,
    ConfirmLogout,
}

impl AppState {
    /// Whether the screen needs an authenticated session.
    pub fn requires_session(self) -> bool {
        !matches!(self, AppState::Login)
    }
}

