//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, TaskStatus};

// Status colors follow the dashboard badges: blue new, amber in progress,
// green completed, red failed.

pub const NEW_BLUE: Color = Color::Rgb(21, 101, 192);
pub const PROGRESS_AMBER: Color = Color::Rgb(245, 127, 23);
pub const DONE_GREEN: Color = Color::Rgb(46, 125, 50);
pub const FAILED_RED: Color = Color::Rgb(198, 40, 40);

/// Used for the app header and status bar.
pub const BRAND: Color = Color::Rgb(248, 85, 101);

/// Counter tiles on the employee dashboard.
pub const TILE_TEAL: Color = Color::Rgb(0, 197, 196);
pub const TILE_ORANGE: Color = Color::Rgb(255, 129, 44);
pub const TILE_YELLOW: Color = Color::Rgb(245, 201, 56);
pub const TILE_LAVENDER: Color = Color::Rgb(202, 157, 253);

pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::New => NEW_BLUE,
        TaskStatus::Active => PROGRESS_AMBER,
        TaskStatus::Completed => DONE_GREEN,
        TaskStatus::Failed => FAILED_RED,
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::LightRed,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Gray,
    }
}
