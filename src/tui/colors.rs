//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Priority;

/// Header and status bar background.
pub const DARK_BLUE: Color = Color::Rgb(0, 40, 100);
/// Focused form field border.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Error notices and high priority.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Warning notices.
pub const AMBER: Color = Color::Rgb(150, 90, 0);
pub const SOFT_RED: Color = Color::Rgb(230, 90, 90);
pub const SOFT_GREEN: Color = Color::Rgb(110, 190, 110);

/// Foreground for a priority cell.
pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => SOFT_RED,
        Priority::Medium => GOLD,
        Priority::Low => SOFT_GREEN,
    }
}
