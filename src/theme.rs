//! Centralized theme and styling for the wizard
//!
//! Single source of truth for the colors and styles the widgets use. Widgets
//! never hardcode colors; they ask [`Styles`] or [`Theme`].
//!
//! # Usage
//! ```rust
//! use gpu_wizard::theme::{Colors, Styles, Theme};
//! use gpu_wizard::types::StatusKind;
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(Colors::PRIMARY);
//! let title_style = Styles::title();
//! let error_style = Theme::status_style(StatusKind::Error);
//! ```

use crate::types::StatusKind;
use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette
pub struct Colors;

impl Colors {
    /// Default foreground text color
    pub const FG_PRIMARY: Color = Color::White;

    /// Secondary/muted text color
    pub const FG_SECONDARY: Color = Color::Gray;

    /// Disabled/inactive text color
    pub const FG_MUTED: Color = Color::DarkGray;

    /// Primary accent color - borders, titles, highlights
    pub const PRIMARY: Color = Color::Green;

    /// Secondary accent color - selected items, emphasis
    pub const SECONDARY: Color = Color::Yellow;

    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
    pub const INFO: Color = Color::Cyan;

    /// Selected list item background
    pub const SELECTED_BG: Color = Color::Green;

    /// Selected list item foreground
    pub const SELECTED_FG: Color = Color::Black;

    /// Filled part of a progress bar
    pub const PROGRESS: Color = Color::Green;

    /// Empty part of a progress bar
    pub const PROGRESS_EMPTY: Color = Color::DarkGray;
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Pre-built styles for common elements
pub struct Styles;

impl Styles {
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    /// Header and panel titles
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Highlighted row in a focused list
    pub fn selected() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Cursor row in a list that does not have focus
    pub fn selected_unfocused() -> Style {
        Style::default()
            .fg(Colors::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn button_focused() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn button_blurred() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    pub fn button_disabled() -> Style {
        Style::default()
            .fg(Colors::FG_MUTED)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn progress() -> Style {
        Style::default().fg(Colors::PROGRESS)
    }

    pub fn progress_empty() -> Style {
        Style::default().fg(Colors::PROGRESS_EMPTY)
    }

    /// Key hint in the footer
    pub fn nav_key() -> Style {
        Style::default()
            .fg(Colors::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Action label next to a key hint
    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    pub fn spinner() -> Style {
        Style::default().fg(Colors::PRIMARY)
    }
}

// =============================================================================
// SEMANTIC STYLING
// =============================================================================

/// Status-dependent styling
pub struct Theme;

impl Theme {
    /// Color for a footer status type
    pub fn status_color(kind: StatusKind) -> Color {
        match kind {
            StatusKind::Info => Colors::INFO,
            StatusKind::Success => Colors::SUCCESS,
            StatusKind::Warning => Colors::WARNING,
            StatusKind::Error => Colors::ERROR,
        }
    }

    pub fn status_style(kind: StatusKind) -> Style {
        Style::default().fg(Self::status_color(kind))
    }

    /// Leading glyph for a footer status type
    pub fn status_icon(kind: StatusKind) -> &'static str {
        match kind {
            StatusKind::Info => "ℹ",
            StatusKind::Success => "✓",
            StatusKind::Warning => "⚠",
            StatusKind::Error => "✗",
        }
    }
}
