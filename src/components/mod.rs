//! Interactive widgets composed by the wizard steps
//!
//! Every widget owns its state and renders to a styled [`Text`] snapshot. The
//! plain-string form produced by [`Render::view`] is what tests compare
//! against; the runtime draws the styled form with ratatui.

pub mod button;
pub mod footer;
pub mod header;
pub mod keybindings;
pub mod list;
pub mod panel;
pub mod progress;
pub mod spinner;

pub use button::{Button, ButtonGroup};
pub use footer::Footer;
pub use header::Header;
pub use keybindings::{HelpSection, KeyAction, KeyBinding, KeyMap};
pub use list::{List, ListItem};
pub use panel::Panel;
pub use progress::ProgressBar;
pub use spinner::Spinner;

use ratatui::text::Text;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Widgets that can produce a render snapshot
pub trait Render {
    /// Styled snapshot
    fn render(&self) -> Text<'static>;

    /// Plain snapshot without styling
    fn view(&self) -> String {
        plain(&self.render())
    }
}

/// Flatten styled text into lines separated by `\n`
pub fn plain(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// Process-unique id for widgets that schedule their own animation messages
pub(crate) fn next_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Convert a possibly negative size into a terminal dimension
pub(crate) fn clamp_dim(value: i32) -> u16 {
    value.clamp(0, i32::from(u16::MAX)) as u16
}

/// Cut `s` to at most `width` characters
pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else if width == 0 {
        String::new()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::text::{Line, Span};

    #[test]
    fn test_plain_joins_spans_and_lines() {
        let text = Text::from(vec![
            Line::from(vec![Span::raw("a"), Span::raw("b")]),
            Line::from("c"),
        ]);
        assert_eq!(plain(&text), "ab\nc");
        assert_eq!(plain(&Text::default()), "");
    }

    #[test]
    fn test_clamp_dim() {
        assert_eq!(clamp_dim(-10), 0);
        assert_eq!(clamp_dim(80), 80);
        assert_eq!(clamp_dim(i32::MAX), u16::MAX);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "he…");
        assert_eq!(truncate("hello", 0), "");
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(next_id(), next_id());
    }
}
