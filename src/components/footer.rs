//! Status line and key hints at the bottom of every step
//!
//! Status types are limited to [`StatusKind`]; an unknown type name passed to
//! [`Footer::set_status_named`] is shown with info styling.

use super::keybindings::{HelpSection, KeyAction, KeyMap};
use super::{Render, truncate};
use crate::theme::{Styles, Theme};
use crate::types::StatusKind;
use ratatui::text::{Line, Span, Text};

#[derive(Debug, Clone, Default)]
pub struct Footer {
    status: String,
    kind: StatusKind,
    actions: Vec<KeyAction>,
    short_help: Vec<(String, String)>,
    full_help: Vec<HelpSection>,
    show_full_help: bool,
    width: u16,
}

impl Footer {
    /// Footer showing the enabled bindings among `actions`
    pub fn new(keys: &KeyMap, actions: &[KeyAction]) -> Self {
        let mut footer = Self::default();
        footer.set_bindings(keys, actions);
        footer
    }

    /// Refresh the hints from the key map
    pub fn set_bindings(&mut self, keys: &KeyMap, actions: &[KeyAction]) {
        self.actions = actions.to_vec();
        self.refresh(keys);
    }

    /// Re-read the current actions' hints after the key map changed
    pub fn refresh(&mut self, keys: &KeyMap) {
        self.short_help = keys.short_help(&self.actions);
        self.full_help = keys.full_help();
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn status_kind(&self) -> StatusKind {
        self.kind
    }

    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = text.into();
        self.kind = kind;
    }

    /// Set the status from a type name such as `"warning"`
    pub fn set_status_named(&mut self, text: impl Into<String>, kind: &str) {
        self.set_status(text, StatusKind::parse_lenient(kind));
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
        self.kind = StatusKind::Info;
    }

    pub fn toggle_full_help(&mut self) {
        self.show_full_help = !self.show_full_help;
    }

    pub fn is_full_help(&self) -> bool {
        self.show_full_help
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width;
    }

    fn short_help_line(&self, width: usize) -> Line<'static> {
        let mut spans = Vec::new();
        let mut used = 0;
        for (key, desc) in &self.short_help {
            let sep = if spans.is_empty() { 0 } else { 3 };
            let cost = sep + key.chars().count() + 1 + desc.chars().count();
            if used + cost > width {
                break;
            }
            if sep > 0 {
                spans.push(Span::styled(" • ", Styles::nav_hint()));
            }
            spans.push(Span::styled(key.clone(), Styles::nav_key()));
            spans.push(Span::styled(format!(" {desc}"), Styles::nav_hint()));
            used += cost;
        }
        Line::from(spans)
    }
}

impl Render for Footer {
    fn render(&self) -> Text<'static> {
        let width = if self.width == 0 {
            usize::MAX
        } else {
            usize::from(self.width)
        };
        let mut lines = Vec::new();

        if !self.status.is_empty() {
            let status = format!("{} {}", Theme::status_icon(self.kind), self.status);
            lines.push(Line::from(Span::styled(
                truncate(&status, width),
                Theme::status_style(self.kind),
            )));
        }

        if self.show_full_help {
            for section in &self.full_help {
                lines.push(Line::from(Span::styled(
                    section.title.clone(),
                    Styles::title(),
                )));
                for (key, desc) in &section.items {
                    lines.push(Line::from(vec![
                        Span::styled(format!("  {key:<10}"), Styles::nav_key()),
                        Span::styled(desc.clone(), Styles::nav_hint()),
                    ]));
                }
            }
        } else {
            lines.push(self.short_help_line(width));
        }
        Text::from(lines)
    }
}
