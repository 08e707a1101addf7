//! Buttons and horizontal button groups
//!
//! Navigation on an empty or single-button group is a no-op and an
//! out-of-range focus request keeps the current focus.

use super::Render;
use crate::theme::Styles;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    label: String,
    focused: bool,
    disabled: bool,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            focused: false,
            disabled: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn toggle(&mut self) {
        self.focused = !self.focused;
    }

    pub fn enable(&mut self) {
        self.disabled = false;
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }

    fn style(&self) -> Style {
        if self.disabled {
            Styles::button_disabled()
        } else if self.focused {
            Styles::button_focused()
        } else {
            Styles::button_blurred()
        }
    }

    fn span(&self) -> Span<'static> {
        Span::styled(format!("[ {} ]", self.label), self.style())
    }
}

impl Render for Button {
    fn render(&self) -> Text<'static> {
        Text::from(Line::from(self.span()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ButtonGroup {
    buttons: Vec<Button>,
    focused: usize,
}

impl ButtonGroup {
    /// Create a group with the first button focused
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        let mut group = Self::default();
        group.set_labels(labels);
        group
    }

    /// Replace all buttons; focus returns to the first one
    pub fn set_labels<S: Into<String>>(&mut self, labels: impl IntoIterator<Item = S>) {
        self.buttons = labels.into_iter().map(Button::new).collect();
        self.focused = 0;
        self.sync_focus();
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Index of the focused button, `None` for an empty group
    pub fn focused(&self) -> Option<usize> {
        if self.buttons.is_empty() {
            None
        } else {
            Some(self.focused)
        }
    }

    pub fn focused_label(&self) -> Option<&str> {
        self.focused().map(|i| self.buttons[i].label())
    }

    /// Focus button `index`; out of range requests are ignored
    pub fn focus(&mut self, index: usize) {
        if index < self.buttons.len() {
            self.focused = index;
            self.sync_focus();
        }
    }

    /// Move focus right, wrapping
    pub fn next(&mut self) {
        if self.buttons.len() > 1 {
            self.focused = (self.focused + 1) % self.buttons.len();
            self.sync_focus();
        }
    }

    /// Move focus left, wrapping
    pub fn previous(&mut self) {
        if self.buttons.len() > 1 {
            self.focused = (self.focused + self.buttons.len() - 1) % self.buttons.len();
            self.sync_focus();
        }
    }

    pub fn enable(&mut self, index: usize) {
        if let Some(button) = self.buttons.get_mut(index) {
            button.enable();
        }
    }

    pub fn disable(&mut self, index: usize) {
        if let Some(button) = self.buttons.get_mut(index) {
            button.disable();
        }
    }

    /// Whether the focused button can be pressed
    pub fn focused_enabled(&self) -> bool {
        self.focused()
            .is_some_and(|i| !self.buttons[i].is_disabled())
    }

    /// Index of the focused button if it can be pressed
    pub fn pressed(&self) -> Option<usize> {
        self.focused().filter(|_| self.focused_enabled())
    }

    fn sync_focus(&mut self) {
        for (i, button) in self.buttons.iter_mut().enumerate() {
            if i == self.focused {
                button.focus();
            } else {
                button.blur();
            }
        }
    }
}

impl Render for ButtonGroup {
    fn render(&self) -> Text<'static> {
        if self.buttons.is_empty() {
            return Text::default();
        }
        let mut spans = Vec::with_capacity(self.buttons.len() * 2);
        for (i, button) in self.buttons.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(button.span());
        }
        Text::from(Line::from(spans))
    }
}
