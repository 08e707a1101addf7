//! Error step: shows what failed and offers retry or exit

use super::{
    StepContext, StepView, body_height, clamp_size, handle_common, stack, step_footer,
    step_header,
};
use crate::app::{Command, Message};
use crate::components::{ButtonGroup, Footer, Header, KeyAction, KeyMap, Panel, Render};
use crate::error::SharedError;
use crate::theme::{Styles, Theme};
use crate::types::{StatusKind, ViewState};
use ratatui::text::{Line, Span, Text};

/// Shown when a step failed without a concrete error
pub const UNKNOWN_ERROR: &str = "Unknown error";

const RETRY: usize = 0;
const EXIT: usize = 1;

pub struct ErrorView {
    header: Header,
    details: Panel,
    buttons: ButtonGroup,
    footer: Footer,
    width: u16,
    height: u16,
}

impl ErrorView {
    pub fn new(ctx: &StepContext<'_>) -> Self {
        let mut view = Self {
            header: step_header(ViewState::Error, "Something went wrong", ctx),
            details: Panel::new("Error"),
            buttons: ButtonGroup::new(["Retry", "Exit"]),
            footer: step_footer(ctx.keys, &[KeyAction::Left, KeyAction::Enter]),
            width: ctx.width,
            height: ctx.height,
        };
        view.set_failure(None, "");
        view
    }

    pub fn buttons(&self) -> &ButtonGroup {
        &self.buttons
    }

    /// Replace the displayed failure; focus returns to Retry
    pub fn set_failure(&mut self, err: Option<SharedError>, failed_step: &str) {
        let message = err
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        let mut lines = vec![Line::from(vec![
            Span::styled(
                format!("{} ", Theme::status_icon(StatusKind::Error)),
                Theme::status_style(StatusKind::Error),
            ),
            Span::styled(message, Styles::text()),
        ])];
        if !failed_step.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("Failed step: ", Styles::text_secondary()),
                Span::styled(failed_step.to_string(), Styles::text()),
            ]));
        }
        self.details.set_lines(lines);
        self.buttons.focus(RETRY);
    }

    fn layout(&mut self) {
        self.header.set_width(self.width);
        self.footer.set_width(self.width);
        let rows = if self.height == 0 {
            0
        } else {
            body_height(self.height, &self.header, &self.footer, 2)
        };
        self.details.set_size(self.width, rows);
    }
}

impl StepView for ErrorView {
    fn footer_mut(&mut self) -> &mut Footer {
        &mut self.footer
    }

    fn update(&mut self, msg: Message, keys: &KeyMap) -> Option<Command> {
        if handle_common(&mut self.footer, &msg, keys) {
            return None;
        }
        let Message::Key(key) = msg else {
            return None;
        };
        match keys.action_for(&key) {
            Some(KeyAction::Left | KeyAction::Up) => self.buttons.previous(),
            Some(KeyAction::Right | KeyAction::Down | KeyAction::Tab) => self.buttons.next(),
            Some(KeyAction::Enter) => {
                return match self.buttons.pressed() {
                    Some(RETRY) => Some(Command::message(Message::RetryRequested)),
                    Some(EXIT) => Some(Command::message(Message::ErrorExitRequested)),
                    _ => None,
                };
            }
            _ => {}
        }
        None
    }

    fn resize(&mut self, width: i32, height: i32) {
        (self.width, self.height) = clamp_size(width, height);
        self.layout();
    }
}

impl Render for ErrorView {
    fn render(&self) -> Text<'static> {
        stack(vec![
            self.header.render(),
            self.details.render(),
            self.buttons.render(),
            self.footer.render(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::shared_msg;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Message {
        Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn view(keys: &KeyMap) -> ErrorView {
        ErrorView::new(&StepContext {
            keys,
            version: "",
            width: 80,
            height: 24,
        })
    }

    #[test]
    fn test_missing_error_shows_unknown() {
        let keys = KeyMap::new();
        let mut error = view(&keys);
        error.set_failure(None, "");
        let text = error.view();
        assert!(text.contains(UNKNOWN_ERROR));
        assert!(!text.contains("Failed step"));
    }

    #[test]
    fn test_error_text_is_verbatim() {
        let keys = KeyMap::new();
        let mut error = view(&keys);
        error.set_failure(Some(shared_msg("pacman exited with status 1")), "Installation");
        let text = error.view();
        assert!(text.contains("pacman exited with status 1"));
        assert!(text.contains("Failed step: Installation"));
    }

    #[test]
    fn test_buttons_emit_retry_and_exit() {
        let keys = KeyMap::new();
        let mut error = view(&keys);
        let cmd = error.update(key(KeyCode::Enter), &keys).unwrap();
        assert!(matches!(cmd.run(), Some(Message::RetryRequested)));

        error.update(key(KeyCode::Tab), &keys);
        assert_eq!(error.buttons().focused_label(), Some("Exit"));
        let cmd = error.update(key(KeyCode::Enter), &keys).unwrap();
        assert!(matches!(cmd.run(), Some(Message::ErrorExitRequested)));
    }

    #[test]
    fn test_new_failure_refocuses_retry() {
        let keys = KeyMap::new();
        let mut error = view(&keys);
        error.update(key(KeyCode::Right), &keys);
        error.set_failure(None, "GPU Detection");
        assert_eq!(error.buttons().focused_label(), Some("Retry"));
    }

    #[test]
    fn test_disabled_retry_does_nothing() {
        let keys = KeyMap::new();
        let mut error = view(&keys);
        error.set_failure(None, "");
        error.buttons.disable(RETRY);
        assert!(error.update(key(KeyCode::Enter), &keys).is_none());

        error.update(key(KeyCode::Right), &keys);
        let cmd = error.update(key(KeyCode::Enter), &keys).unwrap();
        assert!(matches!(cmd.run(), Some(Message::ErrorExitRequested)));
    }
}
