//! Animated activity spinner
//!
//! The spinner drives itself: every [`Message::Tick`] it accepts while visible
//! schedules the next one. Showing the spinner again bumps its generation tag,
//! so ticks left over from an earlier loop are dropped and only one loop is
//! ever alive.

use super::{Render, next_id};
use crate::app::{Command, Message};
use crate::theme::Styles;
use ratatui::text::{Line, Span, Text};
use std::time::Duration;

/// Braille dot animation
pub const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Default delay between frames
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Spinner {
    id: usize,
    tag: usize,
    frame: usize,
    visible: bool,
    message: String,
    interval: Duration,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new("")
    }
}

impl Spinner {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: next_id(),
            tag: 0,
            frame: 0,
            visible: false,
            message: message.into(),
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Make the spinner visible and start a fresh tick loop
    pub fn show(&mut self) -> Command {
        self.visible = true;
        self.tag = self.tag.wrapping_add(1);
        self.tick()
    }

    /// Hide the spinner; its tick loop ends at the next tick
    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// Command yielding the next tick for the current loop
    pub fn tick(&self) -> Command {
        Command::after(
            self.interval,
            Message::Tick {
                id: self.id,
                tag: self.tag,
            },
        )
    }

    /// Advance the animation on its own ticks
    pub fn update(&mut self, msg: &Message) -> Option<Command> {
        match msg {
            Message::Tick { id, tag } if *id == self.id && *tag == self.tag => {
                if !self.visible {
                    return None;
                }
                self.frame = (self.frame + 1) % FRAMES.len();
                Some(self.tick())
            }
            _ => None,
        }
    }
}

impl Render for Spinner {
    fn render(&self) -> Text<'static> {
        if !self.visible {
            return Text::default();
        }
        let mut spans = vec![Span::styled(FRAMES[self.frame].to_string(), Styles::spinner())];
        if !self.message.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(self.message.clone(), Styles::text()));
        }
        Text::from(Line::from(spans))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_of(cmd: Command) -> Message {
        cmd.run().expect("tick command yields a message")
    }

    #[test]
    fn test_hidden_spinner_renders_empty() {
        let spinner = Spinner::new("Detecting");
        assert_eq!(spinner.view(), "");
    }

    #[test]
    fn test_visible_spinner_renders_frame_and_message() {
        let mut spinner = Spinner::new("Detecting").with_interval(Duration::ZERO);
        let _ = spinner.show();
        assert_eq!(spinner.view(), format!("{} Detecting", FRAMES[0]));
    }

    #[test]
    fn test_tick_reschedules_while_visible() {
        let mut spinner = Spinner::new("x").with_interval(Duration::ZERO);
        let mut msg = tick_of(spinner.show());
        for expected in 1..=12 {
            let next = spinner.update(&msg).expect("visible spinner reschedules");
            assert_eq!(spinner.frame(), expected % FRAMES.len());
            msg = tick_of(next);
        }
    }

    #[test]
    fn test_hidden_spinner_stops_loop() {
        let mut spinner = Spinner::new("x").with_interval(Duration::ZERO);
        let msg = tick_of(spinner.show());
        spinner.hide();
        assert!(spinner.update(&msg).is_none());
        assert_eq!(spinner.frame(), 0);
    }

    #[test]
    fn test_show_restarts_and_drops_stale_ticks() {
        let mut spinner = Spinner::new("x").with_interval(Duration::ZERO);
        let stale = tick_of(spinner.show());
        let fresh = tick_of(spinner.show());

        assert!(spinner.update(&stale).is_none());
        assert!(spinner.update(&fresh).is_some());
    }

    #[test]
    fn test_ignores_other_spinners() {
        let mut a = Spinner::new("a").with_interval(Duration::ZERO);
        let mut b = Spinner::new("b").with_interval(Duration::ZERO);
        let _ = a.show();
        let tick_b = tick_of(b.show());
        assert!(a.update(&tick_b).is_none());
    }
}
