//! Progress bar with animated fill
//!
//! The logical value jumps immediately; the drawn fill eases toward it over a
//! few [`Message::ProgressFrame`] messages.

use super::{Render, next_id};
use crate::app::{Command, Message};
use crate::theme::Styles;
use ratatui::text::{Line, Span, Text};
use std::time::Duration;

/// Delay between animation frames (~60 fps)
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Fraction of the remaining gap covered per frame
const EASING: f64 = 0.35;

/// Below this gap the fill snaps to the target
const SNAP: f64 = 0.001;

const DEFAULT_WIDTH: u16 = 40;

#[derive(Debug, Clone)]
pub struct ProgressBar {
    id: usize,
    tag: usize,
    current: u64,
    total: u64,
    label: String,
    width: u16,
    shown: f64,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBar {
    pub fn new() -> Self {
        Self {
            id: next_id(),
            tag: 0,
            current: 0,
            total: 0,
            label: String::new(),
            width: DEFAULT_WIDTH,
            shown: 0.0,
        }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Width of the bar itself, excluding the percentage
    pub fn set_width(&mut self, width: u16) {
        self.width = width;
    }

    /// Logical completion in `0.0..=1.0`; zero whenever total is zero
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.current as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.current >= self.total
    }

    /// Fraction currently drawn
    pub fn displayed_percent(&self) -> f64 {
        self.shown
    }

    pub fn is_animating(&self) -> bool {
        (self.percent() - self.shown).abs() > SNAP
    }

    /// Set the logical value and start animating toward it
    pub fn set_progress(&mut self, current: u64, total: u64) -> Command {
        self.current = current;
        self.total = total;
        self.tag = self.tag.wrapping_add(1);
        self.frame_command()
    }

    /// Advance by `by`, saturating at total
    pub fn increment(&mut self, by: u64) -> Command {
        let next = self.current.saturating_add(by);
        let next = if self.total > 0 { next.min(self.total) } else { next };
        self.set_progress(next, self.total)
    }

    /// Forget progress and drawn fill
    pub fn reset(&mut self) {
        self.current = 0;
        self.total = 0;
        self.shown = 0.0;
        self.tag = self.tag.wrapping_add(1);
    }

    fn frame_command(&self) -> Command {
        Command::after(
            FRAME_INTERVAL,
            Message::ProgressFrame {
                id: self.id,
                tag: self.tag,
            },
        )
    }

    /// Step the animation on its own frames
    pub fn update(&mut self, msg: &Message) -> Option<Command> {
        match msg {
            Message::ProgressFrame { id, tag } if *id == self.id && *tag == self.tag => {
                let target = self.percent();
                let gap = target - self.shown;
                if gap.abs() <= SNAP {
                    self.shown = target;
                    return None;
                }
                self.shown += gap * EASING;
                if (target - self.shown).abs() <= SNAP {
                    self.shown = target;
                    return None;
                }
                Some(self.frame_command())
            }
            _ => None,
        }
    }
}

impl Render for ProgressBar {
    fn render(&self) -> Text<'static> {
        let width = usize::from(self.width);
        let filled = ((self.shown * width as f64).round() as usize).min(width);
        let spans = vec![
            Span::styled("█".repeat(filled), Styles::progress()),
            Span::styled("░".repeat(width - filled), Styles::progress_empty()),
            Span::styled(
                format!(" {:>3.0}%", self.shown * 100.0),
                Styles::text(),
            ),
        ];
        let mut lines = vec![Line::from(spans)];
        if !self.label.is_empty() {
            lines.push(Line::from(Span::styled(
                self.label.clone(),
                Styles::text_secondary(),
            )));
        }
        Text::from(lines)
    }
}
