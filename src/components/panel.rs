//! Bordered text panel
//!
//! Draws its own box-drawing border so the plain snapshot keeps the layout.
//! Content that does not fit is cut from the top, keeping the newest lines.

use super::{Render, truncate};
use crate::theme::Styles;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

/// Smallest panel that still has room for a border
const MIN_WIDTH: u16 = 4;
const MIN_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Default)]
pub struct Panel {
    title: String,
    content: Vec<Line<'static>>,
    width: u16,
    height: u16,
}

impl Panel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the content with plain text, one line per `\n`
    pub fn set_content(&mut self, content: &str) {
        self.content = content
            .lines()
            .map(|line| Line::from(line.to_string()))
            .collect();
    }

    /// Replace the content with styled lines
    pub fn set_lines(&mut self, lines: Vec<Line<'static>>) {
        self.content = lines;
    }

    /// Add one plain line
    pub fn append(&mut self, line: impl Into<String>) {
        self.content.push(Line::from(line.into()));
    }

    /// Add one styled line
    pub fn append_styled(&mut self, line: impl Into<String>, style: Style) {
        self.content
            .push(Line::from(Span::styled(line.into(), style)));
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }

    pub fn line_count(&self) -> usize {
        self.content.len()
    }

    /// Outer size including the border; zero means "fit content"
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    fn content_width(&self) -> usize {
        self.content
            .iter()
            .map(Line::width)
            .max()
            .unwrap_or(0)
            .max(self.title.chars().count() + 2)
    }
}

impl Render for Panel {
    fn render(&self) -> Text<'static> {
        let inner_width = if self.width == 0 {
            self.content_width()
        } else {
            usize::from(self.width.max(MIN_WIDTH) - 2)
        };
        let visible_rows = if self.height == 0 {
            self.content.len()
        } else {
            usize::from(self.height.max(MIN_HEIGHT) - 2)
        };

        let border = Styles::text_muted();
        let mut lines = Vec::with_capacity(visible_rows + 2);

        let title = truncate(&self.title, inner_width.saturating_sub(2));
        let top = if title.is_empty() {
            vec![Span::styled(format!("┌{}┐", "─".repeat(inner_width)), border)]
        } else {
            let fill = inner_width.saturating_sub(title.chars().count() + 2);
            vec![
                Span::styled("┌ ", border),
                Span::styled(title, Styles::title()),
                Span::styled(format!(" {}┐", "─".repeat(fill)), border),
            ]
        };
        lines.push(Line::from(top));

        let skip = self.content.len().saturating_sub(visible_rows);
        let mut shown = 0;
        for line in self.content.iter().skip(skip).take(visible_rows) {
            let mut spans = vec![Span::styled("│", border)];
            let mut used = 0;
            for span in &line.spans {
                let room = inner_width - used;
                if room == 0 {
                    break;
                }
                let content = truncate(span.content.as_ref(), room);
                used += content.chars().count();
                spans.push(Span::styled(content, span.style.patch(line.style)));
            }
            spans.push(Span::raw(" ".repeat(inner_width - used)));
            spans.push(Span::styled("│", border));
            lines.push(Line::from(spans));
            shown += 1;
        }
        for _ in shown..visible_rows {
            lines.push(Line::from(vec![
                Span::styled("│", border),
                Span::raw(" ".repeat(inner_width)),
                Span::styled("│", border),
            ]));
        }

        lines.push(Line::from(Span::styled(
            format!("└{}┘", "─".repeat(inner_width)),
            border,
        )));
        Text::from(lines)
    }
}
