//! Title banner shown at the top of every step

use super::{Render, truncate};
use crate::theme::Styles;
use ratatui::text::{Line, Span, Text};

#[derive(Debug, Clone, Default)]
pub struct Header {
    title: String,
    version: String,
    subtitle: String,
    /// `(current, total)` step indicator, 1-based
    step: Option<(usize, usize)>,
    width: u16,
}

impl Header {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) {
        self.subtitle = subtitle.into();
    }

    /// Show "Step n of m"; `current` beyond `total` is clamped
    pub fn set_step(&mut self, current: usize, total: usize) {
        self.step = if total == 0 {
            None
        } else {
            Some((current.clamp(1, total), total))
        };
    }

    pub fn clear_step(&mut self) {
        self.step = None;
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width;
    }
}

impl Render for Header {
    fn render(&self) -> Text<'static> {
        let width = if self.width == 0 {
            usize::MAX
        } else {
            usize::from(self.width)
        };

        let mut title_spans = vec![Span::styled(truncate(&self.title, width), Styles::title())];
        if !self.version.is_empty() {
            let version = format!("  v{}", self.version.trim_start_matches('v'));
            let used = self.title.chars().count();
            if used + version.chars().count() <= width {
                title_spans.push(Span::styled(version, Styles::text_muted()));
            }
        }
        let mut lines = vec![Line::from(title_spans)];

        if !self.subtitle.is_empty() {
            lines.push(Line::from(Span::styled(
                truncate(&self.subtitle, width),
                Styles::text_secondary(),
            )));
        }

        if let Some((current, total)) = self.step {
            let dots: String = (1..=total)
                .map(|i| if i <= current { '●' } else { '○' })
                .collect();
            let indicator = format!("{dots}  Step {current} of {total}");
            lines.push(Line::from(Span::styled(
                truncate(&indicator, width),
                Styles::text_muted(),
            )));
        }

        let rule = "─".repeat(if width == usize::MAX { 40 } else { width });
        lines.push(Line::from(Span::styled(rule, Styles::text_muted())));
        Text::from(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_version() {
        let header = Header::new("GPU Driver Installer", "1.2.0");
        let view = header.view();
        assert!(view.starts_with("GPU Driver Installer  v1.2.0"));
    }

    #[test]
    fn test_version_prefix_not_doubled() {
        let header = Header::new("X", "v2.0");
        assert!(header.view().starts_with("X  v2.0"));
    }

    #[test]
    fn test_step_indicator_clamps() {
        let mut header = Header::new("X", "");
        header.set_step(9, 3);
        assert!(header.view().contains("●●●  Step 3 of 3"));

        header.set_step(0, 4);
        assert!(header.view().contains("●○○○  Step 1 of 4"));

        header.set_step(1, 0);
        assert!(!header.view().contains("Step"));
    }

    #[test]
    fn test_narrow_width_drops_version() {
        let mut header = Header::new("Installer", "1.0");
        header.set_width(10);
        let first = header.view().lines().next().unwrap().to_string();
        assert_eq!(first, "Installer");
    }
}
