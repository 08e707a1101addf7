//! Confirmation step: last look at the plan before installing

use super::{
    StepContext, StepView, body_height, clamp_size, handle_common, stack, step_footer,
    step_header,
};
use crate::app::{Command, Message};
use crate::components::{ButtonGroup, Footer, Header, KeyAction, KeyMap, Panel, Render};
use crate::error::shared_msg;
use crate::theme::{Styles, Theme};
use crate::types::{Selection, StatusKind, ViewState};
use ratatui::text::{Line, Span, Text};

const BACK: usize = 0;
const INSTALL: usize = 1;

pub struct ConfirmationView {
    header: Header,
    summary: Panel,
    buttons: ButtonGroup,
    footer: Footer,
    selection: Selection,
    width: u16,
    height: u16,
}

impl ConfirmationView {
    pub fn new(ctx: &StepContext<'_>) -> Self {
        let mut buttons = ButtonGroup::new(["Back", "Install"]);
        buttons.focus(INSTALL);
        Self {
            header: step_header(ViewState::Confirmation, "Review your choices", ctx),
            summary: Panel::new("Installation plan"),
            buttons,
            footer: step_footer(ctx.keys, &[KeyAction::Left, KeyAction::Enter]),
            selection: Selection::default(),
            width: ctx.width,
            height: ctx.height,
        }
    }

    pub fn buttons(&self) -> &ButtonGroup {
        &self.buttons
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    fn rebuild(&mut self) {
        let mut lines = Vec::new();
        let gpu = self
            .selection
            .gpu_info
            .as_ref()
            .map(|g| g.display_name())
            .unwrap_or_else(|| "Unknown GPU".to_string());
        lines.push(summary_line("GPU", gpu));
        lines.push(summary_line(
            "Driver",
            self.selection
                .driver
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "none selected".to_string()),
        ));

        lines.push(Line::default());
        if self.selection.components.is_empty() {
            lines.push(Line::styled("No extra components", Styles::text_muted()));
        } else {
            lines.push(Line::styled("Components:", Styles::text_secondary()));
            for component in &self.selection.components {
                lines.push(Line::styled(
                    format!("  • {} - {}", component.name, component.description),
                    Styles::text(),
                ));
            }
        }

        if let Some(current) = self
            .selection
            .gpu_info
            .as_ref()
            .and_then(|g| g.current_driver.as_deref())
        {
            lines.push(Line::default());
            lines.push(Line::styled(
                format!("The installed driver ({current}) will be replaced."),
                Theme::status_style(StatusKind::Warning),
            ));
        }
        if self.selection.gpu_info.as_ref().is_some_and(|g| g.secure_boot) {
            lines.push(Line::styled(
                "⚠ Secure Boot is enabled; you may need to enroll a signing key.",
                Theme::status_style(StatusKind::Warning),
            ));
        }
        self.summary.set_lines(lines);
    }

    fn layout(&mut self) {
        self.header.set_width(self.width);
        self.footer.set_width(self.width);
        let rows = if self.height == 0 {
            0
        } else {
            // button row plus the blank line above it
            body_height(self.height, &self.header, &self.footer, 2)
        };
        self.summary.set_size(self.width, rows);
    }

    fn activate(&self) -> Option<Command> {
        let next = match self.buttons.pressed()? {
            BACK => Message::NavigateBackToSelection,
            INSTALL => match (&self.selection.gpu_info, &self.selection.driver) {
                (Some(gpu), Some(driver)) => Message::StartInstallation {
                    gpu_info: gpu.clone(),
                    driver: driver.clone(),
                    components: self.selection.components.clone(),
                },
                _ => Message::NavigateToError {
                    err: Some(shared_msg("Installation plan is incomplete")),
                    failed_step: ViewState::Confirmation.to_string(),
                },
            },
            _ => return None,
        };
        Some(Command::message(next))
    }
}

fn summary_line(name: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name:<8}"), Styles::text_secondary()),
        Span::styled(value, Styles::text()),
    ])
}

impl StepView for ConfirmationView {
    fn footer_mut(&mut self) -> &mut Footer {
        &mut self.footer
    }

    fn enter(&mut self, selection: &Selection) -> Option<Command> {
        self.selection = selection.clone();
        self.rebuild();
        None
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
            Some(KeyAction::Enter) => return self.activate(),
            _ => {}
        }
        None
    }

    fn resize(&mut self, width: i32, height: i32) {
        (self.width, self.height) = clamp_size(width, height);
        self.layout();
    }
}

impl Render for ConfirmationView {
    fn render(&self) -> Text<'static> {
        stack(vec![
            self.header.render(),
            self.summary.render(),
            self.buttons.render(),
            self.footer.render(),
        ])
    }
}
