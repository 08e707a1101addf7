//! Complete step: what was installed and how to finish

use super::{
    StepContext, StepView, body_height, clamp_size, handle_common, stack, step_footer,
    step_header,
};
use crate::app::{Command, Message};
use crate::components::{ButtonGroup, Footer, Header, KeyAction, KeyMap, Panel, Render};
use crate::theme::{Styles, Theme};
use crate::types::{Selection, StatusKind, ViewState};
use ratatui::text::{Line, Text};

const REBOOT: usize = 0;
const EXIT: usize = 1;

pub struct CompleteView {
    header: Header,
    summary: Panel,
    buttons: ButtonGroup,
    footer: Footer,
    width: u16,
    height: u16,
}

impl CompleteView {
    pub fn new(ctx: &StepContext<'_>) -> Self {
        Self {
            header: step_header(ViewState::Complete, "Installation finished", ctx),
            summary: Panel::new("Summary"),
            buttons: ButtonGroup::new(["Reboot now", "Exit"]),
            footer: step_footer(ctx.keys, &[KeyAction::Left, KeyAction::Enter]),
            width: ctx.width,
            height: ctx.height,
        }
    }

    pub fn buttons(&self) -> &ButtonGroup {
        &self.buttons
    }

    fn layout(&mut self) {
        self.header.set_width(self.width);
        self.footer.set_width(self.width);
        let rows = if self.height == 0 {
            0
        } else {
            body_height(self.height, &self.header, &self.footer, 2)
        };
        self.summary.set_size(self.width, rows);
    }
}

impl StepView for CompleteView {
    fn footer_mut(&mut self) -> &mut Footer {
        &mut self.footer
    }

    fn enter(&mut self, selection: &Selection) -> Option<Command> {
        let mut lines = vec![Line::styled(
            format!("{} Driver installed successfully", Theme::status_icon(StatusKind::Success)),
            Theme::status_style(StatusKind::Success),
        )];
        if let Some(gpu) = &selection.gpu_info {
            lines.push(Line::styled(
                format!("GPU:     {}", gpu.display_name()),
                Styles::text(),
            ));
        }
        if let Some(driver) = &selection.driver {
            lines.push(Line::styled(format!("Driver:  {driver}"), Styles::text()));
        }
        for component in &selection.components {
            lines.push(Line::styled(
                format!("  • {}", component.name),
                Styles::text_secondary(),
            ));
        }
        lines.push(Line::default());
        lines.push(Line::styled(
            "A reboot is required to load the new kernel module.",
            Theme::status_style(StatusKind::Warning),
        ));
        self.summary.set_lines(lines);
        self.buttons.focus(REBOOT);
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
            Some(KeyAction::Enter) => {
                return match self.buttons.pressed() {
                    Some(REBOOT) => Some(Command::message(Message::RebootRequested)),
                    Some(EXIT) => Some(Command::message(Message::ExitRequested)),
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

impl Render for CompleteView {
    fn render(&self) -> Text<'static> {
        stack(vec![
            self.header.render(),
            self.summary.render(),
            self.buttons.render(),
            self.footer.render(),
        ])
    }
}
