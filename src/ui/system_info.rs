//! System info step: shows what detection found

use super::{
    StepContext, StepView, body_height, clamp_size, handle_common, stack, step_footer,
    step_header,
};
use crate::app::{Command, Message};
use crate::components::{Footer, Header, KeyAction, KeyMap, Panel, Render};
use crate::error::shared_msg;
use crate::theme::{Styles, Theme};
use crate::types::{GpuInfo, Selection, StatusKind, ViewState};
use ratatui::text::{Line, Span, Text};

pub struct SystemInfoView {
    header: Header,
    details: Panel,
    footer: Footer,
    gpu: Option<GpuInfo>,
    width: u16,
    height: u16,
}

fn field(name: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{name:<16}"), Styles::text_secondary()),
        Span::styled(value.to_string(), Styles::text()),
    ])
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() { "unknown" } else { value }
}

impl SystemInfoView {
    pub fn new(ctx: &StepContext<'_>) -> Self {
        Self {
            header: step_header(ViewState::SystemInfo, "Detected hardware", ctx),
            details: Panel::new("System information"),
            footer: step_footer(ctx.keys, &[KeyAction::Enter]),
            gpu: None,
            width: ctx.width,
            height: ctx.height,
        }
    }

    pub fn gpu(&self) -> Option<&GpuInfo> {
        self.gpu.as_ref()
    }

    fn rebuild(&mut self) {
        let Some(gpu) = &self.gpu else {
            self.details.set_content("No GPU information available.");
            return;
        };

        let mut lines = vec![
            field("GPU", &gpu.display_name()),
            field("Vendor", or_unknown(&gpu.vendor)),
            field("PCI ID", or_unknown(&gpu.pci_id)),
            field("Memory", or_unknown(&gpu.vram)),
            field(
                "Current driver",
                gpu.current_driver.as_deref().unwrap_or("none"),
            ),
            field("Kernel", or_unknown(&gpu.kernel)),
            field("Distribution", or_unknown(&gpu.distribution)),
            field(
                "Secure Boot",
                if gpu.secure_boot { "enabled" } else { "disabled" },
            ),
        ];
        if gpu.secure_boot {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "⚠ Secure Boot is enabled; the driver module must be signed.",
                Theme::status_style(StatusKind::Warning),
            )));
        }
        self.details.set_lines(lines);
    }

    fn layout(&mut self) {
        self.header.set_width(self.width);
        self.footer.set_width(self.width);
        let rows = if self.height == 0 {
            0
        } else {
            body_height(self.height, &self.header, &self.footer, 0)
        };
        self.details.set_size(self.width, rows);
    }
}

impl StepView for SystemInfoView {
    fn footer_mut(&mut self) -> &mut Footer {
        &mut self.footer
    }

    fn enter(&mut self, selection: &Selection) -> Option<Command> {
        self.gpu = selection.gpu_info.clone();
        self.rebuild();
        None
    }

    fn update(&mut self, msg: Message, keys: &KeyMap) -> Option<Command> {
        if handle_common(&mut self.footer, &msg, keys) {
            return None;
        }
        match msg {
            Message::Key(key) if keys.matches(KeyAction::Enter, &key) => {
                let next = match &self.gpu {
                    Some(gpu) => Message::NavigateToDriverSelection {
                        gpu_info: gpu.clone(),
                    },
                    None => Message::NavigateToError {
                        err: Some(shared_msg("No GPU information available")),
                        failed_step: ViewState::SystemInfo.to_string(),
                    },
                };
                Some(Command::message(next))
            }
            _ => None,
        }
    }

    fn resize(&mut self, width: i32, height: i32) {
        (self.width, self.height) = clamp_size(width, height);
        self.layout();
    }
}

impl Render for SystemInfoView {
    fn render(&self) -> Text<'static> {
        stack(vec![
            self.header.render(),
            self.details.render(),
            self.footer.render(),
        ])
    }
}
