//! Detecting step: spinner and log while the collaborator probes hardware

use super::{
    StepContext, StepView, body_height, clamp_size, handle_common, stack, step_footer,
    step_header,
};
use crate::app::{Command, Message};
use crate::components::{Footer, Header, KeyMap, Panel, Render, Spinner};
use crate::error::shared_msg;
use crate::theme::{Styles, Theme};
use crate::types::{Selection, StatusKind, ViewState};
use ratatui::text::Text;
use tracing::debug;

/// Failed-step label reported when detection fails
pub const DETECTION_STEP: &str = "GPU Detection";

pub struct DetectingView {
    header: Header,
    spinner: Spinner,
    log: Panel,
    footer: Footer,
    finished: bool,
    width: u16,
    height: u16,
}

impl DetectingView {
    pub fn new(ctx: &StepContext<'_>) -> Self {
        Self {
            header: step_header(ViewState::Detecting, "Probing graphics hardware", ctx),
            spinner: Spinner::new("Detecting GPU hardware..."),
            log: Panel::new("Detection log"),
            footer: step_footer(ctx.keys, &[]),
            finished: false,
            width: ctx.width,
            height: ctx.height,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }

    fn layout(&mut self) {
        self.header.set_width(self.width);
        self.footer.set_width(self.width);
        let rows = body_height(self.height, &self.header, &self.footer, 2);
        if self.height == 0 {
            self.log.set_size(self.width, 0);
        } else {
            self.log.set_size(self.width, rows);
        }
    }
}

impl StepView for DetectingView {
    fn footer_mut(&mut self) -> &mut Footer {
        &mut self.footer
    }

    fn enter(&mut self, _selection: &Selection) -> Option<Command> {
        self.finished = false;
        self.log.clear();
        self.footer.clear_status();
        self.spinner.set_message("Detecting GPU hardware...");
        Some(self.spinner.show())
    }

    fn update(&mut self, msg: Message, keys: &KeyMap) -> Option<Command> {
        if let Message::Status { text, is_error } = &msg {
            let style = if *is_error {
                Theme::status_style(StatusKind::Error)
            } else {
                Styles::text_secondary()
            };
            self.log.append_styled(text.clone(), style);
        }
        if handle_common(&mut self.footer, &msg, keys) {
            return None;
        }

        match msg {
            Message::Tick { .. } => self.spinner.update(&msg),
            Message::Progress {
                current,
                total,
                text,
            } => {
                if total > 0 {
                    self.spinner
                        .set_message(format!("{text} ({current}/{total})"));
                } else {
                    self.spinner.set_message(text);
                }
                None
            }
            Message::DetectionComplete { .. } if self.finished => None,
            Message::DetectionComplete { success } => {
                self.finished = true;
                self.spinner.hide();
                if success {
                    debug!("detection reported success");
                    self.footer
                        .set_status("Detection complete", StatusKind::Success);
                    None
                } else {
                    debug!("detection reported failure");
                    self.footer.set_status("Detection failed", StatusKind::Error);
                    Some(Command::message(Message::NavigateToError {
                        err: Some(shared_msg("GPU detection failed")),
                        failed_step: DETECTION_STEP.to_string(),
                    }))
                }
            }
            _ => None,
        }
    }

    fn resize(&mut self, width: i32, height: i32) {
        (self.width, self.height) = clamp_size(width, height);
        self.layout();
    }
}

impl Render for DetectingView {
    fn render(&self) -> Text<'static> {
        let log = if self.log.line_count() == 0 {
            Text::default()
        } else {
            self.log.render()
        };
        stack(vec![
            self.header.render(),
            self.spinner.render(),
            log,
            self.footer.render(),
        ])
    }
}
