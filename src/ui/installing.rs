//! Installing step: spinner, progress bar and output log

use super::{
    StepContext, StepView, body_height, clamp_size, handle_common, stack, step_footer,
    step_header,
};
use crate::app::{Command, Message};
use crate::components::{Footer, Header, KeyMap, Panel, ProgressBar, Render, Spinner};
use crate::error::shared_msg;
use crate::theme::{Styles, Theme};
use crate::types::{Selection, StatusKind, ViewState};
use ratatui::text::Text;
use tracing::debug;

/// Failed-step label reported when installation fails
pub const INSTALLATION_STEP: &str = "Installation";

pub struct InstallingView {
    header: Header,
    spinner: Spinner,
    progress: ProgressBar,
    output: Panel,
    footer: Footer,
    plan: Selection,
    finished: bool,
    width: u16,
    height: u16,
}

impl InstallingView {
    pub fn new(ctx: &StepContext<'_>) -> Self {
        Self {
            header: step_header(ViewState::Installing, "Installing the driver", ctx),
            spinner: Spinner::new("Preparing installation..."),
            progress: ProgressBar::new(),
            output: Panel::new("Output"),
            footer: step_footer(ctx.keys, &[]),
            plan: Selection::default(),
            finished: false,
            width: ctx.width,
            height: ctx.height,
        }
    }

    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }

    pub fn progress(&self) -> &ProgressBar {
        &self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn layout(&mut self) {
        self.header.set_width(self.width);
        self.footer.set_width(self.width);
        // progress bar sits on a single row with a label below, leave room
        // for the percentage suffix
        self.progress.set_width(self.width.saturating_sub(6).min(60));
        let rows = if self.height == 0 {
            0
        } else {
            body_height(self.height, &self.header, &self.footer, 6)
        };
        self.output.set_size(self.width, rows);
    }

    fn complete(&mut self, success: bool, text: String) -> Command {
        self.finished = true;
        self.spinner.hide();
        if success {
            debug!("installation reported success");
            let plan = self.plan.clone();
            Command::message(Message::NavigateToComplete {
                gpu_info: plan.gpu_info.unwrap_or_default(),
                driver: plan.driver.unwrap_or_default(),
                components: plan.components,
            })
        } else {
            debug!(%text, "installation reported failure");
            let message = if text.is_empty() {
                "Installation failed".to_string()
            } else {
                text
            };
            self.footer.set_status(message.clone(), StatusKind::Error);
            Command::message(Message::NavigateToError {
                err: Some(shared_msg(message)),
                failed_step: INSTALLATION_STEP.to_string(),
            })
        }
    }
}

impl StepView for InstallingView {
    fn footer_mut(&mut self) -> &mut Footer {
        &mut self.footer
    }

    fn enter(&mut self, selection: &Selection) -> Option<Command> {
        self.plan = selection.clone();
        self.finished = false;
        self.progress.reset();
        self.output.clear();
        self.footer.clear_status();
        let driver = self
            .plan
            .driver
            .as_ref()
            .map(|d| d.version.clone())
            .unwrap_or_default();
        self.spinner
            .set_message(format!("Installing driver {driver}").trim_end().to_string());
        Some(self.spinner.show())
    }

    fn update(&mut self, msg: Message, keys: &KeyMap) -> Option<Command> {
        if let Message::Status { text, is_error } = &msg {
            let style = if *is_error {
                Theme::status_style(StatusKind::Error)
            } else {
                Styles::text_secondary()
            };
            self.output.append_styled(text.clone(), style);
        }
        if handle_common(&mut self.footer, &msg, keys) {
            return None;
        }

        match msg {
            Message::Tick { .. } => self.spinner.update(&msg),
            Message::ProgressFrame { .. } => self.progress.update(&msg),
            Message::Progress {
                current,
                total,
                text,
            } => {
                if !text.is_empty() {
                    self.progress.set_label(text);
                }
                Some(self.progress.set_progress(current, total))
            }
            // only the first report of a run counts
            Message::InstallationComplete { .. } if self.finished => None,
            Message::InstallationComplete { success, text } => {
                Some(self.complete(success, text))
            }
            _ => None,
        }
    }

    fn resize(&mut self, width: i32, height: i32) {
        (self.width, self.height) = clamp_size(width, height);
        self.layout();
    }
}

impl Render for InstallingView {
    fn render(&self) -> Text<'static> {
        let output = if self.output.line_count() == 0 {
            Text::default()
        } else {
            self.output.render()
        };
        stack(vec![
            self.header.render(),
            self.spinner.render(),
            self.progress.render(),
            output,
            self.footer.render(),
        ])
    }
}
