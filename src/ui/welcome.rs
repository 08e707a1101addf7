//! Welcome step: explains what the wizard will do

use super::{StepContext, StepView, clamp_size, handle_common, stack, step_footer, step_header};
use crate::app::{Command, Message};
use crate::components::{Footer, Header, KeyAction, KeyMap, Panel, Render};
use crate::theme::Styles;
use crate::types::ViewState;
use ratatui::text::Text;

pub struct WelcomeView {
    header: Header,
    intro: Panel,
    footer: Footer,
}

impl WelcomeView {
    pub fn new(ctx: &StepContext<'_>) -> Self {
        let mut intro = Panel::new("Welcome");
        intro.append("This wizard installs the proprietary graphics driver for your GPU.");
        intro.append("");
        intro.append("It will:");
        intro.append_styled("  • detect your graphics hardware", Styles::text_secondary());
        intro.append_styled("  • recommend a compatible driver", Styles::text_secondary());
        intro.append_styled("  • install the driver and the components you choose", Styles::text_secondary());
        intro.append("");
        intro.append("Press Enter to start hardware detection.");

        Self {
            header: step_header(ViewState::Welcome, "Let's get your GPU set up", ctx),
            intro,
            footer: step_footer(ctx.keys, &[KeyAction::Enter]),
        }
    }
}

impl StepView for WelcomeView {
    fn footer_mut(&mut self) -> &mut Footer {
        &mut self.footer
    }

    fn update(&mut self, msg: Message, keys: &KeyMap) -> Option<Command> {
        if handle_common(&mut self.footer, &msg, keys) {
            return None;
        }
        match msg {
            Message::Key(key) if keys.matches(KeyAction::Enter, &key) => {
                Some(Command::message(Message::StartDetection))
            }
            _ => None,
        }
    }

    fn resize(&mut self, width: i32, height: i32) {
        let (width, _) = clamp_size(width, height);
        self.header.set_width(width);
        self.footer.set_width(width);
        self.intro.set_size(width, 0);
    }
}

impl Render for WelcomeView {
    fn render(&self) -> Text<'static> {
        stack(vec![
            self.header.render(),
            self.intro.render(),
            self.footer.render(),
        ])
    }
}
