//! Application module
//!
//! The top-level model of the wizard: which step is active, terminal size,
//! the user's selection so far and the cancellation handle shared with
//! background work.
//!
//! # Module Structure
//! - `message` - [`Message`] and [`Command`]
//! - Main module - [`App`] and its transition table

mod message;

pub use message::{Command, Message};

use crate::cancel::{CancelHandle, CancelSignal};
use crate::components::{KeyAction, KeyMap, Render};
use crate::error::SharedError;
use crate::types::{ComponentChoice, DriverVersion, GpuInfo, Selection, ViewState};
use crate::ui::{Step, StepContext, StepRegistry};
use crossterm::event::{KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::text::Text;
use tracing::{debug, info};

/// Rendered once the user has asked to leave
pub const GOODBYE: &str = "Thanks for using the GPU driver installer. Goodbye!";

/// Rendered until the terminal size is known
pub const INITIALIZING: &str = "Initializing...";

/// Failed-step label for errors raised outside a step
pub const UNKNOWN_STEP: &str = "Unknown";

/// Main application model
pub struct App {
    current: ViewState,
    width: u16,
    height: u16,
    ready: bool,
    quitting: bool,
    error: Option<SharedError>,
    failed_step: String,
    reboot_requested: bool,
    cancel: CancelHandle,
    keys: KeyMap,
    steps: StepRegistry,
    selection: Selection,
    version: String,
}

impl App {
    /// Create the model with its own root cancellation handle
    pub fn new(version: impl Into<String>) -> Self {
        Self::build(version.into(), CancelHandle::new())
    }

    /// Create the model with cancellation chained to `parent`
    pub fn with_parent(version: impl Into<String>, parent: &CancelSignal) -> Self {
        Self::build(version.into(), CancelHandle::with_parent(parent))
    }

    fn build(version: String, cancel: CancelHandle) -> Self {
        let keys = KeyMap::new();
        let steps = StepRegistry::new(&StepContext {
            keys: &keys,
            version: &version,
            width: 0,
            height: 0,
        });
        Self {
            current: ViewState::Welcome,
            width: 0,
            height: 0,
            ready: false,
            quitting: false,
            error: None,
            failed_step: String::new(),
            reboot_requested: false,
            cancel,
            keys,
            steps,
            selection: Selection::default(),
            version,
        }
    }

    /// Commands to run before the first message: size probe plus whatever
    /// the first step wants to start
    pub fn init(&mut self) -> Vec<Command> {
        info!(version = %self.version, "wizard starting");
        let enter = self.enter_current();
        std::iter::once(Command::probe_size()).chain(enter).collect()
    }

    /// Apply one message. Total over every variant, never panics.
    pub fn update(&mut self, msg: Message) -> Option<Command> {
        if self.quitting {
            debug!(?msg, "ignoring message while quitting");
            return None;
        }

        match msg {
            Message::Key(key) => self.handle_key(key),
            Message::Quit => {
                self.begin_quit();
                None
            }
            Message::Shutdown => {
                info!("shutdown requested");
                self.begin_quit();
                Some(Command::quit())
            }
            Message::Error { err } => {
                self.error = Some(err);
                self.failed_step = UNKNOWN_STEP.to_string();
                self.navigate(ViewState::Error)
            }
            Message::Navigate { view } => self.navigate(view),
            Message::WindowReady { width, height } => {
                debug!(width, height, "window size");
                self.width = width;
                self.height = height;
                self.ready = true;
                self.steps
                    .resize_all(i32::from(width), i32::from(height));
                None
            }
            Message::StartDetection => self.navigate(ViewState::Detecting),
            Message::NavigateToSystemInfo { gpu_info } => {
                self.selection.gpu_info = Some(gpu_info);
                self.navigate(ViewState::SystemInfo)
            }
            Message::NavigateToDriverSelection { gpu_info } => {
                self.selection.gpu_info = Some(gpu_info);
                self.navigate(ViewState::DriverSelection)
            }
            Message::NavigateToConfirmation {
                gpu_info,
                driver,
                components,
            } => {
                self.store_selection(gpu_info, driver, components);
                self.navigate(ViewState::Confirmation)
            }
            Message::NavigateBackToSelection => self.navigate(ViewState::DriverSelection),
            Message::StartInstallation {
                gpu_info,
                driver,
                components,
            } => {
                info!(%driver, "starting installation");
                self.store_selection(gpu_info, driver, components);
                self.navigate(ViewState::Installing)
            }
            Message::NavigateToComplete {
                gpu_info,
                driver,
                components,
            } => {
                self.store_selection(gpu_info, driver, components);
                self.navigate(ViewState::Complete)
            }
            Message::NavigateToError { err, failed_step } => {
                self.error = err;
                self.failed_step = failed_step;
                self.navigate(ViewState::Error)
            }
            Message::RetryRequested => {
                self.clear_error();
                self.navigate(ViewState::Welcome)
            }
            Message::ErrorExitRequested | Message::ExitRequested => {
                self.begin_quit();
                Some(Command::quit())
            }
            Message::RebootRequested => {
                self.reboot_requested = true;
                self.begin_quit();
                Some(Command::quit())
            }
            // The runtime expands batches; hand one back unchanged if it
            // arrives here
            Message::Batch(cmds) => Command::batch(cmds.into_iter().map(Some)),
            other => self.delegate(other),
        }
    }

    /// Plain-text snapshot of the screen
    pub fn view(&self) -> String {
        crate::components::plain(&self.render())
    }

    /// Styled snapshot of the screen
    pub fn render(&self) -> Text<'static> {
        if self.quitting {
            return Text::from(GOODBYE);
        }
        if !self.ready {
            return Text::from(INITIALIZING);
        }
        self.steps
            .get(self.current)
            .map(|step| step.as_view().render())
            .unwrap_or_default()
    }

    pub fn current_view(&self) -> ViewState {
        self.current
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn error(&self) -> Option<&SharedError> {
        self.error.as_ref()
    }

    pub fn failed_step(&self) -> &str {
        &self.failed_step
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether the user chose to reboot on the final step
    pub fn reboot_requested(&self) -> bool {
        self.reboot_requested
    }

    /// Read-only view of the model's cancellation state, for background work
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.signal()
    }

    pub fn keymap(&self) -> &KeyMap {
        &self.keys
    }

    pub fn keymap_mut(&mut self) -> &mut KeyMap {
        &mut self.keys
    }

    /// Whether the step for `view` has been built yet
    pub fn is_instantiated(&self, view: ViewState) -> bool {
        self.steps.contains(view)
    }

    /// Active step, if built
    pub fn active_step(&self) -> Option<&Step> {
        self.steps.get(self.current)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        let capturing = self
            .steps
            .get(self.current)
            .is_some_and(|step| step.as_view().captures_input());

        if self.keys.matches(KeyAction::Back, &key) {
            if self.current == ViewState::Welcome {
                return Some(Command::quit());
            }
            if capturing {
                if let Some(step) = self.steps.get_mut(self.current) {
                    step.as_view_mut().end_input();
                }
            }
            debug!(from = %self.current, "back to welcome");
            self.current = ViewState::Welcome;
            if let Some(step) = self.steps.get_mut(ViewState::Welcome) {
                step.as_view_mut().footer_mut().refresh(&self.keys);
            }
            self.clear_error();
            return None;
        }

        if capturing {
            // Ctrl+C still quits while a step is taking text input
            if key.modifiers.contains(KeyModifiers::CONTROL)
                && self.keys.matches(KeyAction::Quit, &key)
            {
                return Some(Command::quit());
            }
            return self.delegate(Message::Key(key));
        }

        if self.keys.matches(KeyAction::Quit, &key) {
            debug!("quit key");
            return Some(Command::quit());
        }
        self.delegate(Message::Key(key))
    }

    fn delegate(&mut self, msg: Message) -> Option<Command> {
        let ctx = StepContext {
            keys: &self.keys,
            version: &self.version,
            width: self.width,
            height: self.height,
        };
        self.steps
            .get_or_create(self.current, &ctx)
            .as_view_mut()
            .update(msg, &self.keys)
    }

    fn navigate(&mut self, view: ViewState) -> Option<Command> {
        debug!(from = %self.current, to = %view, "navigate");
        self.current = view;
        self.enter_current()
    }

    fn enter_current(&mut self) -> Option<Command> {
        let ctx = StepContext {
            keys: &self.keys,
            version: &self.version,
            width: self.width,
            height: self.height,
        };
        let step = self.steps.get_or_create(self.current, &ctx);
        step.as_view_mut().footer_mut().refresh(&self.keys);
        if let Step::Error(view) = step {
            view.set_failure(self.error.clone(), &self.failed_step);
        }
        step.as_view_mut().enter(&self.selection)
    }

    fn store_selection(
        &mut self,
        gpu_info: GpuInfo,
        driver: DriverVersion,
        components: Vec<ComponentChoice>,
    ) {
        self.selection = Selection {
            gpu_info: Some(gpu_info),
            driver: Some(driver),
            components,
        };
    }

    fn clear_error(&mut self) {
        self.error = None;
        self.failed_step.clear();
    }

    fn begin_quit(&mut self) {
        self.quitting = true;
        if self.cancel.cancel() {
            info!("cancellation triggered");
        }
    }
}
