//! Messages consumed by the wizard and the commands that produce them
//!
//! A [`Command`] is a deferred unit of work. The runtime runs it off the update
//! path and feeds the single message it yields back into the queue. No order is
//! promised between different in-flight commands.

use crate::error::SharedError;
use crate::types::{ComponentChoice, DriverVersion, GpuInfo, ViewState};
use crossterm::event::KeyEvent;
use std::fmt;
use std::thread;
use std::time::Duration;

/// Every event the state machine understands
#[derive(Debug)]
pub enum Message {
    /// A key press from the terminal
    Key(KeyEvent),
    /// Stop the program
    Quit,
    /// Explicit shutdown request from outside (signal, parent cancellation)
    Shutdown,
    /// An error raised outside a specific step
    Error { err: SharedError },
    /// Jump straight to a step
    Navigate { view: ViewState },
    /// Terminal size became known or changed
    WindowReady { width: u16, height: u16 },
    /// Spinner animation frame for the spinner `id` at generation `tag`
    Tick { id: usize, tag: usize },
    /// Progress bar animation frame for the bar `id` at generation `tag`
    ProgressFrame { id: usize, tag: usize },
    /// Free-form status line from a collaborator
    Status { text: String, is_error: bool },
    /// Installation progress from a collaborator
    Progress { current: u64, total: u64, text: String },
    DetectionComplete { success: bool },
    InstallationComplete { success: bool, text: String },

    // Wizard transitions
    StartDetection,
    NavigateToSystemInfo {
        gpu_info: GpuInfo,
    },
    NavigateToDriverSelection {
        gpu_info: GpuInfo,
    },
    NavigateToConfirmation {
        gpu_info: GpuInfo,
        driver: DriverVersion,
        components: Vec<ComponentChoice>,
    },
    StartInstallation {
        gpu_info: GpuInfo,
        driver: DriverVersion,
        components: Vec<ComponentChoice>,
    },
    NavigateToComplete {
        gpu_info: GpuInfo,
        driver: DriverVersion,
        components: Vec<ComponentChoice>,
    },
    NavigateToError {
        err: Option<SharedError>,
        failed_step: String,
    },
    RetryRequested,
    ErrorExitRequested,
    RebootRequested,
    ExitRequested,
    NavigateBackToSelection,

    /// Several commands folded into one; the runtime runs each of them
    Batch(Vec<Command>),
}

type Thunk = Box<dyn FnOnce() -> Option<Message> + Send + 'static>;

/// Deferred work yielding at most one [`Message`]
pub struct Command {
    thunk: Thunk,
}

impl Command {
    /// Wrap a closure
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Option<Message> + Send + 'static,
    {
        Self { thunk: Box::new(f) }
    }

    /// A command that yields `msg` immediately
    pub fn message(msg: Message) -> Self {
        Self::new(move || Some(msg))
    }

    /// A command that waits `delay` and then yields `msg`
    pub fn after(delay: Duration, msg: Message) -> Self {
        Self::new(move || {
            thread::sleep(delay);
            Some(msg)
        })
    }

    /// A command that yields [`Message::Quit`]
    pub fn quit() -> Self {
        Self::message(Message::Quit)
    }

    /// Ask the terminal for its current size
    pub fn probe_size() -> Self {
        Self::new(|| {
            crossterm::terminal::size()
                .ok()
                .map(|(width, height)| Message::WindowReady { width, height })
        })
    }

    /// Fold optional commands into one.
    ///
    /// Returns `None` when nothing is left and the single command unchanged
    /// when only one is left.
    pub fn batch(cmds: impl IntoIterator<Item = Option<Command>>) -> Option<Command> {
        let mut cmds: Vec<Command> = cmds.into_iter().flatten().collect();
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Self::message(Message::Batch(cmds))),
        }
    }

    /// Run the work and return its message
    pub fn run(self) -> Option<Message> {
        (self.thunk)()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Command(..)")
    }
}
