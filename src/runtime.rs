//! Event loop
//!
//! [`Program`] owns the [`App`] and a message channel. Commands run on their
//! own threads and post their message back; terminal input is read on a
//! separate thread. Everything that touches the model happens on the thread
//! calling [`Program::run`].

use crate::app::{App, Command, Message};
use crate::cancel::CancelSignal;
use crate::error::Result;
use crossterm::event::{self, Event};
use ratatui::backend::Backend;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default redraw interval when no messages arrive
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// How long the input thread waits for an event before checking cancellation
const INPUT_POLL: Duration = Duration::from_millis(50);

/// External work driven by wizard messages (hardware probing, package
/// installation). Sees every message before the model does.
pub trait Collaborator {
    fn observe(&mut self, msg: &Message, tx: &Sender<Message>, cancel: &CancelSignal);
}

/// Collaborator that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCollaborator;

impl Collaborator for NoCollaborator {
    fn observe(&mut self, _msg: &Message, _tx: &Sender<Message>, _cancel: &CancelSignal) {}
}

/// Runs commands off the update path
#[derive(Debug, Clone)]
pub struct CommandRunner {
    tx: Sender<Message>,
}

impl CommandRunner {
    pub fn new(tx: Sender<Message>) -> Self {
        Self { tx }
    }

    /// Run `cmd` on its own thread, expanding batches into more threads
    pub fn spawn(&self, cmd: Command) -> JoinHandle<()> {
        let runner = self.clone();
        thread::spawn(move || match cmd.run() {
            Some(Message::Batch(cmds)) => {
                for cmd in cmds {
                    runner.spawn(cmd);
                }
            }
            Some(msg) => {
                // The receiver is gone once the program has exited
                let _ = runner.tx.send(msg);
            }
            None => {}
        })
    }
}

pub struct Program<C: Collaborator = NoCollaborator> {
    app: App,
    tx: Sender<Message>,
    rx: Receiver<Message>,
    runner: CommandRunner,
    collaborator: C,
    read_input: bool,
    tick: Duration,
}

impl Program<NoCollaborator> {
    pub fn new(app: App) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            app,
            runner: CommandRunner::new(tx.clone()),
            tx,
            rx,
            collaborator: NoCollaborator,
            read_input: true,
            tick: DEFAULT_TICK,
        }
    }
}

impl<C: Collaborator> Program<C> {
    /// Swap in the collaborator that performs the real work
    pub fn with_collaborator<D: Collaborator>(self, collaborator: D) -> Program<D> {
        Program {
            app: self.app,
            tx: self.tx,
            rx: self.rx,
            runner: self.runner,
            collaborator,
            read_input: self.read_input,
            tick: self.tick,
        }
    }

    /// Do not read the terminal; messages arrive only through [`Program::sender`]
    pub fn without_input(mut self) -> Self {
        self.read_input = false;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// A handle for injecting messages from outside
    pub fn sender(&self) -> Sender<Message> {
        self.tx.clone()
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn collaborator(&self) -> &C {
        &self.collaborator
    }

    /// Drive the wizard until it quits and hand back the final model
    /// and collaborator
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<(App, C)> {
        info!("starting main loop");
        let cancel = self.app.cancel_signal();
        let input = self
            .read_input
            .then(|| spawn_input_reader(self.tx.clone(), cancel.clone()));

        for cmd in self.app.init() {
            self.runner.spawn(cmd);
        }

        loop {
            self.draw(terminal)?;

            match self.rx.recv_timeout(self.tick) {
                Ok(msg) => self.dispatch(msg),
                Err(RecvTimeoutError::Timeout) => {}
                // We hold a sender, so this only happens if it was dropped
                Err(RecvTimeoutError::Disconnected) => break,
            }
            while !self.app.is_quitting() {
                match self.rx.try_recv() {
                    Ok(msg) => self.dispatch(msg),
                    Err(_) => break,
                }
            }

            if cancel.is_cancelled() && !self.app.is_quitting() {
                self.dispatch(Message::Shutdown);
            }
            if self.app.is_quitting() {
                self.draw(terminal)?;
                break;
            }
        }

        if let Some(handle) = input {
            if handle.join().is_err() {
                warn!("input thread panicked");
            }
        }
        info!("main loop finished");
        Ok((self.app, self.collaborator))
    }

    fn dispatch(&mut self, msg: Message) {
        if let Message::Batch(cmds) = msg {
            for cmd in cmds {
                self.runner.spawn(cmd);
            }
            return;
        }
        let cancel = self.app.cancel_signal();
        self.collaborator.observe(&msg, &self.tx, &cancel);
        if let Some(cmd) = self.app.update(msg) {
            self.runner.spawn(cmd);
        }
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal.draw(|frame| {
            frame.render_widget(Paragraph::new(self.app.render()), frame.area());
        })?;
        Ok(())
    }
}

/// Forward key presses and resizes until `cancel` fires
fn spawn_input_reader(tx: Sender<Message>, cancel: CancelSignal) -> JoinHandle<()> {
    thread::spawn(move || {
        while !cancel.is_cancelled() {
            let ready = match event::poll(INPUT_POLL) {
                Ok(ready) => ready,
                Err(e) => {
                    warn!(error = %e, "input polling failed");
                    return;
                }
            };
            if !ready {
                continue;
            }
            let msg = match event::read() {
                Ok(Event::Key(key)) => Message::Key(key),
                Ok(Event::Resize(width, height)) => Message::WindowReady { width, height },
                Ok(_) => continue,
                Err(e) => {
                    warn!(error = %e, "reading input failed");
                    return;
                }
            };
            if tx.send(msg).is_err() {
                return;
            }
        }
        debug!("input reader stopped");
    })
}
