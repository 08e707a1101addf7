//! GPU Wizard Library
//!
//! A step-by-step terminal wizard that detects the graphics card, lets the
//! user pick a driver and components, and drives the installation.

pub mod app;
pub mod cancel;
pub mod cli;
pub mod components;
pub mod demo;
pub mod error;
pub mod runtime;
pub mod theme;
pub mod types;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, Command, Message};
pub use cancel::{CancelHandle, CancelSignal};
pub use error::{Result, SharedError, WizardError};
pub use runtime::{Collaborator, CommandRunner, NoCollaborator, Program};
pub use types::{ComponentChoice, DriverVersion, GpuInfo, Selection, StatusKind, ViewState};
