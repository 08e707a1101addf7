use crate::demo::{DEFAULT_STEP_DELAY, FailAt};
use crate::error::{Result, WizardError};
use crate::runtime::DEFAULT_TICK;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// GPU Wizard - detect your graphics card and install a matching driver
#[derive(Parser, Debug)]
#[command(name = "gpu-wizard")]
#[command(about = "A terminal wizard for detecting GPUs and installing graphics drivers")]
#[command(version)]
pub struct Cli {
    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long, default_value = "gpu-wizard.log")]
    pub log_file: PathBuf,

    /// Log filter, e.g. `info` or `gpu_wizard=debug`.
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Redraw interval in milliseconds when idle
    #[arg(long, default_value_t = DEFAULT_TICK.as_millis() as u64)]
    pub tick_ms: u64,

    /// JSON file describing the GPU to report instead of the built-in profile
    #[arg(long)]
    pub gpu_profile: Option<PathBuf>,

    /// Make the simulated system fail at this stage
    #[arg(long, value_enum)]
    pub fail_at: Option<FailAt>,

    /// Pause between simulated steps in milliseconds
    #[arg(long, default_value_t = DEFAULT_STEP_DELAY.as_millis() as u64)]
    pub step_delay_ms: u64,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Reject values that parse but make no sense
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(WizardError::config("--tick-ms must be greater than zero"));
        }
        if self.log_level.trim().is_empty() {
            return Err(WizardError::config("--log-level must not be empty"));
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}
