//! GPU Wizard - Main entry point
//!
//! Sets up logging, the terminal and signal handling, then hands control to
//! the wizard's event loop.

use anyhow::Context;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use gpu_wizard::cli::Cli;
use gpu_wizard::demo::SimulatedSystem;
use gpu_wizard::{App, CancelHandle, Program};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::File;
use std::io::stdout;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize file logging; `RUST_LOG` overrides the CLI level
fn init_logger(cli: &Cli) -> anyhow::Result<()> {
    let file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&cli.log_level)
            .with_context(|| format!("Invalid log level '{}'", cli.log_level))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;
    init_logger(&cli)?;
    info!("GPU wizard starting up");
    debug!(?cli, "CLI arguments parsed");

    let profile = match &cli.gpu_profile {
        Some(path) => {
            info!(path = %path.display(), "loading GPU profile");
            SimulatedSystem::load_profile(path)?
        }
        None => SimulatedSystem::default_profile(),
    };
    let system = SimulatedSystem::new(profile)
        .with_failure(cli.fail_at)
        .with_step_delay(cli.step_delay());

    // Ctrl+C normally arrives as a key press in raw mode; the handler covers
    // signals sent from outside the terminal
    let root = CancelHandle::new();
    let app = App::with_parent(env!("CARGO_PKG_VERSION"), &root.signal());
    if let Err(e) = ctrlc::set_handler(move || {
        root.cancel();
    }) {
        warn!("Failed to install signal handler: {}", e);
    }

    let program = Program::new(app)
        .with_collaborator(system)
        .with_tick(cli.tick());

    debug!("Initializing terminal for TUI mode");
    enable_raw_mode().context("Failed to enable raw mode")?;
    crossterm::execute!(stdout(), EnterAlternateScreen)
        .context("Failed to enter alternate screen")?;
    let result = Terminal::new(CrosstermBackend::new(stdout()))
        .context("Failed to create terminal")
        .and_then(|mut terminal| program.run(&mut terminal).map_err(Into::into));

    // Cleanup terminal (always attempt cleanup, even if the wizard failed)
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), LeaveAlternateScreen);

    let (app, mut system) = result.inspect_err(|e| error!("Wizard failed: {:#}", e))?;
    system.wait();

    if app.reboot_requested() {
        info!("reboot requested");
        println!("Reboot required: run `sudo reboot` to load the new driver.");
    }
    info!("GPU wizard exiting");
    Ok(())
}
