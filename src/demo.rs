//! Simulated hardware and package manager
//!
//! Stands in for real detection and installation so the wizard can be driven
//! end to end. Work runs on background threads, reports through the message
//! channel and stops early when the cancellation signal fires.

use crate::app::Message;
use crate::cancel::{CancelHandle, CancelSignal};
use crate::error::{Result, WizardError};
use crate::runtime::Collaborator;
use crate::types::{ComponentChoice, DriverVersion, GpuInfo};
use std::path::Path;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use strum::Display;
use tracing::{debug, info, warn};

/// Default pause between simulated steps
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(400);

/// Granularity of cancellation checks while pausing
const CANCEL_POLL: Duration = Duration::from_millis(10);

/// Stage at which the simulation reports failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, clap::ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum FailAt {
    Detection,
    Installation,
}

pub struct SimulatedSystem {
    profile: GpuInfo,
    fail_at: Option<FailAt>,
    step_delay: Duration,
    workers: Vec<JoinHandle<()>>,
    /// Cancels the run started last
    run: Option<CancelHandle>,
}

impl Default for SimulatedSystem {
    fn default() -> Self {
        Self::new(Self::default_profile())
    }
}

impl SimulatedSystem {
    pub fn new(profile: GpuInfo) -> Self {
        Self {
            profile,
            fail_at: None,
            step_delay: DEFAULT_STEP_DELAY,
            workers: Vec::new(),
            run: None,
        }
    }

    pub fn with_failure(mut self, fail_at: Option<FailAt>) -> Self {
        self.fail_at = fail_at;
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn profile(&self) -> &GpuInfo {
        &self.profile
    }

    /// The machine reported when no profile file is given
    pub fn default_profile() -> GpuInfo {
        GpuInfo {
            vendor: "NVIDIA".into(),
            model: "GeForce RTX 3070".into(),
            pci_id: "10de:2484".into(),
            vram: "8 GB".into(),
            current_driver: Some("nouveau".into()),
            kernel: "6.9.7-arch1-1".into(),
            distribution: "Arch Linux".into(),
            secure_boot: false,
            drivers: DriverVersion::defaults(),
            components: ComponentChoice::defaults(),
        }
    }

    /// Read a GPU profile from a JSON file
    pub fn load_profile(path: &Path) -> Result<GpuInfo> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            WizardError::config(format!("Failed to read GPU profile {}: {}", path.display(), e))
        })?;
        let profile: GpuInfo = serde_json::from_str(&raw)?;
        if profile.vendor.is_empty() && profile.model.is_empty() {
            return Err(WizardError::config(format!(
                "GPU profile {} names neither vendor nor model",
                path.display()
            )));
        }
        Ok(profile)
    }

    /// Wait for all background work started so far
    pub fn wait(&mut self) {
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("simulation worker panicked");
            }
        }
    }

    /// Stop the previous run and hand out a signal for the next one
    fn supersede(&mut self, parent: &CancelSignal) -> CancelSignal {
        if let Some(previous) = self.run.take() {
            if previous.cancel() {
                debug!("superseded previous simulation run");
            }
        }
        let run = parent.child();
        let signal = run.signal();
        self.run = Some(run);
        signal
    }

    fn start_detection(&mut self, tx: Sender<Message>, cancel: CancelSignal) {
        let profile = self.profile.clone();
        let fail = self.fail_at == Some(FailAt::Detection);
        let delay = self.step_delay;
        info!("starting simulated detection");
        self.workers.push(thread::spawn(move || {
            match detect(&profile, fail, delay, &tx, &cancel) {
                Ok(()) => debug!("detection worker finished"),
                Err(e) => debug!(error = %e, "detection worker stopped"),
            }
        }));
    }

    fn start_installation(
        &mut self,
        driver: DriverVersion,
        components: Vec<ComponentChoice>,
        tx: Sender<Message>,
        cancel: CancelSignal,
    ) {
        let fail = self.fail_at == Some(FailAt::Installation);
        let delay = self.step_delay;
        info!(%driver, components = components.len(), "starting simulated installation");
        self.workers.push(thread::spawn(move || {
            match install(&driver, &components, fail, delay, &tx, &cancel) {
                Ok(()) => debug!("installation worker finished"),
                Err(e) => debug!(error = %e, "installation worker stopped"),
            }
        }));
    }
}

impl Collaborator for SimulatedSystem {
    fn observe(&mut self, msg: &Message, tx: &Sender<Message>, cancel: &CancelSignal) {
        match msg {
            Message::StartDetection => {
                let run = self.supersede(cancel);
                self.start_detection(tx.clone(), run);
            }
            Message::StartInstallation {
                driver, components, ..
            } => {
                let run = self.supersede(cancel);
                self.start_installation(driver.clone(), components.clone(), tx.clone(), run);
            }
            _ => {}
        }
    }
}

/// Sleep for `delay`, bailing out as soon as `cancel` fires
fn pause(delay: Duration, cancel: &CancelSignal) -> Result<()> {
    let deadline = Instant::now() + delay;
    loop {
        if cancel.is_cancelled() {
            return Err(WizardError::Cancelled);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }
        thread::sleep(CANCEL_POLL.min(deadline - now));
    }
}

/// Forward `msg` unless the run has been cancelled
fn send(tx: &Sender<Message>, cancel: &CancelSignal, msg: Message) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(WizardError::Cancelled);
    }
    tx.send(msg)
        .map_err(|_| WizardError::runtime("message queue closed"))
}

fn status(
    tx: &Sender<Message>,
    cancel: &CancelSignal,
    text: impl Into<String>,
    is_error: bool,
) -> Result<()> {
    send(
        tx,
        cancel,
        Message::Status {
            text: text.into(),
            is_error,
        },
    )
}

/// Walk `steps`, reporting each as status and progress
fn report_steps(
    steps: &[String],
    delay: Duration,
    tx: &Sender<Message>,
    cancel: &CancelSignal,
) -> Result<()> {
    let total = steps.len() as u64;
    for (i, step) in steps.iter().enumerate() {
        pause(delay, cancel)?;
        status(tx, cancel, step.clone(), false)?;
        send(
            tx,
            cancel,
            Message::Progress {
                current: i as u64 + 1,
                total,
                text: step.clone(),
            },
        )?;
    }
    Ok(())
}

fn detect(
    profile: &GpuInfo,
    fail: bool,
    delay: Duration,
    tx: &Sender<Message>,
    cancel: &CancelSignal,
) -> Result<()> {
    let steps = [
        "Scanning PCI bus".to_string(),
        "Reading GPU identifiers".to_string(),
        "Checking loaded kernel modules".to_string(),
        "Checking Secure Boot state".to_string(),
    ];
    report_steps(&steps, delay, tx, cancel)?;

    if fail {
        status(tx, cancel, "No supported GPU found", true)?;
        return send(tx, cancel, Message::DetectionComplete { success: false });
    }

    status(tx, cancel, format!("Found {}", profile.display_name()), false)?;
    send(tx, cancel, Message::DetectionComplete { success: true })?;
    pause(delay, cancel)?;
    send(
        tx,
        cancel,
        Message::NavigateToSystemInfo {
            gpu_info: profile.clone(),
        },
    )
}

fn install(
    driver: &DriverVersion,
    components: &[ComponentChoice],
    fail: bool,
    delay: Duration,
    tx: &Sender<Message>,
    cancel: &CancelSignal,
) -> Result<()> {
    let mut steps = vec![
        "Resolving packages".to_string(),
        format!("Downloading nvidia-dkms {}", driver.version),
    ];
    steps.extend(
        components
            .iter()
            .map(|c| format!("Installing {}", c.name)),
    );
    steps.push("Building kernel module".to_string());

    if fail {
        // Fail while building the module, after the downloads succeeded
        let built = steps.len() - 1;
        report_steps(&steps[..built], delay, tx, cancel)?;
        pause(delay, cancel)?;
        status(tx, cancel, "dkms: module build failed", true)?;
        return send(
            tx,
            cancel,
            Message::InstallationComplete {
                success: false,
                text: "Kernel module build failed".into(),
            },
        );
    }

    steps.push("Regenerating initramfs".to_string());
    report_steps(&steps, delay, tx, cancel)?;
    send(
        tx,
        cancel,
        Message::InstallationComplete {
            success: true,
            text: format!("Driver {driver} installed"),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelHandle;
    use std::io::Write;
    use std::sync::mpsc;

    fn drain(rx: &mpsc::Receiver<Message>) -> Vec<Message> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_detection_reports_progress_then_gpu() {
        let mut sim = SimulatedSystem::default().with_step_delay(Duration::ZERO);
        let (tx, rx) = mpsc::channel();
        let cancel = CancelHandle::new();
        sim.observe(&Message::StartDetection, &tx, &cancel.signal());
        sim.wait();

        let msgs = drain(&rx);
        assert!(msgs.iter().any(|m| matches!(m, Message::Progress { current: 4, total: 4, .. })));
        assert!(msgs.iter().any(|m| matches!(m, Message::DetectionComplete { success: true })));
        match msgs.last() {
            Some(Message::NavigateToSystemInfo { gpu_info }) => {
                assert_eq!(gpu_info.model, "GeForce RTX 3070");
            }
            other => panic!("unexpected last message {:?}", other),
        }
    }

    #[test]
    fn test_detection_failure() {
        let mut sim = SimulatedSystem::default()
            .with_step_delay(Duration::ZERO)
            .with_failure(Some(FailAt::Detection));
        let (tx, rx) = mpsc::channel();
        let cancel = CancelHandle::new();
        sim.observe(&Message::StartDetection, &tx, &cancel.signal());
        sim.wait();

        let msgs = drain(&rx);
        assert!(matches!(msgs.last(), Some(Message::DetectionComplete { success: false })));
        assert!(!msgs.iter().any(|m| matches!(m, Message::NavigateToSystemInfo { .. })));
    }

    #[test]
    fn test_installation_covers_components() {
        let mut sim = SimulatedSystem::default().with_step_delay(Duration::ZERO);
        let (tx, rx) = mpsc::channel();
        let cancel = CancelHandle::new();
        let msg = Message::StartInstallation {
            gpu_info: SimulatedSystem::default_profile(),
            driver: DriverVersion::new("550", "Latest"),
            components: vec![ComponentChoice::new("cuda", "CUDA toolkit", true)],
        };
        sim.observe(&msg, &tx, &cancel.signal());
        sim.wait();

        let msgs = drain(&rx);
        assert!(msgs.iter().any(
            |m| matches!(m, Message::Status { text, .. } if text == "Installing cuda")
        ));
        match msgs.last() {
            Some(Message::InstallationComplete { success, text }) => {
                assert!(*success);
                assert_eq!(text, "Driver 550 (Latest) installed");
            }
            other => panic!("unexpected last message {:?}", other),
        }
    }

    #[test]
    fn test_installation_failure() {
        let mut sim = SimulatedSystem::default()
            .with_step_delay(Duration::ZERO)
            .with_failure(Some(FailAt::Installation));
        let (tx, rx) = mpsc::channel();
        let cancel = CancelHandle::new();
        let msg = Message::StartInstallation {
            gpu_info: GpuInfo::default(),
            driver: DriverVersion::new("535", "Production"),
            components: Vec::new(),
        };
        sim.observe(&msg, &tx, &cancel.signal());
        sim.wait();

        match drain(&rx).last() {
            Some(Message::InstallationComplete { success, text }) => {
                assert!(!*success);
                assert_eq!(text, "Kernel module build failed");
            }
            other => panic!("unexpected last message {:?}", other),
        }
    }

    #[test]
    fn test_cancelled_work_sends_nothing() {
        let mut sim = SimulatedSystem::default();
        let (tx, rx) = mpsc::channel();
        let cancel = CancelHandle::new();
        cancel.cancel();
        sim.observe(&Message::StartDetection, &tx, &cancel.signal());
        sim.wait();
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_new_run_stops_the_previous_one() {
        let mut sim = SimulatedSystem::default().with_step_delay(Duration::from_millis(100));
        let (tx, rx) = mpsc::channel();
        let cancel = CancelHandle::new();
        let start = |version: &str| Message::StartInstallation {
            gpu_info: SimulatedSystem::default_profile(),
            driver: DriverVersion::new(version, "test"),
            components: Vec::new(),
        };
        sim.observe(&start("470"), &tx, &cancel.signal());
        sim.observe(&start("550"), &tx, &cancel.signal());
        sim.wait();

        let msgs = drain(&rx);
        assert!(!msgs.iter().any(
            |m| matches!(m, Message::Status { text, .. } if text.contains("470"))
        ));
        let completions: Vec<_> = msgs
            .iter()
            .filter_map(|m| match m {
                Message::InstallationComplete { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(completions, vec!["Driver 550 (test) installed"]);
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn test_unrelated_messages_start_nothing() {
        let mut sim = SimulatedSystem::default();
        let (tx, rx) = mpsc::channel();
        let cancel = CancelHandle::new();
        sim.observe(&Message::RetryRequested, &tx, &cancel.signal());
        sim.wait();
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_load_profile() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"vendor":"AMD","model":"Radeon RX 7900","secure_boot":true}}"#
        )
        .unwrap();
        let profile = SimulatedSystem::load_profile(file.path()).unwrap();
        assert_eq!(profile.display_name(), "AMD Radeon RX 7900");
        assert!(profile.secure_boot);
        assert!(profile.drivers.is_empty());
    }

    #[test]
    fn test_load_profile_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            SimulatedSystem::load_profile(&missing),
            Err(WizardError::Config(_))
        ));

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        assert!(matches!(
            SimulatedSystem::load_profile(bad.path()),
            Err(WizardError::Json(_))
        ));

        let mut empty = tempfile::NamedTempFile::new().unwrap();
        write!(empty, r#"{{"vendor":"","model":""}}"#).unwrap();
        assert!(matches!(
            SimulatedSystem::load_profile(empty.path()),
            Err(WizardError::Config(_))
        ));
    }
}
