//! Domain types shared by the wizard steps
//!
//! The wizard never detects hardware itself; these types describe what the
//! detection collaborator reports and what the user picks along the way.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Wizard step identifier. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(Display, EnumString, EnumIter)]
pub enum ViewState {
    #[default]
    Welcome,
    Detecting,
    #[strum(serialize = "System Info")]
    SystemInfo,
    #[strum(serialize = "Driver Selection")]
    DriverSelection,
    Confirmation,
    Installing,
    Complete,
    Error,
}

/// A driver release the user can pick, e.g. `550` / `Latest`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DriverVersion {
    pub version: String,
    pub label: String,
}

impl DriverVersion {
    pub fn new(version: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            label: label.into(),
        }
    }

    /// Fallback catalogue used when detection reports no recommendations
    pub fn defaults() -> Vec<DriverVersion> {
        vec![
            DriverVersion::new("550", "Latest"),
            DriverVersion::new("535", "Production"),
            DriverVersion::new("470", "Legacy"),
        ]
    }
}

impl std::fmt::Display for DriverVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.label.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{} ({})", self.version, self.label)
        }
    }
}

/// An optional package installed alongside the driver
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentChoice {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub selected: bool,
}

impl ComponentChoice {
    pub fn new(name: impl Into<String>, description: impl Into<String>, selected: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            selected,
        }
    }

    /// Components offered when detection reports none
    pub fn defaults() -> Vec<ComponentChoice> {
        vec![
            ComponentChoice::new("nvidia-utils", "Userspace driver libraries", true),
            ComponentChoice::new("nvidia-settings", "Configuration GUI", true),
            ComponentChoice::new("lib32-nvidia-utils", "32-bit libraries for Steam/Wine", false),
            ComponentChoice::new("cuda", "CUDA toolkit", false),
            ComponentChoice::new("opencl-nvidia", "OpenCL runtime", false),
        ]
    }
}

/// GPU and host information reported by the detection collaborator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GpuInfo {
    pub vendor: String,
    pub model: String,
    #[serde(default)]
    pub pci_id: String,
    #[serde(default)]
    pub vram: String,
    #[serde(default)]
    pub current_driver: Option<String>,
    #[serde(default)]
    pub kernel: String,
    #[serde(default)]
    pub distribution: String,
    #[serde(default)]
    pub secure_boot: bool,
    /// Drivers the detector considers compatible, best first
    #[serde(default)]
    pub drivers: Vec<DriverVersion>,
    /// Optional components offered for this system
    #[serde(default)]
    pub components: Vec<ComponentChoice>,
}

impl GpuInfo {
    /// `vendor model` as shown in headings
    pub fn display_name(&self) -> String {
        match (self.vendor.is_empty(), self.model.is_empty()) {
            (true, true) => "Unknown GPU".to_string(),
            (true, false) => self.model.clone(),
            (false, true) => self.vendor.clone(),
            (false, false) => format!("{} {}", self.vendor, self.model),
        }
    }

    /// Recommended drivers, or the default catalogue when none were reported
    pub fn driver_options(&self) -> Vec<DriverVersion> {
        if self.drivers.is_empty() {
            DriverVersion::defaults()
        } else {
            self.drivers.clone()
        }
    }

    /// Offered components, or the default set when none were reported
    pub fn component_options(&self) -> Vec<ComponentChoice> {
        if self.components.is_empty() {
            ComponentChoice::defaults()
        } else {
            self.components.clone()
        }
    }
}

/// Everything the user has chosen so far
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub gpu_info: Option<GpuInfo>,
    pub driver: Option<DriverVersion>,
    pub components: Vec<ComponentChoice>,
}

/// Footer status categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StatusKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl StatusKind {
    /// Parse a status type name; anything unrecognised is treated as info
    pub fn parse_lenient(name: &str) -> Self {
        name.trim().parse().unwrap_or_default()
    }
}
