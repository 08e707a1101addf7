//! Wizard step views
//!
//! Each step is its own component with local state. The [`StepRegistry`]
//! builds a step the first time it is visited and keeps it afterwards, so
//! cursor positions and focus survive navigating away and back.
//!
//! # Module Structure
//! - `welcome`, `detecting`, `system_info`, `driver_selection`,
//!   `confirmation`, `installing`, `complete`, `error` - one file per step
//! - Main module - [`StepView`] trait, [`Step`] tagged union and registry

mod complete;
mod confirmation;
mod detecting;
mod driver_selection;
mod error;
mod installing;
mod system_info;
mod welcome;

pub use complete::CompleteView;
pub use confirmation::ConfirmationView;
pub use detecting::DetectingView;
pub use driver_selection::{DriverSelectionView, SelectionFocus};
pub use error::ErrorView;
pub use installing::InstallingView;
pub use system_info::SystemInfoView;
pub use welcome::WelcomeView;

use crate::app::{Command, Message};
use crate::components::{Footer, Header, KeyAction, KeyMap, Render, clamp_dim};
use crate::types::{Selection, StatusKind, ViewState};
use ratatui::text::{Line, Text};
use std::collections::BTreeMap;

/// Title shown in every step header
pub const APP_TITLE: &str = "GPU Driver Installer";

/// Steps shown in the header progress indicator
const WIZARD_STEPS: usize = 7;

/// Contract shared by all wizard steps
pub trait StepView: Render {
    /// Handle a message delegated by the application model
    fn update(&mut self, msg: Message, keys: &KeyMap) -> Option<Command>;

    /// New terminal size; negative values are treated as zero
    fn resize(&mut self, width: i32, height: i32);

    /// Called every time the step becomes the active one
    fn enter(&mut self, _selection: &Selection) -> Option<Command> {
        None
    }

    /// Whether the step is consuming raw text input (global keys are
    /// suspended while this is true)
    fn captures_input(&self) -> bool {
        false
    }

    /// Drop any text input in progress
    fn end_input(&mut self) {}

    /// The step's footer, refreshed from the key map on every entry
    fn footer_mut(&mut self) -> &mut Footer;
}

/// Construction parameters for a step
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub keys: &'a KeyMap,
    pub version: &'a str,
    pub width: u16,
    pub height: u16,
}

/// One instantiated step, tagged by its [`ViewState`]
pub enum Step {
    Welcome(WelcomeView),
    Detecting(DetectingView),
    SystemInfo(SystemInfoView),
    DriverSelection(DriverSelectionView),
    Confirmation(ConfirmationView),
    Installing(InstallingView),
    Complete(CompleteView),
    Error(ErrorView),
}

impl Step {
    /// Build the step for `state`, already sized to the context
    pub fn new(state: ViewState, ctx: &StepContext<'_>) -> Self {
        let mut step = match state {
            ViewState::Welcome => Step::Welcome(WelcomeView::new(ctx)),
            ViewState::Detecting => Step::Detecting(DetectingView::new(ctx)),
            ViewState::SystemInfo => Step::SystemInfo(SystemInfoView::new(ctx)),
            ViewState::DriverSelection => Step::DriverSelection(DriverSelectionView::new(ctx)),
            ViewState::Confirmation => Step::Confirmation(ConfirmationView::new(ctx)),
            ViewState::Installing => Step::Installing(InstallingView::new(ctx)),
            ViewState::Complete => Step::Complete(CompleteView::new(ctx)),
            ViewState::Error => Step::Error(ErrorView::new(ctx)),
        };
        step.as_view_mut()
            .resize(i32::from(ctx.width), i32::from(ctx.height));
        step
    }

    pub fn state(&self) -> ViewState {
        match self {
            Step::Welcome(_) => ViewState::Welcome,
            Step::Detecting(_) => ViewState::Detecting,
            Step::SystemInfo(_) => ViewState::SystemInfo,
            Step::DriverSelection(_) => ViewState::DriverSelection,
            Step::Confirmation(_) => ViewState::Confirmation,
            Step::Installing(_) => ViewState::Installing,
            Step::Complete(_) => ViewState::Complete,
            Step::Error(_) => ViewState::Error,
        }
    }

    pub fn as_view(&self) -> &dyn StepView {
        match self {
            Step::Welcome(v) => v,
            Step::Detecting(v) => v,
            Step::SystemInfo(v) => v,
            Step::DriverSelection(v) => v,
            Step::Confirmation(v) => v,
            Step::Installing(v) => v,
            Step::Complete(v) => v,
            Step::Error(v) => v,
        }
    }

    pub fn as_view_mut(&mut self) -> &mut dyn StepView {
        match self {
            Step::Welcome(v) => v,
            Step::Detecting(v) => v,
            Step::SystemInfo(v) => v,
            Step::DriverSelection(v) => v,
            Step::Confirmation(v) => v,
            Step::Installing(v) => v,
            Step::Complete(v) => v,
            Step::Error(v) => v,
        }
    }
}

/// Lazily populated map from step tag to step state
pub struct StepRegistry {
    steps: BTreeMap<ViewState, Step>,
}

impl StepRegistry {
    /// Registry with only the Welcome step built
    pub fn new(ctx: &StepContext<'_>) -> Self {
        let mut steps = BTreeMap::new();
        steps.insert(ViewState::Welcome, Step::new(ViewState::Welcome, ctx));
        Self { steps }
    }

    pub fn contains(&self, state: ViewState) -> bool {
        self.steps.contains_key(&state)
    }

    /// Tags of all steps built so far
    pub fn instantiated(&self) -> impl Iterator<Item = ViewState> + '_ {
        self.steps.keys().copied()
    }

    pub fn get(&self, state: ViewState) -> Option<&Step> {
        self.steps.get(&state)
    }

    pub fn get_mut(&mut self, state: ViewState) -> Option<&mut Step> {
        self.steps.get_mut(&state)
    }

    /// The step for `state`, building it on first use
    pub fn get_or_create(&mut self, state: ViewState, ctx: &StepContext<'_>) -> &mut Step {
        self.steps
            .entry(state)
            .or_insert_with(|| Step::new(state, ctx))
    }

    /// Push a new size to every built step, active or not
    pub fn resize_all(&mut self, width: i32, height: i32) {
        for step in self.steps.values_mut() {
            step.as_view_mut().resize(width, height);
        }
    }
}

// ============================================================================
// Shared layout helpers
// ============================================================================

/// 1-based position of a step in the header indicator
pub fn step_position(state: ViewState) -> Option<usize> {
    match state {
        ViewState::Welcome => Some(1),
        ViewState::Detecting => Some(2),
        ViewState::SystemInfo => Some(3),
        ViewState::DriverSelection => Some(4),
        ViewState::Confirmation => Some(5),
        ViewState::Installing => Some(6),
        ViewState::Complete => Some(7),
        ViewState::Error => None,
    }
}

/// Header preconfigured for a step
pub(crate) fn step_header(state: ViewState, subtitle: &str, ctx: &StepContext<'_>) -> Header {
    let mut header = Header::new(APP_TITLE, ctx.version);
    header.set_subtitle(subtitle);
    if let Some(position) = step_position(state) {
        header.set_step(position, WIZARD_STEPS);
    }
    header
}

/// Footer preconfigured with a step's key hints plus help and quit
pub(crate) fn step_footer(keys: &KeyMap, actions: &[KeyAction]) -> Footer {
    let mut all = actions.to_vec();
    all.extend([KeyAction::Back, KeyAction::Help, KeyAction::Quit]);
    Footer::new(keys, &all)
}

/// Rows left for a step body once header and footer are drawn
pub(crate) fn body_height(height: u16, header: &Header, footer: &Footer, extra: u16) -> u16 {
    let chrome = header.render().lines.len() + footer.render().lines.len() + 2;
    let chrome = u16::try_from(chrome).unwrap_or(u16::MAX);
    height.saturating_sub(chrome).saturating_sub(extra)
}

/// `(width, height)` after clamping negative values
pub(crate) fn clamp_size(width: i32, height: i32) -> (u16, u16) {
    (clamp_dim(width), clamp_dim(height))
}

/// Route the messages every step reacts to the same way: help toggling
/// and collaborator status lines. Returns `true` when handled.
pub(crate) fn handle_common(footer: &mut Footer, msg: &Message, keys: &KeyMap) -> bool {
    match msg {
        Message::Key(key) if keys.matches(KeyAction::Help, key) => {
            footer.toggle_full_help();
            true
        }
        Message::Status { text, is_error } => {
            let kind = if *is_error {
                StatusKind::Error
            } else {
                StatusKind::Info
            };
            footer.set_status(text.clone(), kind);
            true
        }
        _ => false,
    }
}

/// Stack rendered blocks with one blank line between them
pub(crate) fn stack(blocks: Vec<Text<'static>>) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    for block in blocks.into_iter().filter(|b| !b.lines.is_empty()) {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.extend(block.lines);
    }
    Text::from(lines)
}
