//! Driver selection step
//!
//! Two lists share the screen: driver versions and optional components.
//! Tab moves focus between them; Space toggles a component; `/` starts typing
//! a filter for the focused list.

use super::{
    StepContext, StepView, body_height, clamp_size, handle_common, stack, step_footer,
    step_header,
};
use crate::app::{Command, Message};
use crate::components::{Footer, Header, KeyAction, KeyMap, List, ListItem, Render};
use crate::error::shared_msg;
use crate::types::{ComponentChoice, DriverVersion, GpuInfo, Selection, StatusKind, ViewState};
use crossterm::event::KeyCode;
use ratatui::text::Text;
use tracing::debug;

/// Which list receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionFocus {
    #[default]
    Drivers,
    Components,
}

pub struct DriverSelectionView {
    header: Header,
    drivers: List,
    components: List,
    footer: Footer,
    focus: SelectionFocus,
    gpu: Option<GpuInfo>,
    driver_options: Vec<DriverVersion>,
    component_options: Vec<ComponentChoice>,
    /// Filter text being typed, `Some` while typing
    filter_input: Option<String>,
    width: u16,
    height: u16,
}

impl DriverSelectionView {
    pub fn new(ctx: &StepContext<'_>) -> Self {
        let mut view = Self {
            header: step_header(ViewState::DriverSelection, "Choose a driver and components", ctx),
            drivers: List::new("Driver version", Vec::new()),
            components: List::new("Components", Vec::new()),
            footer: step_footer(
                ctx.keys,
                &[
                    KeyAction::Up,
                    KeyAction::Tab,
                    KeyAction::Space,
                    KeyAction::Enter,
                ],
            ),
            focus: SelectionFocus::Drivers,
            gpu: None,
            driver_options: Vec::new(),
            component_options: Vec::new(),
            filter_input: None,
            width: ctx.width,
            height: ctx.height,
        };
        view.load_options(&GpuInfo::default());
        view.apply_focus();
        view
    }

    pub fn focus(&self) -> SelectionFocus {
        self.focus
    }

    pub fn drivers(&self) -> &List {
        &self.drivers
    }

    pub fn components(&self) -> &List {
        &self.components
    }

    pub fn is_filtering(&self) -> bool {
        self.filter_input.is_some()
    }

    /// Driver under the cursor
    pub fn selected_driver(&self) -> Option<DriverVersion> {
        self.drivers
            .selected_index()
            .and_then(|i| self.driver_options.get(i).cloned())
    }

    /// Components currently checked, in catalogue order
    pub fn selected_components(&self) -> Vec<ComponentChoice> {
        self.components
            .items()
            .iter()
            .zip(&self.component_options)
            .filter(|(item, _)| item.checked == Some(true))
            .map(|(_, choice)| ComponentChoice {
                selected: true,
                ..choice.clone()
            })
            .collect()
    }

    fn load_options(&mut self, gpu: &GpuInfo) {
        self.driver_options = gpu.driver_options();
        self.component_options = gpu.component_options();
        self.drivers.clear_filter();
        self.components.clear_filter();
        self.drivers.set_items(
            self.driver_options
                .iter()
                .map(|d| ListItem::new(d.version.clone(), d.label.clone()))
                .collect(),
        );
        self.components.set_items(
            self.component_options
                .iter()
                .map(|c| ListItem::new(c.name.clone(), c.description.clone()).checkable(c.selected))
                .collect(),
        );
        self.drivers.go_to_start();
        self.components.go_to_start();
    }

    fn focused_list(&mut self) -> &mut List {
        match self.focus {
            SelectionFocus::Drivers => &mut self.drivers,
            SelectionFocus::Components => &mut self.components,
        }
    }

    fn apply_focus(&mut self) {
        match self.focus {
            SelectionFocus::Drivers => {
                self.drivers.focus();
                self.components.blur();
            }
            SelectionFocus::Components => {
                self.drivers.blur();
                self.components.focus();
            }
        }
    }

    fn switch_focus(&mut self) {
        self.focus = match self.focus {
            SelectionFocus::Drivers => SelectionFocus::Components,
            SelectionFocus::Components => SelectionFocus::Drivers,
        };
        self.apply_focus();
    }

    fn layout(&mut self) {
        self.header.set_width(self.width);
        self.footer.set_width(self.width);
        if self.height == 0 {
            self.drivers.set_size(self.width, 0);
            self.components.set_size(self.width, 0);
            return;
        }
        let rows = body_height(self.height, &self.header, &self.footer, 1);
        let drivers = (rows / 2).max(2);
        let components = rows.saturating_sub(drivers).max(2);
        self.drivers.set_size(self.width, drivers);
        self.components.set_size(self.width, components);
    }

    fn confirm(&self) -> Command {
        let next = match (&self.gpu, self.selected_driver()) {
            (Some(gpu), Some(driver)) => Message::NavigateToConfirmation {
                gpu_info: gpu.clone(),
                driver,
                components: self.selected_components(),
            },
            (None, _) => Message::NavigateToError {
                err: Some(shared_msg("No GPU information available")),
                failed_step: ViewState::DriverSelection.to_string(),
            },
            (Some(_), None) => Message::NavigateToError {
                err: Some(shared_msg("No driver selected")),
                failed_step: ViewState::DriverSelection.to_string(),
            },
        };
        Command::message(next)
    }

    fn update_filter(&mut self, code: KeyCode) {
        let Some(mut input) = self.filter_input.take() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.filter_input = Some(input);
                self.end_input();
                return;
            }
            KeyCode::Enter => return,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
        self.focused_list().set_filter(input.clone());
        self.filter_input = Some(input);
    }
}

impl StepView for DriverSelectionView {
    fn footer_mut(&mut self) -> &mut Footer {
        &mut self.footer
    }

    fn enter(&mut self, selection: &Selection) -> Option<Command> {
        // Rebuild only for a different GPU so cursor and checks survive
        // a trip to confirmation and back
        if selection.gpu_info != self.gpu {
            let gpu = selection.gpu_info.clone().unwrap_or_default();
            debug!(gpu = %gpu.display_name(), "loading driver options");
            self.load_options(&gpu);
            self.gpu = selection.gpu_info.clone();
            self.filter_input = None;
            self.focus = SelectionFocus::Drivers;
            self.apply_focus();
            self.layout();
        }
        None
    }

    fn captures_input(&self) -> bool {
        self.filter_input.is_some()
    }

    fn end_input(&mut self) {
        if self.filter_input.take().is_some() {
            self.focused_list().clear_filter();
            self.footer.clear_status();
        }
    }

    fn update(&mut self, msg: Message, keys: &KeyMap) -> Option<Command> {
        if let Message::Key(key) = &msg {
            if self.filter_input.is_some() {
                self.update_filter(key.code);
                return None;
            }
        }
        if handle_common(&mut self.footer, &msg, keys) {
            return None;
        }
        let Message::Key(key) = msg else {
            return None;
        };

        match keys.action_for(&key) {
            Some(KeyAction::Up) => self.focused_list().cursor_up(),
            Some(KeyAction::Down) => self.focused_list().cursor_down(),
            Some(KeyAction::PageUp) => self.focused_list().page_up(),
            Some(KeyAction::PageDown) => self.focused_list().page_down(),
            Some(KeyAction::Home) => self.focused_list().go_to_start(),
            Some(KeyAction::End) => self.focused_list().go_to_end(),
            Some(KeyAction::Tab) => self.switch_focus(),
            Some(KeyAction::Space) => {
                if self.focus == SelectionFocus::Components {
                    self.components.toggle_selected();
                }
            }
            Some(KeyAction::Enter) => return Some(self.confirm()),
            _ => {
                if key.code == KeyCode::Char('/') && self.focused_list().filtering_enabled() {
                    self.filter_input = Some(self.focused_list().filter().to_string());
                    self.footer
                        .set_status("Type to filter, Enter to keep", StatusKind::Info);
                }
            }
        }
        None
    }

    fn resize(&mut self, width: i32, height: i32) {
        (self.width, self.height) = clamp_size(width, height);
        self.layout();
    }
}

impl Render for DriverSelectionView {
    fn render(&self) -> Text<'static> {
        stack(vec![
            self.header.render(),
            self.drivers.render(),
            self.components.render(),
            self.footer.render(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Message {
        Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn gpu() -> GpuInfo {
        GpuInfo {
            vendor: "NVIDIA".into(),
            model: "RTX 3080".into(),
            ..GpuInfo::default()
        }
    }

    fn entered(keys: &KeyMap) -> DriverSelectionView {
        let mut view = DriverSelectionView::new(&StepContext {
            keys,
            version: "",
            width: 80,
            height: 30,
        });
        view.enter(&Selection {
            gpu_info: Some(gpu()),
            ..Selection::default()
        });
        view
    }

    #[test]
    fn test_defaults_loaded_for_gpu_without_recommendations() {
        let keys = KeyMap::new();
        let view = entered(&keys);
        assert_eq!(view.drivers().len(), 3);
        assert_eq!(view.selected_driver(), Some(DriverVersion::new("550", "Latest")));
        assert_eq!(view.focus(), SelectionFocus::Drivers);
    }

    #[test]
    fn test_navigation_moves_focused_list_only() {
        let keys = KeyMap::new();
        let mut view = entered(&keys);
        view.update(key(KeyCode::Down), &keys);
        assert_eq!(view.selected_driver().unwrap().version, "535");
        assert_eq!(view.components().index(), Some(0));

        view.update(key(KeyCode::Tab), &keys);
        assert_eq!(view.focus(), SelectionFocus::Components);
        view.update(key(KeyCode::End), &keys);
        assert_eq!(view.selected_driver().unwrap().version, "535");
        assert_eq!(view.components().index(), Some(view.components().len() - 1));
    }

    #[test]
    fn test_space_toggles_components_only_when_focused() {
        let keys = KeyMap::new();
        let mut view = entered(&keys);
        let before = view.selected_components().len();

        view.update(key(KeyCode::Char(' ')), &keys);
        assert_eq!(view.selected_components().len(), before);

        view.update(key(KeyCode::Tab), &keys);
        view.update(key(KeyCode::Char(' ')), &keys);
        assert_eq!(view.selected_components().len(), before - 1);
    }

    #[test]
    fn test_enter_confirms_selection() {
        let keys = KeyMap::new();
        let mut view = entered(&keys);
        let cmd = view.update(key(KeyCode::Enter), &keys).unwrap();
        match cmd.run() {
            Some(Message::NavigateToConfirmation {
                gpu_info,
                driver,
                components,
            }) => {
                assert_eq!(gpu_info, gpu());
                assert_eq!(driver, DriverVersion::new("550", "Latest"));
                assert!(components.iter().all(|c| c.selected));
                assert_eq!(components.len(), 2);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_state_survives_reentry_with_same_gpu() {
        let keys = KeyMap::new();
        let mut view = entered(&keys);
        view.update(key(KeyCode::Down), &keys);
        view.enter(&Selection {
            gpu_info: Some(gpu()),
            ..Selection::default()
        });
        assert_eq!(view.selected_driver().unwrap().version, "535");
    }

    #[test]
    fn test_new_gpu_reloads_options() {
        let keys = KeyMap::new();
        let mut view = entered(&keys);
        view.update(key(KeyCode::Down), &keys);
        let other = GpuInfo {
            model: "GTX 780".into(),
            drivers: vec![DriverVersion::new("470", "Legacy")],
            ..gpu()
        };
        view.enter(&Selection {
            gpu_info: Some(other),
            ..Selection::default()
        });
        assert_eq!(view.drivers().len(), 1);
        assert_eq!(view.selected_driver().unwrap().version, "470");
    }

    #[test]
    fn test_filter_typing() {
        let keys = KeyMap::new();
        let mut view = entered(&keys);
        view.update(key(KeyCode::Char('/')), &keys);
        assert!(view.captures_input());

        for c in "leg".chars() {
            view.update(key(KeyCode::Char(c)), &keys);
        }
        assert_eq!(view.drivers().len(), 1);
        assert_eq!(view.selected_driver().unwrap().version, "470");

        view.update(key(KeyCode::Enter), &keys);
        assert!(!view.captures_input());
        assert_eq!(view.drivers().len(), 1);

        view.update(key(KeyCode::Char('/')), &keys);
        view.update(key(KeyCode::Esc), &keys);
        assert_eq!(view.drivers().len(), 3);
        assert_eq!(view.selected_driver().unwrap().version, "470");
    }

    #[test]
    fn test_end_input_clears_partial_filter() {
        let keys = KeyMap::new();
        let mut view = entered(&keys);
        view.update(key(KeyCode::Char('/')), &keys);
        for c in "leg".chars() {
            view.update(key(KeyCode::Char(c)), &keys);
        }
        assert_eq!(view.drivers().len(), 1);

        view.end_input();
        assert!(!view.captures_input());
        assert_eq!(view.drivers().len(), 3);
        assert!(!view.view().contains("Type to filter"));

        // no-op when nothing is being typed
        view.end_input();
        assert_eq!(view.drivers().len(), 3);
    }

    #[test]
    fn test_enter_without_gpu_reports_error() {
        let keys = KeyMap::new();
        let mut view = DriverSelectionView::new(&StepContext {
            keys: &keys,
            version: "",
            width: 80,
            height: 24,
        });
        view.enter(&Selection::default());
        let cmd = view.update(key(KeyCode::Enter), &keys).unwrap();
        assert!(matches!(cmd.run(), Some(Message::NavigateToError { .. })));
    }
}
