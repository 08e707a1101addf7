//! Named key bindings
//!
//! The [`KeyMap`] is a declarative table consulted while dispatching key
//! events. Each binding can be switched off on its own, which hides it from
//! the footer help and stops it from matching.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Logical actions a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum KeyAction {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Back,
    Tab,
    Space,
    PageUp,
    PageDown,
    Home,
    End,
    Help,
    Quit,
}

/// One binding: physical keys plus help text
#[derive(Debug, Clone)]
pub struct KeyBinding {
    keys: Vec<(KeyCode, KeyModifiers)>,
    pub display: String,
    pub description: String,
    enabled: bool,
}

impl KeyBinding {
    /// Create an enabled binding for unmodified keys
    pub fn new(keys: &[KeyCode], display: &str, description: &str) -> Self {
        Self {
            keys: keys.iter().map(|k| (*k, KeyModifiers::NONE)).collect(),
            display: display.to_string(),
            description: description.to_string(),
            enabled: true,
        }
    }

    /// Add a key with modifiers
    pub fn with_key(mut self, key: KeyCode, modifiers: KeyModifiers) -> Self {
        self.keys.push((key, modifiers));
        self
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn keys(&self) -> &[(KeyCode, KeyModifiers)] {
        &self.keys
    }

    /// Whether `event` triggers this binding
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if !self.enabled || event.kind == KeyEventKind::Release {
            return false;
        }
        self.keys.iter().any(|(code, mods)| {
            if *code != event.code {
                return false;
            }
            // Shift is implied by the character itself ('G', '?')
            let pressed = match event.code {
                KeyCode::Char(_) => event.modifiers.difference(KeyModifiers::SHIFT),
                _ => event.modifiers,
            };
            pressed == *mods
        })
    }
}

/// Help section for the expanded footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSection {
    pub title: String,
    pub items: Vec<(String, String)>,
}

/// Table of all named bindings
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<KeyAction, KeyBinding>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyMap {
    /// Create the default key map
    pub fn new() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(
            KeyAction::Up,
            KeyBinding::new(&[KeyCode::Up, KeyCode::Char('k')], "↑/k", "Move up"),
        );
        bindings.insert(
            KeyAction::Down,
            KeyBinding::new(&[KeyCode::Down, KeyCode::Char('j')], "↓/j", "Move down"),
        );
        bindings.insert(
            KeyAction::Left,
            KeyBinding::new(&[KeyCode::Left, KeyCode::Char('h')], "←/h", "Move left"),
        );
        bindings.insert(
            KeyAction::Right,
            KeyBinding::new(&[KeyCode::Right, KeyCode::Char('l')], "→/l", "Move right"),
        );
        bindings.insert(
            KeyAction::Enter,
            KeyBinding::new(&[KeyCode::Enter], "Enter", "Select"),
        );
        bindings.insert(
            KeyAction::Back,
            KeyBinding::new(&[KeyCode::Esc], "Esc", "Back"),
        );
        bindings.insert(
            KeyAction::Tab,
            KeyBinding::new(&[KeyCode::Tab, KeyCode::BackTab], "Tab", "Switch focus"),
        );
        bindings.insert(
            KeyAction::Space,
            KeyBinding::new(&[KeyCode::Char(' ')], "Space", "Toggle"),
        );
        bindings.insert(
            KeyAction::PageUp,
            KeyBinding::new(&[KeyCode::PageUp], "PgUp", "Page up"),
        );
        bindings.insert(
            KeyAction::PageDown,
            KeyBinding::new(&[KeyCode::PageDown], "PgDn", "Page down"),
        );
        bindings.insert(
            KeyAction::Home,
            KeyBinding::new(&[KeyCode::Home, KeyCode::Char('g')], "Home/g", "Go to first"),
        );
        bindings.insert(
            KeyAction::End,
            KeyBinding::new(&[KeyCode::End, KeyCode::Char('G')], "End/G", "Go to last"),
        );
        bindings.insert(
            KeyAction::Help,
            KeyBinding::new(&[KeyCode::Char('?')], "?", "Toggle help"),
        );
        bindings.insert(
            KeyAction::Quit,
            KeyBinding::new(&[KeyCode::Char('q')], "q", "Quit")
                .with_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        Self { bindings }
    }

    /// Binding for an action
    pub fn binding(&self, action: KeyAction) -> Option<&KeyBinding> {
        self.bindings.get(&action)
    }

    /// Replace the binding for an action
    pub fn rebind(&mut self, action: KeyAction, binding: KeyBinding) {
        self.bindings.insert(action, binding);
    }

    pub fn set_enabled(&mut self, action: KeyAction, enabled: bool) {
        if let Some(binding) = self.bindings.get_mut(&action) {
            binding.set_enabled(enabled);
        }
    }

    pub fn is_enabled(&self, action: KeyAction) -> bool {
        self.bindings.get(&action).is_some_and(KeyBinding::enabled)
    }

    /// Whether `event` triggers `action`
    pub fn matches(&self, action: KeyAction, event: &KeyEvent) -> bool {
        self.bindings
            .get(&action)
            .is_some_and(|binding| binding.matches(event))
    }

    /// First action (in declaration order) that `event` triggers
    pub fn action_for(&self, event: &KeyEvent) -> Option<KeyAction> {
        KeyAction::iter().find(|action| self.matches(*action, event))
    }

    /// `(key, description)` pairs for the enabled subset of `actions`
    pub fn short_help(&self, actions: &[KeyAction]) -> Vec<(String, String)> {
        actions
            .iter()
            .filter_map(|action| self.bindings.get(action))
            .filter(|binding| binding.enabled())
            .map(|binding| (binding.display.clone(), binding.description.clone()))
            .collect()
    }

    /// All enabled bindings grouped for the expanded help view
    pub fn full_help(&self) -> Vec<HelpSection> {
        let groups: [(&str, &[KeyAction]); 3] = [
            (
                "Navigation",
                &[
                    KeyAction::Up,
                    KeyAction::Down,
                    KeyAction::Left,
                    KeyAction::Right,
                    KeyAction::PageUp,
                    KeyAction::PageDown,
                    KeyAction::Home,
                    KeyAction::End,
                ],
            ),
            (
                "Actions",
                &[KeyAction::Enter, KeyAction::Space, KeyAction::Tab],
            ),
            ("General", &[KeyAction::Back, KeyAction::Help, KeyAction::Quit]),
        ];

        groups
            .iter()
            .map(|(title, actions)| HelpSection {
                title: title.to_string(),
                items: self.short_help(actions),
            })
            .filter(|section| !section.items.is_empty())
            .collect()
    }
}
