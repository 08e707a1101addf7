//! Tests for the wizard's application model
//!
//! These tests verify:
//! - The happy path from Welcome to Complete
//! - Error display and retry
//! - Back and quit key behavior
//! - Quitting and initializing overrides
//! - Resize propagation to every built step

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gpu_wizard::app::{GOODBYE, INITIALIZING};
use gpu_wizard::components::KeyAction;
use gpu_wizard::error::shared_msg;
use gpu_wizard::ui::Step;
use gpu_wizard::{App, ComponentChoice, DriverVersion, GpuInfo, Message, ViewState};

fn key(code: KeyCode) -> Message {
    Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ready_app() -> App {
    let mut app = App::new("1.2.3");
    app.update(Message::WindowReady {
        width: 100,
        height: 30,
    });
    app
}

fn gpu() -> GpuInfo {
    GpuInfo {
        vendor: "NVIDIA".into(),
        model: "GeForce RTX 3080".into(),
        pci_id: "10de:2206".into(),
        ..GpuInfo::default()
    }
}

fn latest() -> DriverVersion {
    DriverVersion::new("550", "Latest")
}

fn components() -> Vec<ComponentChoice> {
    vec![ComponentChoice::new("nvidia-utils", "Userspace driver libraries", true)]
}

// =============================================================================
// Full flow
// =============================================================================

#[test]
fn test_happy_path_reaches_complete() {
    let mut app = ready_app();
    assert!(app.is_ready());

    app.update(Message::StartDetection);
    assert_eq!(app.current_view(), ViewState::Detecting);

    app.update(Message::NavigateToDriverSelection { gpu_info: gpu() });
    assert_eq!(app.current_view(), ViewState::DriverSelection);
    assert_eq!(app.selection().gpu_info, Some(gpu()));

    app.update(Message::NavigateToConfirmation {
        gpu_info: gpu(),
        driver: latest(),
        components: components(),
    });
    assert_eq!(app.current_view(), ViewState::Confirmation);

    let cmd = app.update(Message::StartInstallation {
        gpu_info: gpu(),
        driver: latest(),
        components: components(),
    });
    assert_eq!(app.current_view(), ViewState::Installing);
    assert!(cmd.is_some(), "installing starts its animation");

    app.update(Message::NavigateToComplete {
        gpu_info: gpu(),
        driver: latest(),
        components: components(),
    });
    assert_eq!(app.current_view(), ViewState::Complete);
    assert_eq!(app.selection().driver, Some(latest()));
}

#[test]
fn test_repeated_installation_complete_keeps_selection() {
    let mut app = ready_app();
    app.update(Message::StartInstallation {
        gpu_info: gpu(),
        driver: latest(),
        components: components(),
    });
    let done = || Message::InstallationComplete {
        success: true,
        text: String::new(),
    };
    let first = app.update(done()).expect("first completion navigates");
    assert!(app.update(done()).is_none());
    let late_failure = app.update(Message::InstallationComplete {
        success: false,
        text: "late".into(),
    });
    assert!(late_failure.is_none());

    app.update(first.run().unwrap());
    assert_eq!(app.current_view(), ViewState::Complete);
    assert_eq!(app.selection().gpu_info, Some(gpu()));
    assert_eq!(app.selection().driver, Some(latest()));
}

#[test]
fn test_keys_drive_welcome_to_confirmation() {
    let mut app = ready_app();

    let cmd = app.update(key(KeyCode::Enter)).expect("welcome emits StartDetection");
    let msg = cmd.run().expect("command yields a message");
    assert!(matches!(msg, Message::StartDetection));
    app.update(msg);
    assert_eq!(app.current_view(), ViewState::Detecting);

    app.update(Message::NavigateToSystemInfo { gpu_info: gpu() });
    let msg = app.update(key(KeyCode::Enter)).unwrap().run().unwrap();
    app.update(msg);
    assert_eq!(app.current_view(), ViewState::DriverSelection);

    let msg = app.update(key(KeyCode::Enter)).unwrap().run().unwrap();
    match &msg {
        Message::NavigateToConfirmation { driver, .. } => assert_eq!(driver, &latest()),
        other => panic!("unexpected message {:?}", other),
    }
    app.update(msg);
    assert_eq!(app.current_view(), ViewState::Confirmation);
    assert!(app.view().contains("550 (Latest)"));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_nil_error_renders_unknown_and_retry_clears() {
    for start in [ViewState::Welcome, ViewState::Detecting, ViewState::Installing] {
        let mut app = ready_app();
        app.update(Message::Navigate { view: start });
        app.update(Message::NavigateToError {
            err: None,
            failed_step: String::new(),
        });
        assert_eq!(app.current_view(), ViewState::Error);
        assert!(app.view().contains("Unknown error"));

        app.update(Message::RetryRequested);
        assert_eq!(app.current_view(), ViewState::Welcome);
        assert!(app.error().is_none());
    }
}

#[test]
fn test_error_text_shown_verbatim() {
    let mut app = ready_app();
    app.update(Message::NavigateToError {
        err: Some(shared_msg("nvidia-dkms: build failed for 6.9.7")),
        failed_step: "Installation".into(),
    });
    let view = app.view();
    assert!(view.contains("nvidia-dkms: build failed for 6.9.7"));
    assert!(view.contains("Installation"));
    assert_eq!(app.failed_step(), "Installation");
}

#[test]
fn test_error_exit_quits() {
    let mut app = ready_app();
    app.update(Message::NavigateToError {
        err: None,
        failed_step: String::new(),
    });
    let cmd = app.update(Message::ErrorExitRequested).unwrap();
    assert!(app.is_quitting());
    assert!(matches!(cmd.run(), Some(Message::Quit)));
}

// =============================================================================
// Keys
// =============================================================================

#[test]
fn test_quit_keys_from_every_state() {
    let states = [
        ViewState::Welcome,
        ViewState::Detecting,
        ViewState::SystemInfo,
        ViewState::DriverSelection,
        ViewState::Confirmation,
        ViewState::Installing,
        ViewState::Complete,
        ViewState::Error,
    ];
    for state in states {
        let mut app = ready_app();
        app.update(Message::Navigate { view: state });
        let cmd = app.update(key(KeyCode::Char('q'))).unwrap();
        assert!(matches!(cmd.run(), Some(Message::Quit)), "q from {state}");

        let ctrl_c = Message::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let cmd = app.update(ctrl_c).unwrap();
        assert!(matches!(cmd.run(), Some(Message::Quit)), "ctrl+c from {state}");
    }
}

#[test]
fn test_escape_returns_to_welcome_synchronously() {
    let mut app = ready_app();
    app.update(Message::NavigateToError {
        err: Some(shared_msg("boom")),
        failed_step: "GPU Detection".into(),
    });
    assert!(app.update(key(KeyCode::Esc)).is_none());
    assert_eq!(app.current_view(), ViewState::Welcome);
    assert!(app.error().is_none());
}

#[test]
fn test_escape_on_welcome_quits() {
    let mut app = ready_app();
    let cmd = app.update(key(KeyCode::Esc)).unwrap();
    assert!(matches!(cmd.run(), Some(Message::Quit)));
}

#[test]
fn test_filter_typing_keeps_q_local() {
    let mut app = ready_app();
    app.update(Message::NavigateToDriverSelection { gpu_info: gpu() });
    app.update(key(KeyCode::Char('/')));
    assert!(app.update(key(KeyCode::Char('q'))).is_none());
    assert!(!app.is_quitting());
    assert_eq!(app.current_view(), ViewState::DriverSelection);
}

#[test]
fn test_escape_while_filtering_returns_to_welcome() {
    let mut app = ready_app();
    app.update(Message::NavigateToDriverSelection { gpu_info: gpu() });
    app.update(key(KeyCode::Char('/')));
    for c in "leg".chars() {
        app.update(key(KeyCode::Char(c)));
    }

    assert!(app.update(key(KeyCode::Esc)).is_none());
    assert_eq!(app.current_view(), ViewState::Welcome);

    // the half-typed filter is gone on the next visit
    app.update(Message::NavigateToDriverSelection { gpu_info: gpu() });
    match app.active_step() {
        Some(Step::DriverSelection(view)) => {
            assert!(!view.is_filtering());
            assert_eq!(view.drivers().len(), 3);
        }
        _ => panic!("driver selection should be active"),
    }
    assert!(app.update(key(KeyCode::Char('q'))).is_some());
}

#[test]
fn test_keymap_changes_reach_built_steps() {
    let mut app = ready_app();
    assert!(app.view().contains("q Quit"));

    app.keymap_mut().set_enabled(KeyAction::Quit, false);
    app.update(Message::StartDetection);
    assert!(!app.view().contains("q Quit"));

    app.update(key(KeyCode::Esc));
    assert_eq!(app.current_view(), ViewState::Welcome);
    assert!(!app.view().contains("q Quit"));
}

#[test]
fn test_help_key_expands_footer() {
    let mut app = ready_app();
    let before = app.view();
    assert!(app.update(key(KeyCode::Char('?'))).is_none());
    let after = app.view();
    assert!(after.contains("Navigation"));
    assert_ne!(before, after);
}

// =============================================================================
// Rendering overrides
// =============================================================================

#[test]
fn test_not_ready_renders_placeholder() {
    let mut app = App::new("1.2.3");
    app.update(Message::StartDetection);
    assert_eq!(app.view(), INITIALIZING);
}

#[test]
fn test_quitting_overrides_everything() {
    let mut app = ready_app();
    app.update(Message::NavigateToError {
        err: None,
        failed_step: String::new(),
    });
    app.update(Message::Quit);
    assert_eq!(app.view(), GOODBYE);
}

#[test]
fn test_reboot_from_complete() {
    let mut app = ready_app();
    app.update(Message::NavigateToComplete {
        gpu_info: gpu(),
        driver: latest(),
        components: components(),
    });
    let msg = app.update(key(KeyCode::Enter)).unwrap().run().unwrap();
    assert!(matches!(msg, Message::RebootRequested));
    app.update(msg);
    assert!(app.is_quitting());
    assert!(app.reboot_requested());
}

// =============================================================================
// Lazy steps and resize
// =============================================================================

#[test]
fn test_steps_built_on_first_visit_only() {
    let mut app = ready_app();
    assert!(app.is_instantiated(ViewState::Welcome));
    assert!(!app.is_instantiated(ViewState::Detecting));
    app.update(Message::StartDetection);
    assert!(app.is_instantiated(ViewState::Detecting));
    assert!(!app.is_instantiated(ViewState::Complete));
}

#[test]
fn test_driver_cursor_survives_round_trip() {
    let mut app = ready_app();
    app.update(Message::NavigateToDriverSelection { gpu_info: gpu() });
    app.update(key(KeyCode::Down));
    app.update(Message::StartDetection);
    app.update(Message::NavigateToDriverSelection { gpu_info: gpu() });
    match app.active_step() {
        Some(Step::DriverSelection(view)) => {
            assert_eq!(view.selected_driver().unwrap().version, "535");
        }
        _ => panic!("driver selection should be active"),
    }
}

#[test]
fn test_resize_reaches_inactive_steps() {
    let mut app = ready_app();
    app.update(Message::StartDetection);
    app.update(Message::NavigateToError {
        err: None,
        failed_step: String::new(),
    });
    app.update(Message::WindowReady {
        width: 60,
        height: 20,
    });
    assert_eq!((app.width(), app.height()), (60, 20));

    // Back on Welcome the header rule must match the new width
    app.update(Message::RetryRequested);
    let widest = app.view().lines().map(|l| l.chars().count()).max().unwrap();
    assert!(widest <= 60, "line of {widest} columns after shrinking to 60");
}
