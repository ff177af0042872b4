//! UI automation tests using egui_kittest and AccessKit
//!
//! These render the real chat window through [`chatpane::ui::render`]
//! and find widgets by their accessibility labels.

use chatpane::config::{ChatConfig, DEFAULT_GREETING, DEFAULT_PLACEHOLDER_REPLY};
use chatpane::messages::Role;
use chatpane::speech::{DictationState, FakeSpeechHandle, FakeSpeechProvider};
use chatpane::ui::{render, AppState, Theme};
use egui_kittest::kittest::Queryable;
use egui_kittest::Harness;
use std::time::Duration;
use tokio::runtime::Runtime;

const NARROW: egui::Vec2 = egui::Vec2::new(420.0, 640.0);
const WIDE: egui::Vec2 = egui::Vec2::new(1280.0, 720.0);

struct TestApp {
    state: AppState,
    theme: Theme,
}

/// Paused-clock runtime standing in for the reply timer
fn paused_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

fn test_app(runtime: &Runtime, speech_supported: bool) -> (TestApp, FakeSpeechHandle) {
    let (provider, handle) = if speech_supported {
        FakeSpeechProvider::new()
    } else {
        FakeSpeechProvider::unsupported()
    };
    let config = ChatConfig::with_defaults();
    let state = AppState::new(&config, runtime.handle().clone(), Box::new(provider));
    (
        TestApp {
            state,
            theme: Theme::dark(),
        },
        handle,
    )
}

fn harness(app: TestApp, size: egui::Vec2) -> Harness<'static, TestApp> {
    Harness::builder().with_size(size).build_state(
        |ctx, app: &mut TestApp| {
            render(ctx, &mut app.state, &app.theme);
        },
        app,
    )
}

/// Let every pending reply timer fire
fn elapse_reply_delay(runtime: &Runtime) {
    runtime.block_on(async { tokio::time::sleep(Duration::from_millis(1100)).await });
}

#[test]
fn test_greeting_and_controls_are_accessible() {
    let runtime = paused_runtime();
    let (app, _speech) = test_app(&runtime, true);
    let mut harness = harness(app, NARROW);
    harness.run();

    let _greeting = harness.get_by_label(&format!("Assistant response: {}", DEFAULT_GREETING));
    let _input = harness.get_by_label("Message input");
    let _send = harness.get_by_label("Send message");
    let _mic = harness.get_by_label("Toggle dictation");
}

#[test]
fn test_send_message_then_placeholder_reply() {
    let runtime = paused_runtime();
    let (app, _speech) = test_app(&runtime, true);
    let mut harness = harness(app, NARROW);
    harness.run();

    harness.get_by_label("Message input").focus();
    harness.run();
    harness.get_by_label("Message input").type_text("Hi");
    harness.run();
    assert_eq!(harness.state().state.session.composer().text(), "Hi");

    harness.get_by_label("Send message").click();
    harness.run();

    {
        let messages = harness.state().state.session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "Hi");
        assert!(harness.state().state.session.composer().text().is_empty());
    }
    let _user = harness.get_by_label("User message: Hi");

    elapse_reply_delay(&runtime);
    harness.run();

    let messages = harness.state().state.session.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].role, Role::Assistant);
    let _reply =
        harness.get_by_label(&format!("Assistant response: {}", DEFAULT_PLACEHOLDER_REPLY));
}

#[test]
fn test_cannot_send_empty_message() {
    let runtime = paused_runtime();
    let (app, _speech) = test_app(&runtime, true);
    let mut harness = harness(app, NARROW);
    harness.run();

    harness.get_by_label("Send message").click();
    harness.run();
    elapse_reply_delay(&runtime);
    harness.run();

    assert_eq!(harness.state().state.session.messages().len(), 1);
}

#[test]
fn test_menu_button_toggles_drawer_on_narrow_layout() {
    let runtime = paused_runtime();
    let (app, _speech) = test_app(&runtime, true);
    let mut harness = harness(app, NARROW);
    harness.run();

    assert!(harness.query_by_label("Settings").is_none());

    harness.get_by_label("Open menu").click();
    harness.run();
    assert!(harness.state().state.sidebar.is_open());
    let _home = harness.get_by_label("Home");
    let _new_chat = harness.get_by_label("New Chat");

    harness.get_by_label("Close menu").click();
    harness.run();
    assert!(!harness.state().state.sidebar.is_open());
}

#[test]
fn test_choosing_nav_entry_closes_drawer() {
    let runtime = paused_runtime();
    let (app, _speech) = test_app(&runtime, true);
    let mut harness = harness(app, NARROW);
    harness.run();

    harness.get_by_label("Open menu").click();
    harness.run();
    harness.get_by_label("Profile").click();
    harness.run();

    assert!(!harness.state().state.sidebar.is_open());
    // Navigation never touches the conversation
    assert_eq!(harness.state().state.session.messages().len(), 1);
}

#[test]
fn test_sidebar_is_docked_on_wide_layout() {
    let runtime = paused_runtime();
    let (app, _speech) = test_app(&runtime, true);
    let mut harness = harness(app, WIDE);
    harness.run();

    let _settings = harness.get_by_label("Settings");
    assert!(harness.query_by_label("Open menu").is_none());
    assert!(harness.query_by_label("Close menu").is_none());
}

#[test]
fn test_dictation_fills_the_draft() {
    let runtime = paused_runtime();
    let (app, speech) = test_app(&runtime, true);
    let mut harness = harness(app, NARROW);
    harness.run();

    harness.get_by_label("Toggle dictation").click();
    harness.run();
    assert_eq!(
        harness.state().state.session.dictation_state(),
        DictationState::Listening
    );

    speech.emit("hel");
    speech.emit("hello there");
    harness.run();
    assert_eq!(harness.state().state.session.composer().text(), "hello there");

    harness.get_by_label("Toggle dictation").click();
    harness.run();
    assert_eq!(
        harness.state().state.session.dictation_state(),
        DictationState::Idle
    );
    assert!(!speech.is_listening());
}

#[test]
fn test_unsupported_dictation_button_is_inert() {
    let runtime = paused_runtime();
    let (app, speech) = test_app(&runtime, false);
    let mut harness = harness(app, NARROW);
    harness.run();

    harness.get_by_label("Toggle dictation").click();
    harness.run();

    assert_eq!(
        harness.state().state.session.dictation_state(),
        DictationState::Idle
    );
    assert_eq!(speech.starts(), 0);
}
