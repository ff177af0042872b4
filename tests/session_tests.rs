//! Behavioral tests for the chat session
//!
//! Time is tokio's paused clock: sleeping in a test auto-advances it,
//! firing every reply timer that falls due along the way. Dictation uses
//! the in-crate fake provider.

use chatpane::config::{ChatConfig, DEFAULT_GREETING, DEFAULT_PLACEHOLDER_REPLY};
use chatpane::messages::{MessageId, MessageStore, Role, StoreEvent};
use chatpane::session::{
    ChatSession, ComposerState, KeyPress, PlaceholderReply, ReplySimulator,
};
use chatpane::speech::{DictationState, FakeSpeechHandle, FakeSpeechProvider, SpeechCapture};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

const DELAY: Duration = Duration::from_millis(1000);

fn session_with_speech(supported: bool) -> (ChatSession, FakeSpeechHandle) {
    let (provider, handle) = if supported {
        FakeSpeechProvider::new()
    } else {
        FakeSpeechProvider::unsupported()
    };
    let config = ChatConfig::with_defaults().with_reply_delay(DELAY);
    let session = ChatSession::from_config(&config, Handle::current(), Box::new(provider));
    (session, handle)
}

fn session() -> ChatSession {
    session_with_speech(true).0
}

fn send_text(session: &mut ChatSession, text: &str) -> Option<MessageId> {
    session.composer_mut().set_text(text);
    session.send().map(|sent| sent.message)
}

async fn advance(duration: Duration) {
    tokio::time::sleep(duration).await;
}

fn roles(session: &ChatSession) -> Vec<Role> {
    session.messages().iter().map(|m| m.role).collect()
}

#[tokio::test(start_paused = true)]
async fn test_greeting_then_user_then_placeholder() {
    let mut session = session();
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.messages()[0].content, DEFAULT_GREETING);

    send_text(&mut session, "Hi");
    session.poll_events();
    let messages = session.messages();
    assert_eq!(roles(&session), vec![Role::Assistant, Role::User]);
    assert_eq!(messages[1].content, "Hi");

    advance(DELAY + Duration::from_millis(1)).await;
    assert!(session.poll_events());

    let messages = session.messages();
    assert_eq!(roles(&session), vec![Role::Assistant, Role::User, Role::Assistant]);
    assert_eq!(messages[2].content, DEFAULT_PLACEHOLDER_REPLY);
}

#[tokio::test(start_paused = true)]
async fn test_reply_not_before_delay() {
    let mut session = session();
    send_text(&mut session, "patience");

    advance(DELAY - Duration::from_millis(10)).await;
    session.poll_events();
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.pending_replies(), 1);

    advance(Duration::from_millis(20)).await;
    session.poll_events();
    assert_eq!(session.messages().len(), 3);
    assert_eq!(session.pending_replies(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_committed_content_is_trimmed_and_draft_cleared() {
    let mut session = session();
    send_text(&mut session, "  hello world \n");

    let last = session.messages().pop().unwrap();
    assert_eq!(last.role, Role::User);
    assert_eq!(last.content, "hello world");
    assert_eq!(session.composer().text(), "");
    assert!(!session.can_send());
}

#[tokio::test(start_paused = true)]
async fn test_blank_drafts_append_nothing() {
    let (mut session, handle) = session_with_speech(true);
    session.toggle_dictation();

    for draft in ["", " ", "\n\t  \n"] {
        assert_eq!(send_text(&mut session, draft), None);
    }

    advance(DELAY * 3).await;
    session.poll_events();
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.dictation_state(), DictationState::Listening);
    assert_eq!(handle.resets(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_sends_each_get_a_reply_in_order() {
    let mut session = session();
    let sent: Vec<MessageId> = (0..5)
        .map(|i| send_text(&mut session, &format!("message {}", i)).unwrap())
        .collect();

    assert_eq!(session.pending_replies(), 5);
    advance(DELAY + Duration::from_millis(1)).await;
    session.poll_events();

    let messages = session.messages();
    assert_eq!(messages.len(), 1 + 5 + 5);

    let users: Vec<_> = messages.iter().filter(|m| m.role == Role::User).collect();
    let user_ids: Vec<MessageId> = users.iter().map(|m| m.id).collect();
    assert_eq!(user_ids, sent);
    for (i, user) in users.iter().enumerate() {
        assert_eq!(user.content, format!("message {}", i));
    }

    let replies = messages.iter().filter(|m| m.role == Role::Assistant).count();
    assert_eq!(replies, 6);

    let unique: HashSet<MessageId> = messages.iter().map(|m| m.id).collect();
    assert_eq!(unique.len(), messages.len());
    assert!(messages.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[tokio::test(start_paused = true)]
async fn test_staggered_sends_reply_independently() {
    let mut session = session();
    send_text(&mut session, "first");
    advance(Duration::from_millis(600)).await;
    send_text(&mut session, "second");

    advance(Duration::from_millis(401)).await;
    session.poll_events();
    assert_eq!(
        roles(&session),
        vec![Role::Assistant, Role::User, Role::User, Role::Assistant]
    );

    advance(Duration::from_millis(600)).await;
    session.poll_events();
    assert_eq!(session.messages().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_close_before_delay_suppresses_reply() {
    let mut session = session();
    let store = session.store().clone();
    send_text(&mut session, "goodbye");
    assert_eq!(store.len(), 2);

    session.close();
    assert_eq!(session.pending_replies(), 0);

    advance(DELAY * 2).await;
    assert!(!session.poll_events());
    assert_eq!(store.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_session_suppresses_reply() {
    let mut session = session();
    let store = session.store().clone();
    let events = store.subscribe();
    send_text(&mut session, "into the void");
    drop(session);

    advance(DELAY * 2).await;
    assert_eq!(store.len(), 2);
    assert!(matches!(events.try_recv(), Ok(StoreEvent::Appended { index: 1, .. })));
    assert!(events.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_close_releases_microphone() {
    let (mut session, handle) = session_with_speech(true);
    assert_eq!(session.toggle_dictation(), DictationState::Listening);
    assert!(handle.is_listening());

    session.close();
    assert!(!handle.is_listening());
    assert_eq!(session.dictation_state(), DictationState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_unsupported_dictation_stays_idle() {
    let (mut session, handle) = session_with_speech(false);
    assert!(!session.speech_supported());

    for _ in 0..3 {
        assert_eq!(session.toggle_dictation(), DictationState::Idle);
    }
    assert_eq!(handle.starts(), 0);
    assert!(session.last_error().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_transcripts_replace_the_draft() {
    let (mut session, handle) = session_with_speech(true);
    session.composer_mut().set_text("typed earlier");
    session.toggle_dictation();

    handle.emit("hel");
    handle.emit("hello");
    assert!(session.poll_events());
    assert_eq!(session.composer().text(), "hello");
}

#[tokio::test(start_paused = true)]
async fn test_no_overwrite_after_stopping_dictation() {
    let (mut session, handle) = session_with_speech(true);
    session.toggle_dictation();
    handle.emit("spoken");
    session.poll_events();

    assert_eq!(session.toggle_dictation(), DictationState::Idle);
    session.composer_mut().set_text("edited by hand");
    assert!(!handle.emit("late transcript"));
    session.poll_events();
    assert_eq!(session.composer().text(), "edited by hand");
}

#[tokio::test(start_paused = true)]
async fn test_send_clears_dictation_transcript() {
    let (mut session, handle) = session_with_speech(true);
    session.toggle_dictation();
    handle.emit("dictated message");
    session.poll_events();

    session.send();
    assert_eq!(handle.resets(), 1);
    assert_eq!(session.composer().text(), "");
    assert_eq!(session.dictation_state(), DictationState::Listening);

    let last = session.messages().pop().unwrap();
    assert_eq!(last.content, "dictated message");
}

#[tokio::test(start_paused = true)]
async fn test_recognition_in_flight_at_send_does_not_refill_draft() {
    let (mut session, handle) = session_with_speech(true);
    session.toggle_dictation();
    handle.emit("hello there");
    session.poll_events();

    // A pass that started before the send finishes after it
    let pass = handle.begin_pass();
    assert!(session.send().is_some());
    assert!(!pass.deliver("hello there friend"));
    session.poll_events();
    assert_eq!(session.composer().text(), "");

    // Recognition after the send fills the draft again
    assert!(handle.emit("next thought"));
    session.poll_events();
    assert_eq!(session.composer().text(), "next thought");
    assert_eq!(session.dictation_state(), DictationState::Listening);
}

#[tokio::test(start_paused = true)]
async fn test_failed_dictation_start_is_reported_not_raised() {
    let (mut session, handle) = session_with_speech(true);
    handle.fail_next_start();

    assert_eq!(session.toggle_dictation(), DictationState::Idle);
    assert!(session.last_error().is_some());

    assert_eq!(session.toggle_dictation(), DictationState::Listening);
    assert!(session.last_error().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_enter_sends_and_shift_enter_does_not() {
    let mut session = session();
    session.composer_mut().set_text("line one");

    assert!(!session.submit_on_enter(KeyPress::shift_enter()));
    assert_eq!(session.messages().len(), 1);
    assert_eq!(session.composer().text(), "line one");

    assert!(session.submit_on_enter(KeyPress::enter()));
    assert_eq!(session.messages().len(), 2);

    // Enter on an empty draft is still consumed but sends nothing
    assert!(session.submit_on_enter(KeyPress::enter()));
    assert_eq!(session.messages().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_injected_parts_and_notifier() {
    let store = MessageStore::new();
    let replies = ReplySimulator::new(
        Duration::from_millis(50),
        Arc::new(PlaceholderReply::new("canned")),
        Handle::current(),
    );
    let mut session = ChatSession::new(
        store.clone(),
        ComposerState::new(4),
        replies,
        SpeechCapture::unsupported(),
    );

    let wakeups = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = Arc::clone(&wakeups);
    session.set_notifier(Some(Arc::new(move || {
        counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    })));

    send_text(&mut session, "ping");
    advance(Duration::from_millis(51)).await;
    assert_eq!(wakeups.load(std::sync::atomic::Ordering::SeqCst), 1);

    session.poll_events();
    let contents: Vec<String> = store.all().into_iter().map(|m| m.content).collect();
    assert_eq!(contents, vec!["ping".to_string(), "canned".to_string()]);
}
