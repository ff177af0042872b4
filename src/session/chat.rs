//! The chat session the UI binds to
//!
//! All mutation happens through `&mut ChatSession` on one thread. Work
//! that finishes in the background (reply timers, recognized speech) is
//! queued and applied by [`ChatSession::poll_events`].

use super::composer::ComposerState;
use super::reply::{ReplySimulator, ReplyTicket};
use crate::config::ChatConfig;
use crate::messages::{Message, MessageId, MessageStore};
use crate::speech::{DictationState, SpeechCapture, SpeechProvider};
use crate::utils::Notifier;
use crate::ChatError;
use std::fmt;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Enter,
    Other,
}

/// A key press delivered to the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: KeyCode,
    pub shift: bool,
}

impl KeyPress {
    pub fn enter() -> Self {
        Self {
            key: KeyCode::Enter,
            shift: false,
        }
    }

    pub fn shift_enter() -> Self {
        Self {
            key: KeyCode::Enter,
            shift: true,
        }
    }
}

/// What a successful [`ChatSession::send`] committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sent {
    pub message: MessageId,
    /// Pass to [`ChatSession::cancel_reply`] to withdraw the reply
    pub reply: ReplyTicket,
}

pub struct ChatSession {
    id: SessionId,
    store: MessageStore,
    composer: ComposerState,
    replies: ReplySimulator,
    speech: SpeechCapture,
    last_error: Option<ChatError>,
    closed: bool,
}

impl ChatSession {
    /// Assemble a session from its parts
    pub fn new(
        store: MessageStore,
        composer: ComposerState,
        replies: ReplySimulator,
        speech: SpeechCapture,
    ) -> Self {
        let id = SessionId::new();
        info!(session = %id, "Chat session opened");
        Self {
            id,
            store,
            composer,
            replies,
            speech,
            last_error: None,
            closed: false,
        }
    }

    /// Build a session from configuration, seeding the greeting
    pub fn from_config(
        config: &ChatConfig,
        runtime: Handle,
        provider: Box<dyn SpeechProvider>,
    ) -> Self {
        let store = MessageStore::new();
        if !config.session.greeting.is_empty() {
            store.append(Message::assistant(config.session.greeting.clone()));
        }

        let speech = if config.speech.enabled {
            SpeechCapture::new(provider, config.speech.continuous)
        } else {
            SpeechCapture::unsupported()
        };

        Self::new(
            store,
            ComposerState::new(config.composer.max_rows),
            ReplySimulator::from_config(&config.reply, runtime),
            speech,
        )
    }

    /// Wake the UI whenever a reply becomes ready
    pub fn set_notifier(&mut self, notifier: Option<Notifier>) {
        self.replies.set_notifier(notifier);
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Commit the draft as a user message and schedule the reply.
    ///
    /// Returns `None` without touching anything when the draft is blank
    /// or the session is closed.
    pub fn send(&mut self) -> Option<Sent> {
        if self.closed {
            debug!(session = %self.id, "Send ignored on closed session");
            return None;
        }

        let content = self.composer.take_sendable()?;
        let message = Message::user(content);
        let id = message.id;
        self.store.append(message.clone());
        self.speech.clear_transcript();

        let history = self.store.all();
        let ticket = self.replies.schedule(&history, &message);
        debug!(session = %self.id, %id, ?ticket, "User message sent");
        Some(Sent {
            message: id,
            reply: ticket,
        })
    }

    /// Start dictation when idle, stop it when listening.
    ///
    /// Provider failures leave dictation idle and are kept in
    /// [`ChatSession::last_error`] instead of being returned.
    pub fn toggle_dictation(&mut self) -> DictationState {
        if self.closed {
            return self.speech.state();
        }

        match self.speech.toggle() {
            Ok(state) => {
                self.last_error = None;
                state
            }
            Err(e) => {
                warn!(session = %self.id, "Dictation toggle failed: {}", e);
                self.last_error = Some(e);
                self.speech.state()
            }
        }
    }

    /// Handle a key press in the composer. Returns true when the press
    /// was consumed (plain Enter) and its default action must not run.
    pub fn submit_on_enter(&mut self, key: KeyPress) -> bool {
        if key.key != KeyCode::Enter || key.shift {
            return false;
        }
        self.send();
        true
    }

    /// Apply recognized speech and elapsed replies. Returns true if
    /// anything visible changed.
    pub fn poll_events(&mut self) -> bool {
        if self.closed {
            return false;
        }

        let mut changed = false;

        let was_listening = self.speech.state().is_listening();
        for transcript in self.speech.poll() {
            self.composer.set_text(transcript);
            changed = true;
        }
        changed |= was_listening != self.speech.state().is_listening();

        for reply in self.replies.drain_ready() {
            debug!(
                session = %self.id,
                in_reply_to = %reply.in_reply_to,
                "Reply delivered"
            );
            self.store
                .append(Message::assistant(reply.content).with_created_at(reply.ready_at));
            changed = true;
        }

        changed
    }

    /// Tear the session down: cancel pending replies and release the
    /// microphone. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let cancelled = self.replies.cancel_all();
        if let Err(e) = self.speech.stop() {
            warn!(session = %self.id, "Failed to stop dictation: {}", e);
        }
        info!(session = %self.id, cancelled, "Chat session closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Snapshot of the conversation in display order
    pub fn messages(&self) -> Vec<Message> {
        self.store.all()
    }

    /// Shared handle onto the message list
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn composer(&self) -> &ComposerState {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut ComposerState {
        &mut self.composer
    }

    pub fn can_send(&self) -> bool {
        !self.closed && self.composer.can_send()
    }

    pub fn dictation_state(&self) -> DictationState {
        self.speech.state()
    }

    pub fn speech_supported(&self) -> bool {
        self.speech.is_supported()
    }

    pub fn pending_replies(&self) -> usize {
        self.replies.pending()
    }

    /// Cancel the reply to one message. Returns false once it has been
    /// delivered.
    pub fn cancel_reply(&mut self, ticket: ReplyTicket) -> bool {
        self.replies.cancel(ticket)
    }

    pub fn is_reply_pending(&self, ticket: ReplyTicket) -> bool {
        self.replies.is_pending(ticket)
    }

    pub fn last_error(&self) -> Option<&ChatError> {
        self.last_error.as_ref()
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.close();
    }
}
