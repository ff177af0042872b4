//! The message-session state machine behind the chat pane

pub mod chat;
pub mod composer;
pub mod reply;

pub use chat::{ChatSession, KeyCode, KeyPress, Sent, SessionId};
pub use composer::ComposerState;
pub use reply::{PlaceholderReply, ReplyReady, ReplySimulator, ReplySource, ReplyTicket};
