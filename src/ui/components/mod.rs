//! Reusable pieces of the chat window

pub mod header;
pub mod input_bar;
pub mod message_list;
pub mod sidebar;

pub use header::Header;
pub use input_bar::InputBar;
pub use message_list::MessageList;
pub use sidebar::Sidebar;
