pub mod storage;
pub mod types;

pub use storage::{MessageStore, StoreEvent};
pub use types::{Message, MessageId, Role};
