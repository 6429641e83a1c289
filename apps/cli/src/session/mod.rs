//! Session state and the store that owns it.

pub mod event;
pub mod model;
pub mod store;

pub use event::StoreEvent;
pub use model::{AnalysisState, ChatMessage, MessageRole, ResumeDocument, ResumeSource};
pub use store::SessionStore;
