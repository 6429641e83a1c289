//! Store events delivered to subscribed consumers.

use super::model::{AnalysisState, ChatMessage, ResumeDocument};

/// Notification emitted synchronously after a store mutation, before the
/// mutating operation returns. Events carry their payload so a renderer can
/// react without re-reading the store; re-reading is also safe because the
/// state lock is released before listeners run.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// A message joined the transcript (user input, an assistant reply, or
    /// a failure sentinel).
    MessageAppended(ChatMessage),
    /// The chat send control should enable or disable.
    ChatPendingChanged(bool),
    /// The analysis moved to a new lifecycle state.
    AnalysisChanged(AnalysisState),
    /// The resume document was overwritten.
    DocumentChanged(ResumeDocument),
    /// The generate control should enable or disable.
    GenerationPendingChanged(bool),
    /// Generation failed; the document was left untouched.
    GenerationFailed(String),
    /// The session returned to its initial state.
    SessionReset,
}

/// Subscriber callback. Kept boxed so the store can hold a heterogeneous
/// list of them.
pub type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;
