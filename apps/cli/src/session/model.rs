//! Session data model.

use crate::normalize::AnalysisResult;

/// Role of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single transcript entry. Immutable once created; the transcript only
/// grows until the session is reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Where the current resume document came from. Last write wins; there is
/// no version history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeSource {
    UserAuthored,
    AiGenerated,
}

/// The editable resume document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDocument {
    pub content: String,
    pub source: ResumeSource,
}

impl Default for ResumeDocument {
    fn default() -> Self {
        Self {
            content: String::new(),
            source: ResumeSource::UserAuthored,
        }
    }
}

/// Lifecycle of one analysis request. `Ready` and `Failed` persist until the
/// next submission or a session reset replaces them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisState {
    #[default]
    Idle,
    Pending,
    Ready(AnalysisResult),
    Failed(String),
}
