//! The session state store.
//!
//! One store owns the chat transcript, the current analysis, and the resume
//! document for the lifetime of a process session. State lives behind a
//! mutex and every operation goes through `&self`, so overlapping requests
//! are expressible; each response carries a request token and a stale
//! response can never clobber a newer one.
//!
//! Locking discipline: the state lock is never held across an await point
//! or while listeners run. Mutate, release, then notify.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::api_client::AiBackend;
use crate::errors::AppError;
use crate::normalize::{normalize, AnalysisResult};
use crate::prompts::ANALYSIS_PROMPT_TEMPLATE;

use super::event::{Listener, StoreEvent};
use super::model::{AnalysisState, ChatMessage, ResumeDocument, ResumeSource};

/// Transcript sentinel appended when the chat endpoint cannot be reached.
pub const CHAT_CONNECTION_FAILED: &str =
    "Connection failed. Please check if your backend is running.";
/// Transcript sentinel appended when the backend reports a chat failure.
pub const CHAT_REQUEST_FAILED: &str = "Something went wrong. Try again!";
/// Assistant body used when the backend succeeds without any reply text.
pub const EMPTY_REPLY: &str = "Sorry, I couldn’t generate a reply.";
/// Analysis failure message for a resume the backend rejected.
pub const ANALYSIS_REJECTED: &str = "Could not analyze resume. Try another file.";
/// Analysis failure message when the backend cannot be reached.
pub const ANALYSIS_CONNECTION_FAILED: &str = "Server error! Check your backend connection.";
/// Generation failure marker when the backend returned nothing usable.
pub const GENERATION_FAILED: &str = "Unable to generate resume. Try again!";
/// Generation failure marker when the backend cannot be reached.
pub const GENERATION_CONNECTION_FAILED: &str =
    "Error generating resume. Please check backend connection.";

/// Per-kind request counters. A response is applied only while its token is
/// still current; anything else is stale and dropped.
#[derive(Debug, Default)]
struct RequestTokens {
    chat: u64,
    analysis: u64,
    generation: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    transcript: Vec<ChatMessage>,
    analysis: AnalysisState,
    document: ResumeDocument,
    generation_error: Option<String>,
    chat_pending: bool,
    generation_pending: bool,
    tokens: RequestTokens,
}

/// Session-scoped state store. Construct one per session and hand it to
/// whatever surface renders it; all mutation goes through the operations
/// below and every mutation is announced through [`StoreEvent`]s before the
/// operation returns.
pub struct SessionStore {
    id: Uuid,
    backend: Arc<dyn AiBackend>,
    state: Mutex<SessionState>,
    listeners: Mutex<Vec<Listener>>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn AiBackend>) -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, "session store created");
        Self {
            id,
            backend,
            state: Mutex::new(SessionState::default()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Registers a listener for every subsequent store event. Listeners run
    /// synchronously on the mutating call, in subscription order.
    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) {
        self.listeners.lock().unwrap().push(Box::new(listener));
    }

    // ────────────────────────────────────────────────────────────────────
    // Read surface
    // ────────────────────────────────────────────────────────────────────

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.state.lock().unwrap().transcript.clone()
    }

    pub fn analysis(&self) -> AnalysisState {
        self.state.lock().unwrap().analysis.clone()
    }

    pub fn document(&self) -> ResumeDocument {
        self.state.lock().unwrap().document.clone()
    }

    pub fn generation_error(&self) -> Option<String> {
        self.state.lock().unwrap().generation_error.clone()
    }

    pub fn chat_pending(&self) -> bool {
        self.state.lock().unwrap().chat_pending
    }

    pub fn generation_pending(&self) -> bool {
        self.state.lock().unwrap().generation_pending
    }

    // ────────────────────────────────────────────────────────────────────
    // Chat
    // ────────────────────────────────────────────────────────────────────

    /// Sends one user message through the chat endpoint.
    ///
    /// Whitespace-only input is a no-op, not an error. Failures never
    /// propagate: the transcript is the single channel for both content and
    /// errors, so a failed request appends a sentinel assistant message and
    /// the call still completes normally.
    pub async fn send_chat_message(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let message = ChatMessage::user(text);
        let token = {
            let mut state = self.state.lock().unwrap();
            state.transcript.push(message.clone());
            state.chat_pending = true;
            state.tokens.chat += 1;
            state.tokens.chat
        };
        self.notify(StoreEvent::MessageAppended(message));
        self.notify(StoreEvent::ChatPendingChanged(true));

        let reply = match self.backend.chat(text).await {
            Ok(response) if response.success => response
                .reply
                .filter(|reply| !reply.trim().is_empty())
                .unwrap_or_else(|| EMPTY_REPLY.to_string()),
            Ok(_) => CHAT_REQUEST_FAILED.to_string(),
            Err(error) => {
                warn!(session = %self.id, %error, "chat request failed");
                CHAT_CONNECTION_FAILED.to_string()
            }
        };

        let message = ChatMessage::assistant(reply);
        {
            let mut state = self.state.lock().unwrap();
            if state.tokens.chat != token {
                debug!(session = %self.id, "discarding stale chat response");
                return;
            }
            state.transcript.push(message.clone());
            state.chat_pending = false;
        }
        self.notify(StoreEvent::MessageAppended(message));
        self.notify(StoreEvent::ChatPendingChanged(false));
    }

    // ────────────────────────────────────────────────────────────────────
    // Analysis
    // ────────────────────────────────────────────────────────────────────

    /// Uploads a resume PDF for analysis.
    ///
    /// Validation failures (missing file, wrong extension) return an error
    /// before any network call and leave the session untouched. Request
    /// failures land in the analysis state, never in the return value.
    pub async fn analyze_resume_file(&self, path: &Path) -> Result<(), AppError> {
        let (file_name, bytes) = read_resume_file(path).await?;
        let token = self.begin_analysis();
        let next = match self.backend.analyze_resume(&file_name, bytes).await {
            Ok(response) if response.success => {
                AnalysisState::Ready(AnalysisResult::from_upload(response))
            }
            Ok(_) => AnalysisState::Failed(ANALYSIS_REJECTED.to_string()),
            Err(error) => {
                warn!(session = %self.id, %error, "resume upload failed");
                AnalysisState::Failed(ANALYSIS_CONNECTION_FAILED.to_string())
            }
        };
        self.apply_analysis(token, next);
        Ok(())
    }

    /// Scores pasted resume text by sending the pinned report prompt through
    /// the chat endpoint and normalizing the reply.
    pub async fn analyze_resume_text(&self, text: &str) -> Result<(), AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Resume text is empty.".to_string()));
        }
        let prompt = ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", text);
        let token = self.begin_analysis();
        let next = match self.backend.chat(&prompt).await {
            Ok(response) if response.success => {
                let reply = response.reply.unwrap_or_default();
                AnalysisState::Ready(normalize(&reply))
            }
            Ok(_) => AnalysisState::Failed(ANALYSIS_REJECTED.to_string()),
            Err(error) => {
                warn!(session = %self.id, %error, "resume text analysis failed");
                AnalysisState::Failed(ANALYSIS_CONNECTION_FAILED.to_string())
            }
        };
        self.apply_analysis(token, next);
        Ok(())
    }

    /// Moves the analysis to `Pending`, clearing any prior result, and
    /// issues the request token for this submission.
    fn begin_analysis(&self) -> u64 {
        let token = {
            let mut state = self.state.lock().unwrap();
            state.analysis = AnalysisState::Pending;
            state.tokens.analysis += 1;
            state.tokens.analysis
        };
        self.notify(StoreEvent::AnalysisChanged(AnalysisState::Pending));
        token
    }

    fn apply_analysis(&self, token: u64, next: AnalysisState) {
        {
            let mut state = self.state.lock().unwrap();
            if state.tokens.analysis != token {
                debug!(session = %self.id, "discarding stale analysis response");
                return;
            }
            state.analysis = next.clone();
        }
        self.notify(StoreEvent::AnalysisChanged(next));
    }

    // ────────────────────────────────────────────────────────────────────
    // Resume document
    // ────────────────────────────────────────────────────────────────────

    /// Requests a generated resume. On success the document is overwritten
    /// (last write wins, source `AiGenerated`); on failure the document is
    /// left unchanged and the generation error marker is set instead.
    pub async fn generate_resume(&self, prompt: &str) {
        let token = {
            let mut state = self.state.lock().unwrap();
            state.generation_pending = true;
            state.generation_error = None;
            state.tokens.generation += 1;
            state.tokens.generation
        };
        self.notify(StoreEvent::GenerationPendingChanged(true));

        let generated = match self.backend.generate_resume(prompt).await {
            Ok(response) => response
                .resume
                .filter(|resume| !resume.trim().is_empty())
                .ok_or_else(|| GENERATION_FAILED.to_string()),
            Err(error) => {
                warn!(session = %self.id, %error, "resume generation failed");
                Err(GENERATION_CONNECTION_FAILED.to_string())
            }
        };

        let applied = {
            let mut state = self.state.lock().unwrap();
            if state.tokens.generation != token {
                debug!(session = %self.id, "discarding stale generation response");
                return;
            }
            state.generation_pending = false;
            match generated {
                Ok(content) => {
                    state.document = ResumeDocument {
                        content,
                        source: ResumeSource::AiGenerated,
                    };
                    Ok(state.document.clone())
                }
                Err(message) => {
                    state.generation_error = Some(message.clone());
                    Err(message)
                }
            }
        };
        match applied {
            Ok(document) => self.notify(StoreEvent::DocumentChanged(document)),
            Err(message) => self.notify(StoreEvent::GenerationFailed(message)),
        }
        self.notify(StoreEvent::GenerationPendingChanged(false));
    }

    /// Replaces the document with manually edited text. Local only, no
    /// network call; clears any stale generation error.
    pub fn update_resume(&self, content: impl Into<String>) {
        let document = ResumeDocument {
            content: content.into(),
            source: ResumeSource::UserAuthored,
        };
        {
            let mut state = self.state.lock().unwrap();
            state.document = document.clone();
            state.generation_error = None;
        }
        self.notify(StoreEvent::DocumentChanged(document));
    }

    /// Returns the session to its initial state and bumps every request
    /// token, so responses still in flight are discarded when they land.
    pub fn reset(&self) {
        {
            let mut state = self.state.lock().unwrap();
            state.transcript.clear();
            state.analysis = AnalysisState::Idle;
            state.document = ResumeDocument::default();
            state.generation_error = None;
            state.chat_pending = false;
            state.generation_pending = false;
            state.tokens.chat += 1;
            state.tokens.analysis += 1;
            state.tokens.generation += 1;
        }
        self.notify(StoreEvent::SessionReset);
    }

    fn notify(&self, event: StoreEvent) {
        let listeners = self.listeners.lock().unwrap();
        for listener in listeners.iter() {
            listener(&event);
        }
    }
}

/// Validates and reads a resume file before upload: it must exist, be a
/// regular file, and carry a `.pdf` extension, the only format the backend
/// accepts.
async fn read_resume_file(path: &Path) -> Result<(String, Vec<u8>), AppError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| AppError::Validation("Please select a PDF file first.".to_string()))?;
    if !metadata.is_file() {
        return Err(AppError::Validation(
            "Please select a PDF file first.".to_string(),
        ));
    }
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !is_pdf {
        return Err(AppError::Validation(
            "Only PDF files are supported.".to_string(),
        ));
    }
    let bytes = tokio::fs::read(path).await.map_err(|error| {
        AppError::Validation(format!("Could not read {}: {error}", path.display()))
    })?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("resume.pdf")
        .to_string();
    Ok((file_name, bytes))
}
