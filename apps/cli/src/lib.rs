//! SkillSense core: AI backend client, session state store, response
//! normalization, and the recent-resumes cache.
//!
//! The CLI in `main.rs` is one consumer of this crate; any other surface
//! (a GUI shell, a TUI) would sit on the same session-store interface and
//! subscribe to the same events.

pub mod api_client;
pub mod config;
pub mod errors;
pub mod export;
pub mod normalize;
pub mod prompts;
pub mod recent;
pub mod session;
