//! Assistant registry, resume command planning, and per-assistant session
//! discovery.

mod discovery;
mod errors;
mod registry;
mod resume;

pub use discovery::{
    discover_amp_sessions, discover_codex_sessions, discover_gemini_sessions,
    discover_opencode_sessions, select_candidate, SessionCandidate,
};
pub use errors::AgentsError;
pub use registry::AssistantRegistry;
pub use resume::plan_resume_command;
