//! Shared domain types used across the amux core crates.
//!
//! Decoupled from any single crate's concerns: worktree identity, assistant
//! recipes, resume directives, workspace metadata, and Linear issue-tracker
//! types all live here so `amux-agents`, `amux-manager`, `amux-metadata`,
//! and `amux-linear` can share one vocabulary without depending on each
//! other.

mod assistant;
mod board;
mod linear;
mod metadata;
mod resume;
mod worktree;

pub use assistant::{AssistantConfig, AssistantId};
pub use board::{BoardColumns, BoardConfig, StateMapping};
pub use linear::{
    Issue, IssueAssignee, IssueProject, IssueState, LinearAccount, LinearAuth, LinearTeam, ScopeFilter,
};
pub use metadata::{RuntimeTag, ScriptBlock, ScriptMode, WorkspaceMetadata};
pub use resume::ResumeInfo;
pub use worktree::{Worktree, WorktreeId};

/// Generate a newtype wrapper around `String` with the trait surface the
/// rest of the core relies on (`Display`, `Deref<Target=str>`, `From`).
macro_rules! newtype_string {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

pub(crate) use newtype_string;
