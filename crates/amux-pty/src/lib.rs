//! In-process PTY session engine.
//!
//! A [`Session`] is spawned as `sh -c "<command>"` attached to a
//! pseudo-terminal. It owns no global state: every session is an
//! independent handle, and creating, closing, or resizing one has no
//! effect on any other. [`spawn_guarded`] wraps detached background work
//! (output pumps, resize loops) so a panic in one session's plumbing can't
//! bring the process down.

mod errors;
mod guard;
mod session;

pub use errors::PtyError;
pub use guard::{set_panic_hook, spawn_guarded};
pub use session::Session;
