//! An out-of-the-box grocery assistant built on `shopit-core`.
//!
//! The crate wires the built-in tools into a chat session and provides the
//! store directory, file-backed state and configuration. It also ships a
//! terminal front-end for browsing the artifacts of a saved conversation.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod directory;
pub mod http;
pub mod present;
mod session;
pub mod storage;
pub mod tools;

pub use session::{DEFAULT_SYSTEM_PROMPT, SessionBuilder, UserState};

/// Re-exports of [`shopit_core`] crate.
pub mod core {
    pub use shopit_core::*;
}
