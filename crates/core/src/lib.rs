//! Core logic of the grocery assistant: the artifact pipeline, tools,
//! client-side state, retries and the chat session.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod artifact;
pub mod payload;
pub mod retry;
mod session;
pub mod state;
pub mod tool;

pub use artifact::{Artifact, ArtifactsPanel, ToolKind, Widget, extract, render};
pub use retry::RetryPolicy;
pub use session::{ChatSession, SessionBuilder, SessionError};
