//! Conversation data model and the chat-provider protocol.
//!
//! This crate defines the transcript shared by the chat session and the
//! artifacts panel, along with the traits a model provider implements to
//! stream responses into it.
//!
//! Types in this crate don't define any behavior beyond trivial accessors,
//! they are the constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;
mod transcript;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
pub use transcript::*;
