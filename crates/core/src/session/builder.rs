use shopit_model::{ChatProvider, Transcript};

use super::{ChatSession, UpdateFn};
use super::client::ModelClient;
use crate::retry::RetryPolicy;
use crate::tool::{Tool, Toolbox};

const DEFAULT_MAX_STEPS: usize = 5;

/// [`ChatSession`] builder.
pub struct SessionBuilder {
    pub(super) model_client: ModelClient,
    pub(super) toolbox: Toolbox,
    pub(super) transcript: Transcript,
    pub(super) system_prompt: Option<String>,
    pub(super) retry_policy: RetryPolicy,
    pub(super) max_steps: usize,
    pub(super) on_update: Vec<UpdateFn>,
}

impl SessionBuilder {
    /// Creates a new builder with the specified chat provider.
    #[inline]
    pub fn with_provider<P: ChatProvider + 'static>(provider: P) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            toolbox: Toolbox::new(),
            transcript: Transcript::new(),
            system_prompt: None,
            retry_policy: RetryPolicy::default(),
            max_steps: DEFAULT_MAX_STEPS,
            on_update: vec![],
        }
    }

    /// Sets the instructions sent before the conversation.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        self.toolbox.add_tool(tool);
        self
    }

    /// Sets how rate-limited requests are retried.
    #[inline]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets how many model requests one user message may cause. At least
    /// one request is always made.
    #[inline]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Resumes from a saved transcript.
    #[inline]
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = transcript;
        self
    }

    /// Attaches a callback invoked with the transcript after every change.
    #[inline]
    pub fn on_update(
        mut self,
        on_update: impl Fn(&Transcript) + Send + Sync + 'static,
    ) -> Self {
        self.on_update.push(Box::new(on_update));
        self
    }

    /// Builds the session.
    #[inline]
    pub fn build(self) -> ChatSession {
        ChatSession::from_builder(self)
    }
}
