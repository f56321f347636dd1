mod builder;
mod client;
#[cfg(test)]
mod tests;

use serde_json::{Value, json};
use shopit_model::{
    ChatEvent, ChatRequest, ErrorKind, FinishReason, Message, Role, ToolCall,
    ToolInvocation, Transcript,
};

use crate::retry::RetryPolicy;
use crate::tool::{Error as ToolError, Toolbox};
pub use builder::SessionBuilder;
use client::ModelClient;

type UpdateFn = Box<dyn Fn(&Transcript) + Send + Sync>;

const SYSTEM_MESSAGE_ID: &str = "system";

/// Errors returned by [`ChatSession::send_message`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The message has no text.
    #[error("cannot send an empty message")]
    EmptyMessage,
    /// The chat provider failed.
    #[error("{kind}: {message}")]
    Provider {
        /// What kind of failure the provider reported.
        kind: ErrorKind,
        /// The provider's description of the failure.
        message: String,
    },
}

impl SessionError {
    #[inline]
    fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            SessionError::Provider {
                kind: ErrorKind::RateLimitExceeded,
                ..
            }
        )
    }
}

/// A chat session, which owns the transcript and drives the provider and
/// the tools.
///
/// Use [`SessionBuilder`] to create one.
pub struct ChatSession {
    client: ModelClient,
    toolbox: Toolbox,
    transcript: Transcript,
    system_prompt: Option<String>,
    retry_policy: RetryPolicy,
    max_steps: usize,
    on_update: Vec<UpdateFn>,
    next_message_id: usize,
}

impl ChatSession {
    fn from_builder(builder: SessionBuilder) -> Self {
        let SessionBuilder {
            model_client,
            toolbox,
            transcript,
            system_prompt,
            retry_policy,
            max_steps,
            on_update,
        } = builder;
        let next_message_id = transcript.len();
        Self {
            client: model_client,
            toolbox,
            transcript,
            system_prompt,
            retry_policy,
            max_steps,
            on_update,
            next_message_id,
        }
    }

    /// Returns the transcript so far.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Consumes the session and returns its transcript.
    #[inline]
    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }

    /// Forgets the conversation.
    pub fn reset(&mut self) {
        self.transcript = Transcript::new();
        self.next_message_id = 0;
        self.notify();
    }

    /// Sends a user message and runs the model until it stops calling
    /// tools or the step limit is reached.
    ///
    /// The transcript keeps everything received before a failure.
    pub async fn send_message<S: Into<String>>(
        &mut self,
        text: S,
    ) -> Result<(), SessionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let user_id = self.message_id();
        self.transcript.push(Message::user(user_id, text));
        let assistant_id = self.message_id();
        self.transcript.push(Message::assistant(assistant_id, ""));
        self.notify();

        for step in 1..=self.max_steps {
            debug!("running step {step}");
            let (finish_reason, calls) = self.run_step().await?;
            if finish_reason != FinishReason::ToolCalls || calls.is_empty() {
                return Ok(());
            }
            for call in calls {
                self.run_tool(call).await;
            }
        }
        warn!("stopped after {} steps", self.max_steps);
        Ok(())
    }

    async fn run_step(
        &mut self,
    ) -> Result<(FinishReason, Vec<ToolCall>), SessionError> {
        let request = self.make_request();
        let client = &self.client;
        let mut response = self
            .retry_policy
            .run(SessionError::is_rate_limited, || {
                client.send_request(request.clone())
            })
            .await?;

        let mut finish_reason = FinishReason::Stop;
        let mut calls = vec![];
        while let Some(event) = response.next_event().await? {
            trace!("got an event: {event:?}");
            match event {
                ChatEvent::TextDelta(delta) => {
                    if let Some(msg) = self.transcript.last_mut() {
                        msg.content.push_str(&delta);
                    }
                }
                ChatEvent::ToolCall(call) => {
                    let invocation = ToolInvocation::pending(
                        &call.name,
                        &call.id,
                        call.arguments.clone(),
                    );
                    if let Some(msg) = self.transcript.last_mut() {
                        msg.tool_invocations.push(invocation);
                    }
                    calls.push(call);
                }
                ChatEvent::Finished(reason) => {
                    finish_reason = reason;
                    continue;
                }
            }
            self.notify();
        }
        Ok((finish_reason, calls))
    }

    async fn run_tool(&mut self, call: ToolCall) {
        let ToolCall {
            id,
            name,
            arguments,
        } = call;
        let result = match self.toolbox.execute(&name, arguments) {
            Some(fut) => match fut.await {
                Ok(result) => result,
                Err(err) => {
                    warn!("tool {name} failed: {err}");
                    error_result(&err)
                }
            },
            None => error_result(
                &ToolError::not_found().with_reason(format!("unknown tool: {name}")),
            ),
        };
        match self.transcript.invocation_mut(&id) {
            Some(invocation) => invocation.complete(result),
            None => error!("invocation {id} disappeared"),
        }
        self.notify();
    }

    fn make_request(&self) -> ChatRequest {
        let has_system = self
            .transcript
            .messages()
            .iter()
            .any(|msg| msg.role == Role::System);
        let prompt = self
            .system_prompt
            .as_ref()
            .filter(|_| !has_system)
            .map(|prompt| Message::system(SYSTEM_MESSAGE_ID, prompt.as_str()));
        let messages = prompt
            .into_iter()
            .chain(
                self.transcript
                    .messages()
                    .iter()
                    .filter(|msg| !is_blank_assistant(msg))
                    .cloned(),
            )
            .collect();
        ChatRequest {
            messages,
            tools: self.toolbox.definitions(),
        }
    }

    fn message_id(&mut self) -> String {
        loop {
            let id = format!("msg:{}", self.next_message_id);
            self.next_message_id += 1;
            if !self.transcript.messages().iter().any(|msg| msg.id == id) {
                return id;
            }
        }
    }

    fn notify(&self) {
        for on_update in &self.on_update {
            on_update(&self.transcript);
        }
    }
}

#[inline]
fn is_blank_assistant(msg: &Message) -> bool {
    msg.role == Role::Assistant
        && msg.content.is_empty()
        && msg.tool_invocations.is_empty()
}

#[inline]
fn error_result(err: &ToolError) -> Value {
    json!({ "error": err.reason() })
}
