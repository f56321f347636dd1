use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user.
    User,
    /// The model.
    Assistant,
    /// System instructions.
    System,
}

/// The lifecycle state of a tool invocation.
///
/// An invocation starts as [`InvocationState::Pending`] and moves to
/// [`InvocationState::Completed`] exactly once. The completed state is
/// terminal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum InvocationState {
    /// The model has requested the call, but no result is available yet.
    #[serde(rename = "call", alias = "partial-call")]
    Pending,
    /// The call has finished with a result payload.
    #[serde(rename = "result")]
    Completed {
        /// The result payload, whose shape depends on the tool.
        result: Value,
    },
}

/// A model-issued request to run a named tool, embedded in a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    /// Name of the tool.
    pub tool_name: String,
    /// The unique identifier of this call.
    pub tool_call_id: String,
    /// Arguments the model passed to the tool.
    #[serde(default)]
    pub args: Value,
    /// Current lifecycle state.
    #[serde(flatten)]
    pub state: InvocationState,
}

impl ToolInvocation {
    /// Creates a pending invocation.
    #[inline]
    pub fn pending<N: Into<String>, I: Into<String>>(
        tool_name: N,
        tool_call_id: I,
        args: Value,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_call_id: tool_call_id.into(),
            args,
            state: InvocationState::Pending,
        }
    }

    /// Moves this invocation to the completed state.
    ///
    /// Completing an already completed invocation is a no-op, the first
    /// result wins.
    pub fn complete(&mut self, result: Value) {
        if self.is_completed() {
            return;
        }
        self.state = InvocationState::Completed { result };
    }

    /// Returns `true` if the invocation has a result.
    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self.state, InvocationState::Completed { .. })
    }

    /// Returns the result payload, if completed.
    #[inline]
    pub fn result(&self) -> Option<&Value> {
        match &self.state {
            InvocationState::Completed { result } => Some(result),
            InvocationState::Pending => None,
        }
    }
}

/// A single message in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Identifier of the message, unique within a transcript.
    pub id: String,
    /// The author.
    pub role: Role,
    /// Text content.
    #[serde(default)]
    pub content: String,
    /// Tool invocations issued in this message, in call order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_invocations: Vec<ToolInvocation>,
}

impl Message {
    /// Creates a message without tool invocations.
    #[inline]
    pub fn new<I: Into<String>, S: Into<String>>(
        id: I,
        role: Role,
        content: S,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            tool_invocations: vec![],
        }
    }

    /// Creates a user message.
    #[inline]
    pub fn user<I: Into<String>, S: Into<String>>(id: I, content: S) -> Self {
        Self::new(id, Role::User, content)
    }

    /// Creates an assistant message.
    #[inline]
    pub fn assistant<I: Into<String>, S: Into<String>>(
        id: I,
        content: S,
    ) -> Self {
        Self::new(id, Role::Assistant, content)
    }

    /// Creates a system message.
    #[inline]
    pub fn system<I: Into<String>, S: Into<String>>(id: I, content: S) -> Self {
        Self::new(id, Role::System, content)
    }

    /// Attaches a tool invocation.
    #[inline]
    pub fn with_invocation(mut self, invocation: ToolInvocation) -> Self {
        self.tool_invocations.push(invocation);
        self
    }
}

/// The ordered conversation history.
///
/// Insertion order is conversation order. On the wire a transcript is a
/// plain JSON array of messages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates an empty transcript.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the messages in conversation order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Appends a message.
    #[inline]
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Returns the last message for in-place updates.
    #[inline]
    pub fn last_mut(&mut self) -> Option<&mut Message> {
        self.messages.last_mut()
    }

    /// Returns `true` if there are no messages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Iterates over every tool invocation in the transcript, in
    /// conversation order.
    pub fn invocations(&self) -> impl Iterator<Item = &ToolInvocation> {
        self.messages
            .iter()
            .flat_map(|msg| msg.tool_invocations.iter())
    }

    /// Finds an invocation by its call id.
    pub fn invocation_mut(
        &mut self,
        tool_call_id: &str,
    ) -> Option<&mut ToolInvocation> {
        self.messages
            .iter_mut()
            .flat_map(|msg| msg.tool_invocations.iter_mut())
            .find(|inv| inv.tool_call_id == tool_call_id)
    }
}

impl From<Vec<Message>> for Transcript {
    #[inline]
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_chat_history() {
        let raw = json!([
            { "id": "1", "role": "user", "content": "Pasta please" },
            {
                "id": "2",
                "role": "assistant",
                "content": "",
                "toolInvocations": [
                    {
                        "toolName": "displayRecipeIngredients",
                        "toolCallId": "call_1",
                        "state": "result",
                        "args": { "dish": "Pasta" },
                        "result": { "dish": "Pasta", "ingredients": [] }
                    },
                    {
                        "toolName": "video_recipe",
                        "toolCallId": "call_2",
                        "state": "partial-call",
                        "args": {}
                    }
                ]
            }
        ]);
        let transcript: Transcript = serde_json::from_value(raw).unwrap();
        assert_eq!(transcript.len(), 2);

        let invocations: Vec<_> = transcript.invocations().collect();
        assert_eq!(invocations.len(), 2);
        assert_eq!(
            invocations[0].result(),
            Some(&json!({ "dish": "Pasta", "ingredients": [] }))
        );
        assert_eq!(invocations[1].state, InvocationState::Pending);
    }

    #[test]
    fn test_serialize_skips_empty_invocations() {
        let transcript =
            Transcript::from(vec![Message::user("msg:0", "Hello")]);
        let value = serde_json::to_value(&transcript).unwrap();
        assert_eq!(
            value,
            json!([{ "id": "msg:0", "role": "user", "content": "Hello" }])
        );
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut inv = ToolInvocation::pending("t", "call_1", json!({}));
        assert!(inv.result().is_none());

        inv.complete(json!({ "ok": true }));
        inv.complete(json!({ "ok": false }));
        assert_eq!(inv.result(), Some(&json!({ "ok": true })));
    }

    #[test]
    fn test_invocation_mut() {
        let mut transcript = Transcript::new();
        transcript.push(Message::assistant("msg:1", "").with_invocation(
            ToolInvocation::pending("t", "call_9", Value::Null),
        ));
        transcript
            .invocation_mut("call_9")
            .unwrap()
            .complete(json!(1));
        assert!(transcript.invocations().all(ToolInvocation::is_completed));
        assert!(transcript.invocation_mut("missing").is_none());
    }
}
