use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Message;

/// A request to be sent to the chat provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatRequest {
    /// The conversation so far, including completed tool results.
    pub messages: Vec<Message>,
    /// Tools that are available to the model.
    pub tools: Vec<ToolDefinition>,
}

/// Describes a tool that can be called by the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// Parameters definition of the tool.
    ///
    /// For most model providers, the parameters should typically be
    /// defined by a [JSON schema](https://json-schema.org/).
    pub parameters: Value,
}
