use std::collections::HashMap;
use std::pin::Pin;

use serde_json::Value;
use shopit_model::ToolDefinition;

use super::object::{ToolObject, ToolObjectImpl};
use super::{Tool, ToolResult};

/// The set of tools available to the model.
#[derive(Default)]
pub struct Toolbox {
    tools: HashMap<String, Box<dyn ToolObject>>,
}

impl Toolbox {
    /// Creates an empty toolbox.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool, replacing any tool with the same name.
    pub fn add_tool<T: Tool>(&mut self, tool: T) {
        let name = tool.name().to_owned();
        if self.tools.insert(name, Box::new(ToolObjectImpl(tool))).is_some() {
            warn!("tool registered twice, the last one wins");
        }
    }

    /// Returns the number of registered tools.
    #[inline]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tool is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Returns the definitions of every tool, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<_> = self
            .tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_owned(),
                description: tool.description().to_owned(),
                parameters: tool.parameter_schema().clone(),
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Starts executing the named tool.
    ///
    /// Returns `None` if the tool isn't registered. Arguments that don't
    /// match the tool input produce an `InvalidInput` error.
    pub fn execute(
        &self,
        name: &str,
        arguments: Value,
    ) -> Option<Pin<Box<dyn Future<Output = ToolResult> + Send>>> {
        let Some(tool) = self.tools.get(name) else {
            warn!("tool not found: {name}");
            return None;
        };
        trace!("executing {name} with args: {arguments:?}");
        Some(tool.execute(arguments))
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;

    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::tool::ErrorKind;

    static EMPTY_SCHEMA: &Value = &Value::Null;

    #[derive(Deserialize)]
    struct EchoInput {
        word: String,
    }

    struct EchoTool;

    impl Tool for EchoTool {
        type Input = EchoInput;

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes a word"
        }

        fn parameter_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn execute(
            &self,
            input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Ok(json!({ "word": input.word })))
        }
    }

    struct CountTool;

    impl Tool for CountTool {
        type Input = Value;

        fn name(&self) -> &str {
            "count"
        }

        fn description(&self) -> &str {
            "Counts nothing"
        }

        fn parameter_schema(&self) -> &Value {
            EMPTY_SCHEMA
        }

        fn execute(
            &self,
            _input: Self::Input,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Ok(json!(0)))
        }
    }

    #[tokio::test]
    async fn test_execute() {
        let mut toolbox = Toolbox::new();
        toolbox.add_tool(EchoTool);

        let result = toolbox
            .execute("echo", json!({ "word": "basil" }))
            .unwrap()
            .await;
        assert_eq!(result, Ok(json!({ "word": "basil" })));

        let err = toolbox
            .execute("echo", json!({ "wrong": 1 }))
            .unwrap()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        assert!(toolbox.execute("missing", json!({})).is_none());
    }

    #[test]
    fn test_definitions_sorted() {
        let mut toolbox = Toolbox::new();
        toolbox.add_tool(EchoTool);
        toolbox.add_tool(CountTool);
        toolbox.add_tool(CountTool);
        assert_eq!(toolbox.len(), 2);

        let names: Vec<_> = toolbox
            .definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["count", "echo"]);
    }
}
