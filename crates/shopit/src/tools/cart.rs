use std::future::ready;

use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use shopit_core::payload::CartStatus;
use shopit_core::tool::{Error as ToolError, Tool, ToolResult};

/// The cart tool takes no parameters.
#[derive(Deserialize, JsonSchema)]
pub struct ShoppingCartParameters {}

/// A tool that asks the interface to show the shopping cart.
///
/// The cart lives on the client, so the result only signals success.
pub struct ShoppingCartTool {
    parameter_schema: Value,
}

impl ShoppingCartTool {
    /// Creates a new shopping cart tool.
    #[inline]
    pub fn new() -> Self {
        Self {
            parameter_schema: schema_for!(ShoppingCartParameters).to_value(),
        }
    }
}

impl Default for ShoppingCartTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ShoppingCartTool {
    type Input = ShoppingCartParameters;

    fn name(&self) -> &str {
        "displayShoppingCart"
    }

    fn description(&self) -> &str {
        "Display the current contents of the shopping cart."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        _input: ShoppingCartParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        ready(serde_json::to_value(CartStatus::default()).map_err(|err| {
            ToolError::execution_error().with_reason(err.to_string())
        }))
    }
}
