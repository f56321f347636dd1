use std::future::ready;

use schemars::schema_for;
use serde_json::Value;
use shopit_core::payload::Recipe;
use shopit_core::tool::{Error as ToolError, Tool, ToolResult};

/// A tool that shows the ingredients of a dish. The model provides the
/// ingredients and the tool returns them unchanged.
pub struct RecipeIngredientsTool {
    parameter_schema: Value,
}

impl RecipeIngredientsTool {
    /// Creates a new recipe ingredients tool.
    #[inline]
    pub fn new() -> Self {
        Self {
            parameter_schema: schema_for!(Recipe).to_value(),
        }
    }
}

impl Default for RecipeIngredientsTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for RecipeIngredientsTool {
    type Input = Recipe;

    fn name(&self) -> &str {
        "displayRecipeIngredients"
    }

    fn description(&self) -> &str {
        "Display ingredients needed for a specific dish or recipe"
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: Recipe,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        debug!(
            "showing {} ingredients for {}",
            input.ingredients.len(),
            input.dish
        );
        ready(serde_json::to_value(input).map_err(|err| {
            ToolError::execution_error().with_reason(err.to_string())
        }))
    }
}
