//! Artifacts derived from completed tool invocations.
//!
//! The pipeline is linear: a [`Transcript`] goes through [`extract`] to
//! get the artifact list (newest first), a [`Selector`] picks the active
//! artifact, and [`render`] turns it into a [`Widget`]. [`ArtifactsPanel`]
//! bundles the three for a UI that re-renders on every transcript change.

mod checklist;
mod panel;
mod selector;
mod widget;

use std::fmt::{self, Display};

use serde_json::Value;
use shopit_model::{ToolInvocation, Transcript};

pub use checklist::IngredientChecklist;
pub use panel::{ArtifactsPanel, PanelEntry};
pub use selector::Selector;
pub use widget::{CartView, Widget, render};

/// Label used when a recipe result has no dish name.
pub const UNKNOWN_DISH: &str = "Unknown";

/// The known tools that produce artifacts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// `displayRecipeIngredients`
    RecipeIngredients,
    /// `displayShoppingCart`
    ShoppingCart,
    /// `video_recipe`
    VideoRecipe,
    /// `webpage_scraper`
    WebpageScraper,
    /// Any tool this crate doesn't know how to present.
    Other(String),
}

impl ToolKind {
    /// Maps a tool name to its kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "displayRecipeIngredients" => ToolKind::RecipeIngredients,
            "displayShoppingCart" => ToolKind::ShoppingCart,
            "video_recipe" => ToolKind::VideoRecipe,
            "webpage_scraper" => ToolKind::WebpageScraper,
            other => ToolKind::Other(other.to_owned()),
        }
    }

    /// Returns the tool name as the model sees it.
    pub fn name(&self) -> &str {
        match self {
            ToolKind::RecipeIngredients => "displayRecipeIngredients",
            ToolKind::ShoppingCart => "displayShoppingCart",
            ToolKind::VideoRecipe => "video_recipe",
            ToolKind::WebpageScraper => "webpage_scraper",
            ToolKind::Other(name) => name,
        }
    }
}

impl Display for ToolKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A read-only projection of one completed tool invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    tool_name: String,
    call_id: String,
    result: Value,
    label: String,
}

impl Artifact {
    fn from_invocation(invocation: &ToolInvocation) -> Option<Self> {
        let result = invocation.result()?;
        let kind = ToolKind::from_name(&invocation.tool_name);
        Some(Self {
            label: label_for(&kind, result),
            tool_name: invocation.tool_name.clone(),
            call_id: invocation.tool_call_id.clone(),
            result: result.clone(),
        })
    }

    /// Returns the name of the tool that produced this artifact.
    #[inline]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the kind of the producing tool.
    #[inline]
    pub fn kind(&self) -> ToolKind {
        ToolKind::from_name(&self.tool_name)
    }

    /// Returns the call id, which is unique within an artifact list.
    #[inline]
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// Returns the raw result payload.
    #[inline]
    pub fn result(&self) -> &Value {
        &self.result
    }

    /// Returns the human-readable label for lists and headers.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Derives the artifact list from a transcript, most recent result first.
///
/// Only invocations that have a result are included. A malformed result
/// never fails the extraction, it only degrades the label.
pub fn extract(transcript: &Transcript) -> Vec<Artifact> {
    let mut artifacts: Vec<Artifact> = transcript
        .invocations()
        .filter_map(Artifact::from_invocation)
        .collect();
    artifacts.reverse();
    artifacts
}

fn label_for(kind: &ToolKind, result: &Value) -> String {
    match kind {
        ToolKind::RecipeIngredients => {
            let dish = result
                .get("dish")
                .and_then(Value::as_str)
                .filter(|dish| !dish.is_empty())
                .unwrap_or(UNKNOWN_DISH);
            format!("Recipe: {dish}")
        }
        ToolKind::ShoppingCart => "Shopping Cart".to_owned(),
        other => other.name().to_owned(),
    }
}
