//! Typed shapes of tool inputs and results.
//!
//! Results travel through the transcript as raw JSON, so every field here
//! has a default. A result missing a field still decodes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of videos a video search returns.
pub const MAX_VIDEOS: usize = 6;

/// An ingredient with its quantity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Ingredient {
    /// The name of the ingredient
    #[serde(default)]
    pub name: String,
    /// The quantity of the ingredient
    #[serde(default)]
    pub quantity: f64,
    /// The unit of measurement for the ingredient (e.g., grams, cups,
    /// tablespoons)
    #[serde(default)]
    pub unit: String,
}

impl Ingredient {
    /// Creates an ingredient.
    #[inline]
    pub fn new<N: Into<String>, U: Into<String>>(
        name: N,
        quantity: f64,
        unit: U,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

/// Ingredients for a dish, the result of the recipe tool.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Recipe {
    /// The name of the dish or recipe
    #[serde(default)]
    pub dish: String,
    /// List of ingredients required for the dish
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

/// A single video search hit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// The unique ID of the YouTube video.
    #[serde(default)]
    pub video_id: String,
    /// The title of the YouTube video.
    #[serde(default)]
    pub title: String,
    /// URL of the video's medium quality thumbnail image.
    #[serde(default)]
    pub thumbnail_url: String,
    /// The name of the YouTube channel that uploaded the video.
    #[serde(default)]
    pub channel_title: String,
    /// Direct URL to watch the video on YouTube.
    #[serde(default)]
    pub video_url: String,
}

/// The result of the video search tool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoResults {
    /// A list of the top relevant YouTube recipe videos found.
    #[serde(default)]
    pub videos: Vec<Video>,
}

/// A webpage converted to markdown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScrapedPage {
    /// The Markdown content scraped from the webpage.
    #[serde(default)]
    pub markdown: String,
    /// Diagnostics recorded while scraping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

/// The result of the shopping cart tool, which only triggers the cart view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CartStatus {
    /// Always `"success"`.
    pub status: String,
}

impl Default for CartStatus {
    #[inline]
    fn default() -> Self {
        Self {
            status: "success".to_owned(),
        }
    }
}

/// Decodes a result payload, falling back to the default shape when the
/// payload is malformed.
pub fn decode_or_default<T: serde::de::DeserializeOwned + Default>(
    value: &Value,
) -> T {
    match T::deserialize(value) {
        Ok(decoded) => decoded,
        Err(err) => {
            debug!("malformed tool result, using defaults: {err}");
            T::default()
        }
    }
}

/// Merges ingredients with the same name and unit, summing quantities.
///
/// The first occurrence decides the position of a merged line.
pub fn aggregate(items: &[Ingredient]) -> Vec<Ingredient> {
    let mut merged: Vec<Ingredient> = Vec::with_capacity(items.len());
    for item in items {
        match merged
            .iter_mut()
            .find(|m| m.name == item.name && m.unit == item.unit)
        {
            Some(existing) => existing.quantity += item.quantity,
            None => merged.push(item.clone()),
        }
    }
    merged
}
