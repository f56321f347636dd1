use super::{Artifact, ToolKind, UNKNOWN_DISH};
use crate::payload::{
    Ingredient, Recipe, ScrapedPage, Video, VideoResults, aggregate,
    decode_or_default,
};

/// The shopping cart as shown to the user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartView {
    /// Cart lines, merged by name and unit.
    pub lines: Vec<Ingredient>,
}

impl CartView {
    /// Builds the view from raw cart items.
    #[inline]
    pub fn from_items(items: &[Ingredient]) -> Self {
        Self {
            lines: aggregate(items),
        }
    }

    /// Returns `true` if the cart has no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// What the artifacts panel displays for one artifact.
#[derive(Clone, Debug, PartialEq)]
pub enum Widget {
    /// The ingredient list of a recipe.
    Ingredients(Recipe),
    /// The current shopping cart.
    ShoppingCart(CartView),
    /// A grid of recipe videos, never empty.
    Videos(Vec<Video>),
    /// A video search that found nothing.
    NoVideos,
    /// Markdown scraped from a webpage.
    Markdown(ScrapedPage),
    /// Placeholder for tools without a presentation.
    Unsupported {
        /// Name of the tool.
        tool_name: String,
    },
}

/// Renders an artifact into a widget.
///
/// `cart_items` is the current cart content, since the cart tool result
/// doesn't carry any items. Malformed results render with placeholder
/// values rather than failing.
pub fn render(artifact: &Artifact, cart_items: &[Ingredient]) -> Widget {
    match artifact.kind() {
        ToolKind::RecipeIngredients => {
            let mut recipe: Recipe = decode_or_default(artifact.result());
            if recipe.dish.is_empty() {
                recipe.dish = UNKNOWN_DISH.to_owned();
            }
            Widget::Ingredients(recipe)
        }
        ToolKind::ShoppingCart => {
            Widget::ShoppingCart(CartView::from_items(cart_items))
        }
        ToolKind::VideoRecipe => {
            let results: VideoResults = decode_or_default(artifact.result());
            if results.videos.is_empty() {
                Widget::NoVideos
            } else {
                Widget::Videos(results.videos)
            }
        }
        ToolKind::WebpageScraper => {
            Widget::Markdown(decode_or_default(artifact.result()))
        }
        ToolKind::Other(tool_name) => {
            warn!("no artifact renderer found for tool: {tool_name}");
            Widget::Unsupported { tool_name }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::artifact::extract;
    use crate::artifact::tests::{completed, transcript_with};

    fn single(name: &str, result: Value) -> Artifact {
        let transcript = transcript_with(vec![completed(name, "call_1", result)]);
        extract(&transcript).remove(0)
    }

    #[test]
    fn test_render_recipe() {
        let artifact = single(
            "displayRecipeIngredients",
            json!({
                "dish": "Pasta",
                "ingredients": [
                    { "name": "Spaghetti", "quantity": 500, "unit": "g" },
                    { "name": "Garlic", "quantity": 2, "unit": "cloves" }
                ]
            }),
        );
        let Widget::Ingredients(recipe) = render(&artifact, &[]) else {
            panic!("expected ingredients widget");
        };
        assert_eq!(recipe.dish, "Pasta");
        assert_eq!(recipe.ingredients[0], Ingredient::new("Spaghetti", 500.0, "g"));
        assert_eq!(recipe.ingredients.len(), 2);
    }

    #[test]
    fn test_render_recipe_missing_fields() {
        let artifact = single("displayRecipeIngredients", json!({}));
        assert_eq!(
            render(&artifact, &[]),
            Widget::Ingredients(Recipe {
                dish: "Unknown".to_owned(),
                ingredients: vec![],
            })
        );
    }

    #[test]
    fn test_render_cart_uses_cart_items() {
        let artifact = single("displayShoppingCart", json!({ "status": "success" }));
        let items = [
            Ingredient::new("Milk", 1.0, "l"),
            Ingredient::new("Milk", 0.5, "l"),
        ];
        let Widget::ShoppingCart(view) = render(&artifact, &items) else {
            panic!("expected cart widget");
        };
        assert_eq!(view.lines, vec![Ingredient::new("Milk", 1.5, "l")]);

        let Widget::ShoppingCart(view) = render(&artifact, &[]) else {
            panic!("expected cart widget");
        };
        assert!(view.is_empty());
    }

    #[test]
    fn test_render_no_videos() {
        let artifact = single("video_recipe", json!({ "videos": [] }));
        assert_eq!(render(&artifact, &[]), Widget::NoVideos);

        let artifact = single("video_recipe", json!({ "error": "quota" }));
        assert_eq!(render(&artifact, &[]), Widget::NoVideos);
    }

    #[test]
    fn test_render_videos() {
        let artifact = single(
            "video_recipe",
            json!({ "videos": [{ "videoId": "v1", "title": "Soup" }] }),
        );
        let Widget::Videos(videos) = render(&artifact, &[]) else {
            panic!("expected video grid");
        };
        assert_eq!(videos[0].video_id, "v1");
    }

    #[test]
    fn test_render_markdown() {
        let artifact = single("webpage_scraper", json!({ "markdown": "# Menu" }));
        assert_eq!(
            render(&artifact, &[]),
            Widget::Markdown(ScrapedPage {
                markdown: "# Menu".to_owned(),
                debug: None,
            })
        );
    }

    #[test]
    fn test_render_unknown_tool() {
        let artifact = single("weather", json!({ "temp": 21 }));
        assert_eq!(
            render(&artifact, &[]),
            Widget::Unsupported {
                tool_name: "weather".to_owned()
            }
        );
    }
}
