//! Plain-text presentation of widgets, for terminals and logs.

use std::fmt::Write as _;

use shopit_core::artifact::{CartView, PanelEntry, Widget};
use shopit_core::payload::{Ingredient, Recipe, Video};

use crate::directory::GroceryStore;

/// Shown when a video search found nothing.
pub const NO_VIDEOS: &str = "No relevant videos were found for this query.";

/// Shown for an empty cart.
pub const EMPTY_CART: &str = "Your cart is empty.";

/// Formats a widget as plain text.
pub fn widget_text(widget: &Widget) -> String {
    match widget {
        Widget::Ingredients(recipe) => recipe_text(recipe),
        Widget::ShoppingCart(cart) => cart_text(cart),
        Widget::Videos(videos) => videos_text(videos),
        Widget::NoVideos => NO_VIDEOS.to_owned(),
        Widget::Markdown(page) => page.markdown.clone(),
        Widget::Unsupported { tool_name } => {
            format!("Artifact for tool \"{tool_name}\" cannot be displayed.")
        }
    }
}

/// Formats one ingredient line, such as `Flour: 250 g`.
pub fn ingredient_line(ingredient: &Ingredient) -> String {
    let Ingredient {
        name,
        quantity,
        unit,
    } = ingredient;
    if unit.is_empty() {
        format!("{name}: {quantity}")
    } else {
        format!("{name}: {quantity} {unit}")
    }
}

fn recipe_text(recipe: &Recipe) -> String {
    let mut text = format!("Ingredients for {}", recipe.dish);
    if recipe.ingredients.is_empty() {
        text.push_str("\n(no ingredients)");
    }
    for (i, ingredient) in recipe.ingredients.iter().enumerate() {
        let _ = write!(text, "\n{:>2}. {}", i + 1, ingredient_line(ingredient));
    }
    text
}

fn cart_text(cart: &CartView) -> String {
    let mut text = String::from("Shopping Cart");
    if cart.is_empty() {
        text.push('\n');
        text.push_str(EMPTY_CART);
    }
    for line in &cart.lines {
        let _ = write!(text, "\n- {}", ingredient_line(line));
    }
    text
}

fn videos_text(videos: &[Video]) -> String {
    let mut text = String::from("Recipe Videos");
    for video in videos {
        let _ = write!(
            text,
            "\n- {} ({})\n  {}",
            video.title, video.channel_title, video.video_url
        );
    }
    text
}

/// Formats the side list of artifacts, marking the active one.
pub fn entries_text(entries: &[PanelEntry]) -> String {
    let mut text = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        let marker = if entry.selected { '*' } else { ' ' };
        let _ = write!(text, "{marker} {}. {}", i + 1, entry.label);
    }
    text
}

/// Formats a store card.
pub fn store_text(store: &GroceryStore, favorite: bool) -> String {
    let star = if favorite { " ★" } else { "" };
    format!(
        "[{}] {}{star}\n    {}, {}, {} {}\n    {} · {} · rating {:.1}",
        store.id,
        store.name,
        store.address,
        store.city,
        store.state,
        store.zip_code,
        store.phone,
        store.hours,
        store.rating,
    )
}

#[cfg(test)]
mod tests {
    use shopit_core::payload::ScrapedPage;

    use super::*;
    use crate::directory;

    #[test]
    fn test_recipe() {
        let widget = Widget::Ingredients(Recipe {
            dish: "Pasta".to_owned(),
            ingredients: vec![
                Ingredient::new("Spaghetti", 200.0, "g"),
                Ingredient::new("Egg", 2.0, ""),
            ],
        });
        assert_eq!(
            widget_text(&widget),
            "Ingredients for Pasta\n 1. Spaghetti: 200 g\n 2. Egg: 2"
        );
    }

    #[test]
    fn test_cart() {
        let empty = Widget::ShoppingCart(CartView::default());
        assert_eq!(widget_text(&empty), "Shopping Cart\nYour cart is empty.");

        let cart = Widget::ShoppingCart(CartView::from_items(&[
            Ingredient::new("Milk", 0.5, "l"),
            Ingredient::new("Milk", 0.5, "l"),
        ]));
        assert_eq!(widget_text(&cart), "Shopping Cart\n- Milk: 1 l");
    }

    #[test]
    fn test_videos_and_placeholders() {
        let videos = Widget::Videos(vec![Video {
            video_id: "abc".to_owned(),
            title: "Carbonara".to_owned(),
            thumbnail_url: "https://img/abc.jpg".to_owned(),
            channel_title: "Chef".to_owned(),
            video_url: "https://www.youtube.com/watch?v=abc".to_owned(),
        }]);
        assert_eq!(
            widget_text(&videos),
            "Recipe Videos\n- Carbonara (Chef)\n  https://www.youtube.com/watch?v=abc"
        );
        assert_eq!(widget_text(&Widget::NoVideos), NO_VIDEOS);
        assert_eq!(
            widget_text(&Widget::Unsupported {
                tool_name: "teleport".to_owned()
            }),
            "Artifact for tool \"teleport\" cannot be displayed."
        );
        let page = Widget::Markdown(ScrapedPage {
            markdown: "# Soup".to_owned(),
            debug: None,
        });
        assert_eq!(widget_text(&page), "# Soup");
    }

    #[test]
    fn test_entries() {
        let entries = [
            PanelEntry {
                call_id: "call_2".to_owned(),
                label: "Shopping Cart".to_owned(),
                selected: true,
            },
            PanelEntry {
                call_id: "call_1".to_owned(),
                label: "Recipe: Pasta".to_owned(),
                selected: false,
            },
        ];
        assert_eq!(
            entries_text(&entries),
            "* 1. Shopping Cart\n  2. Recipe: Pasta"
        );
    }

    #[test]
    fn test_store() {
        let store = directory::find("3").unwrap();
        let text = store_text(store, true);
        assert!(text.starts_with("[3] City Supermarket ★"));
        assert!(text.contains("789 Mission St, San Francisco, CA 94103"));
        assert!(text.ends_with("rating 3.8"));
    }
}
