//! The built-in tools the grocery assistant offers to the model.

mod cart;
mod recipe;
mod scraper;
mod video;

pub use cart::ShoppingCartTool;
pub use recipe::RecipeIngredientsTool;
pub use scraper::WebpageScraperTool;
pub use video::VideoRecipeTool;
