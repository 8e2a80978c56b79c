//! Fake remote API with artificial latency.

use std::time::Duration;

use super::recipes::{Recipe, RecipeAction};

const RECIPES: [&str; 3] = ["pizza", "pasta", "sandwich"];

const MORE_RECIPES: [&str; 5] = ["rice", "quinoa", "lasagna", "soup", "salad"];

fn to_recipes<'a>(names: impl IntoIterator<Item = &'a &'static str>) -> Vec<Recipe> {
    names.into_iter().map(|name| Recipe::new(*name)).collect()
}

/// Resolves to `Success` with the first batch after `delay`.
pub async fn fetch_recipes(delay: Duration) -> Option<RecipeAction> {
    tokio::time::sleep(delay).await;
    Some(RecipeAction::Success(to_recipes(&RECIPES)))
}

/// Resolves to `Done` with up to `count` more recipes after `delay`.
pub async fn fetch_more((count, delay): (usize, Duration)) -> Option<RecipeAction> {
    tokio::time::sleep(delay).await;
    Some(RecipeAction::Done(to_recipes(MORE_RECIPES.iter().take(count))))
}
