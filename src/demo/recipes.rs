use std::borrow::Cow;
use std::time::Duration;

use crate::command::Command;
use crate::config::DemoConfig;
use crate::mvi::{Action, Outcome, Reducer};

use super::api;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipesState {
    pub fetching: bool,
    pub recipes: Vec<Recipe>,
    pub done: bool,
}

impl RecipesState {
    /// Plain-text view of the state.
    pub fn render(&self) -> String {
        let mut out = String::from("Recipes\n");
        if self.fetching {
            out.push_str("loading...\n");
        }
        for recipe in &self.recipes {
            out.push_str("  - ");
            out.push_str(&recipe.name);
            out.push('\n');
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeAction {
    Fetch,
    Success(Vec<Recipe>),
    Done(Vec<Recipe>),
}

impl Action for RecipeAction {
    fn kind(&self) -> Option<Cow<'_, str>> {
        let kind = match self {
            RecipeAction::Fetch => "FETCH",
            RecipeAction::Success(_) => "SUCCESS",
            RecipeAction::Done(_) => "DONE",
        };
        Some(Cow::Borrowed(kind))
    }
}

pub struct RecipesReducer {
    timings: DemoConfig,
}

impl RecipesReducer {
    pub fn new(timings: DemoConfig) -> Self {
        Self { timings }
    }
}

impl Reducer<RecipesState, RecipeAction> for RecipesReducer {
    fn reduce(
        &self,
        state: Option<RecipesState>,
        action: &RecipeAction,
    ) -> Outcome<RecipesState, RecipeAction> {
        let state = state.unwrap_or_default();
        match action {
            RecipeAction::Fetch => Outcome::with_command(
                RecipesState {
                    fetching: true,
                    done: false,
                    ..state
                },
                Command::perform(
                    api::fetch_recipes,
                    Duration::from_millis(self.timings.fetch_delay_ms),
                )
                .labeled("fetch_recipes"),
            ),
            RecipeAction::Success(recipes) => Outcome::with_command(
                RecipesState {
                    recipes: recipes.clone(),
                    ..state
                },
                Command::perform(
                    api::fetch_more,
                    (
                        self.timings.more_count,
                        Duration::from_millis(self.timings.more_delay_ms),
                    ),
                )
                .labeled("fetch_more"),
            ),
            RecipeAction::Done(more) => {
                let mut recipes = state.recipes;
                recipes.extend(more.iter().cloned());
                Outcome::state(RecipesState {
                    fetching: false,
                    recipes,
                    done: true,
                })
            }
        }
    }
}
