mod caller;
mod category;
mod listing;
mod recipe;
mod recipe_format;
mod slug;
mod user;
mod vote;

pub use caller::Caller;
pub use category::Category;
pub use listing::{RecipeFilter, SortMode};
pub use recipe::{RecipeDetail, RecipeEdit, RecipeFields, RecipeSummary, StructuredRecipe};
pub use recipe_format::{validate_ingredients, validate_instructions};
pub use slug::{slugify, with_suffix};
pub use user::{SessionUser, User};
pub use vote::{
    VoteChoice, VoteOutcome, VoterIdentity, ANONYMOUS_WEIGHT, AUTHENTICATED_WEIGHT,
    FAVORITE_VOTE_VALUE,
};
