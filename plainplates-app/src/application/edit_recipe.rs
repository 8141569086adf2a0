use crate::domain::{
    validate_ingredients, validate_instructions, Caller, RecipeDetail, RecipeEdit, RecipeFields,
};
use crate::infrastructure::db::{db_error, entities::recipe, RecipeRepository};
use crate::infrastructure::security::ContentFilter;
use plainplates_errors::AppError;

/// Checks an edit form and turns it into storable fields. Every problem is
/// collected into one message.
pub fn validate_edit(edit: &RecipeEdit, filter: &ContentFilter) -> Result<RecipeFields, AppError> {
    let mut problems = Vec::new();

    let title = edit.title.trim();
    if title.is_empty() {
        problems.push("Title can't be empty".to_string());
    }

    problems.extend(validate_ingredients(&edit.ingredients));
    problems.extend(validate_instructions(&edit.instructions));

    let prep_time = parse_number("Prep time", &edit.prep_time, 0, &mut problems);
    let cook_time = parse_number("Cook time", &edit.cook_time, 0, &mut problems);
    let servings = parse_number("Servings", &edit.servings, 1, &mut problems);

    problems.extend(filter.check_fields(&[
        ("Title", edit.title.as_str()),
        ("Description", edit.description.as_str()),
        ("Ingredients", edit.ingredients.as_str()),
        ("Instructions", edit.instructions.as_str()),
        ("Notes", edit.notes.as_str()),
    ]));

    if !problems.is_empty() {
        return Err(AppError::Validation(problems.join("; ")));
    }

    let notes = edit.notes.trim();
    Ok(RecipeFields {
        title: title.to_string(),
        description: edit.description.trim().to_string(),
        ingredients: edit.ingredients.trim().to_string(),
        instructions: edit.instructions.trim().to_string(),
        notes: (!notes.is_empty()).then(|| notes.to_string()),
        prep_time,
        cook_time,
        servings,
    })
}

fn parse_number(label: &str, raw: &str, min: i32, problems: &mut Vec<String>) -> i32 {
    match raw.trim().parse::<i32>() {
        Ok(value) if value >= min => value,
        Ok(_) => {
            problems.push(format!("{} must be at least {}", label, min));
            min
        }
        Err(_) => {
            problems.push(format!("{} must be a whole number", label));
            min
        }
    }
}

pub struct EditRecipe {
    recipes: RecipeRepository,
    filter: ContentFilter,
}

impl EditRecipe {
    pub fn new(recipes: RecipeRepository, filter: ContentFilter) -> Self {
        Self { recipes, filter }
    }

    /// The recipe as its owner sees it. Anyone else gets `NotFound`.
    pub async fn load(&self, slug: &str, caller: &Caller) -> Result<RecipeDetail, AppError> {
        let user_id = caller.user_id().ok_or(AppError::Unauthenticated)?;

        let detail = self
            .recipes
            .detail(slug, caller)
            .await
            .map_err(db_error)?
            .ok_or(AppError::NotFound)?;

        if !detail.is_owned_by(Some(user_id)) {
            tracing::warn!("User {} tried to edit recipe {} they don't own", user_id, slug);
            return Err(AppError::NotFound);
        }
        Ok(detail)
    }

    pub async fn execute(
        &self,
        slug: &str,
        caller: &Caller,
        edit: &RecipeEdit,
    ) -> Result<recipe::Model, AppError> {
        let detail = self.load(slug, caller).await?;
        let fields = validate_edit(edit, &self.filter)?;

        let updated = self
            .recipes
            .update(detail.id, &fields)
            .await
            .map_err(db_error)?;
        tracing::info!("Recipe {} ({}) edited", updated.id, updated.slug);
        Ok(updated)
    }
}
