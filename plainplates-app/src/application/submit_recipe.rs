use crate::domain::{RecipeFields, StructuredRecipe};
use crate::infrastructure::db::{db_error, entities::recipe, RecipeRepository};
use crate::infrastructure::mistral::MistralClient;
use crate::infrastructure::security::InputSanitizer;
use plainplates_errors::AppError;
use uuid::Uuid;

pub enum StructuringBackend {
    Mistral(MistralClient),
    /// Returns a fixed reply, so the pipeline runs without network access.
    #[cfg(test)]
    Canned(String),
}

pub struct SubmitRecipe {
    recipes: RecipeRepository,
    backend: StructuringBackend,
}

impl SubmitRecipe {
    pub fn new(recipes: RecipeRepository, backend: StructuringBackend) -> Self {
        Self { recipes, backend }
    }

    pub async fn execute(&self, raw_text: &str, owner: Uuid) -> Result<recipe::Model, AppError> {
        let text = InputSanitizer::validate_recipe_text(raw_text)?;

        let reply = self.structure(&text).await?;
        let structured = StructuredRecipe::from_reply(&reply).inspect_err(|e| {
            tracing::warn!("Unusable structuring reply for user {}: {}", owner, e);
        })?;
        let fields = RecipeFields::from(structured);

        let saved = self
            .recipes
            .create(&fields, Some(owner))
            .await
            .map_err(db_error)?;
        tracing::info!("Recipe {} ({}) submitted by {}", saved.id, saved.slug, owner);
        Ok(saved)
    }

    async fn structure(&self, text: &str) -> Result<String, AppError> {
        match &self.backend {
            StructuringBackend::Mistral(client) => client.structure_recipe(text).await,
            #[cfg(test)]
            StructuringBackend::Canned(reply) => Ok(reply.clone()),
        }
    }
}
