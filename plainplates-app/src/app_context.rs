use crate::application::{EditRecipe, StructuringBackend, SubmitRecipe};
use crate::config::Config;
use crate::infrastructure::auth::GoogleOAuth;
use crate::infrastructure::db::{
    create_connection, run_migrations, seed_sample_data, CategoryRepository, FavoriteRepository,
    RecipeRepository, UserRepository, VoteRepository,
};
use crate::infrastructure::mistral::MistralClient;
use crate::infrastructure::security::{ContentFilter, RateLimiter};
use plainplates_errors::AppError;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub recipes: RecipeRepository,
    pub categories: CategoryRepository,
    pub votes: VoteRepository,
    pub favorites: FavoriteRepository,
    pub users: UserRepository,
    pub google_oauth: Arc<GoogleOAuth>,
    pub submit_recipe: Arc<SubmitRecipe>,
    pub edit_recipe: Arc<EditRecipe>,
    pub rate_limiter: RateLimiter,
    pub config: Arc<Config>,
}

impl AppContext {
    /// Connect to the database, bring the schema up to date and wire every
    /// service.
    pub async fn init(config: Config) -> Result<Self, AppError> {
        let db = create_connection(&config.database_url)
            .await
            .map_err(|e| AppError::Config(format!("Failed to connect to database: {}", e)))?;
        tracing::info!("Connected to {:?} database", db.get_database_backend());

        run_migrations(&db)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;

        if config.seed_sample_data {
            seed_sample_data(&db)
                .await
                .map_err(|e| AppError::Database(format!("Failed to seed sample data: {}", e)))?;
        }

        Self::with_connection(db, config)
    }

    /// Wire every service over an already migrated connection.
    pub fn with_connection(db: DatabaseConnection, config: Config) -> Result<Self, AppError> {
        let google_oauth = GoogleOAuth::new(
            &config.google_client_id,
            &config.google_client_secret,
            &config.oauth_redirect_uri(),
        )?;
        let mistral = MistralClient::new(
            config.mistral_api_key.clone(),
            config.mistral_api_url.clone(),
            config.mistral_model.clone(),
            config.llm_timeout,
        )?;

        let recipes = RecipeRepository::new(db.clone());

        Ok(Self {
            categories: CategoryRepository::new(db.clone()),
            votes: VoteRepository::new(db.clone()),
            favorites: FavoriteRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            google_oauth: Arc::new(google_oauth),
            submit_recipe: Arc::new(SubmitRecipe::new(
                recipes.clone(),
                StructuringBackend::Mistral(mistral),
            )),
            edit_recipe: Arc::new(EditRecipe::new(recipes.clone(), ContentFilter::new()?)),
            rate_limiter: RateLimiter::new(
                config.submit_limit_per_minute,
                config.submit_limit_per_hour,
            ),
            recipes,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::memory_db;

    #[tokio::test]
    async fn test_with_connection_wires_services() {
        let config = Config::from_lookup(|key| match key {
            "GOOGLE_CLIENT_ID" | "GOOGLE_CLIENT_SECRET" | "MISTRAL_API_KEY" => {
                Some("test".to_string())
            }
            _ => None,
        })
        .unwrap();

        let ctx = AppContext::with_connection(memory_db().await, config).unwrap();
        assert_eq!(ctx.recipes.count().await.unwrap(), 0);
        assert!(ctx.rate_limiter.check_rate_limit("someone").is_ok());
    }
}
