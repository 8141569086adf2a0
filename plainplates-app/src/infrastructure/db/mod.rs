pub mod entities;
mod category_repository;
mod favorite_repository;
mod recipe_repository;
mod seed;
mod user_repository;
mod vote_repository;

pub use category_repository::CategoryRepository;
pub use favorite_repository::FavoriteRepository;
pub use recipe_repository::RecipeRepository;
pub use seed::seed_sample_data;
pub use user_repository::UserRepository;
pub use vote_repository::VoteRepository;

use entities::{vote, Category, Favorite, Recipe, RecipeCategory, User, Vote};
use plainplates_errors::AppError;
use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use std::time::Duration;

pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    ensure_sqlite_directory(database_url);

    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);

    Database::connect(opt).await
}

/// SQLite creates the database file on connect (`mode=rwc`) but not its directory.
fn ensure_sqlite_directory(database_url: &str) {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return;
    };
    let path = rest.split('?').next().unwrap_or(rest);
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Could not create database directory {}: {}", parent.display(), e);
            }
        }
    }
}

/// Creates any missing tables and indexes. Safe to run on every startup.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    // Referenced tables first.
    create_table(db, &schema, User).await?;
    create_table(db, &schema, Category).await?;
    create_table(db, &schema, Recipe).await?;
    create_table(db, &schema, RecipeCategory).await?;
    create_table(db, &schema, Vote).await?;
    create_table(db, &schema, Favorite).await?;

    let vote_lookup = Index::create()
        .if_not_exists()
        .name("idx_recipe_votes_recipe_identifier")
        .table(Vote)
        .col(vote::Column::RecipeId)
        .col(vote::Column::Identifier)
        .to_owned();
    db.execute(db.get_database_backend().build(&vote_lookup))
        .await?;

    let favorites_by_user = Index::create()
        .if_not_exists()
        .name("idx_user_favorites_user_id")
        .table(Favorite)
        .col(entities::favorite::Column::UserId)
        .to_owned();
    db.execute(db.get_database_backend().build(&favorites_by_user))
        .await?;

    Ok(())
}

async fn create_table<E: EntityTrait>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(db.get_database_backend().build(&statement))
        .await?;
    Ok(())
}

/// Maps storage failures onto the application error space. Unknown
/// records become `NotFound`; everything else is logged and hidden.
pub fn db_error(err: DbErr) -> AppError {
    match err {
        DbErr::RecordNotFound(_) => AppError::NotFound,
        other => {
            tracing::error!("Database error: {}", other);
            AppError::Database(other.to_string())
        }
    }
}

#[cfg(test)]
pub(crate) async fn memory_db() -> DatabaseConnection {
    // A single pooled connection, or each checkout would see its own empty database.
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("in-memory sqlite");
    run_migrations(&db).await.expect("schema");
    db
}
