use super::entities::{category, recipe, recipe_category, vote, Recipe, RecipeCategory, Vote};
use super::favorite_repository::is_favorite;
use super::vote_repository::{current_sign, score_of};
use crate::domain::{
    slugify, with_suffix, Caller, RecipeDetail, RecipeFields, RecipeFilter, RecipeSummary,
    SortMode,
};
use sea_orm::sea_query::{Expr, Func, Query, SimpleExpr};
use sea_orm::{
    entity::*, query::*, Condition, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    FromQueryResult,
    JoinType, PaginatorTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, FromQueryResult)]
struct SummaryRow {
    id: i32,
    title: String,
    slug: String,
    description: String,
    prep_time: i32,
    cook_time: i32,
    servings: i32,
    created_at: chrono::DateTime<chrono::Utc>,
    score: i64,
}

#[derive(Clone)]
pub struct RecipeRepository {
    db: DatabaseConnection,
}

impl RecipeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Recipes matching every predicate set on `filter`, sorted, then
    /// truncated to `filter.limit`.
    pub async fn list(&self, filter: &RecipeFilter) -> Result<Vec<RecipeSummary>, DbErr> {
        let mut condition = Condition::all();

        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", fold_case(search, self.db.get_database_backend()));
            condition = condition.add(
                Condition::any()
                    .add(lower(recipe::Column::Title).like(pattern.clone()))
                    .add(lower(recipe::Column::Description).like(pattern)),
            );
        }

        if let Some(slug) = &filter.category_slug {
            condition = condition.add(recipe::Column::Id.in_subquery(
                Query::select()
                    .column((RecipeCategory, recipe_category::Column::RecipeId))
                    .from(RecipeCategory)
                    .inner_join(
                        category::Entity,
                        Expr::col((category::Entity, category::Column::Id))
                            .equals((RecipeCategory, recipe_category::Column::CategoryId)),
                    )
                    .and_where(Expr::col((category::Entity, category::Column::Slug)).eq(slug.as_str()))
                    .to_owned(),
            ));
        }

        load_summaries(&self.db, condition, filter.sort, filter.limit).await
    }

    /// The given recipes in the order of `ids`. Unknown ids are skipped.
    pub async fn summaries_in_order(&self, ids: &[i32]) -> Result<Vec<RecipeSummary>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let condition = Condition::all().add(recipe::Column::Id.is_in(ids.iter().copied()));
        let mut by_id: HashMap<i32, RecipeSummary> =
            load_summaries(&self.db, condition, SortMode::Id, None)
                .await?
                .into_iter()
                .map(|summary| (summary.id, summary))
                .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<recipe::Model>, DbErr> {
        Recipe::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<recipe::Model>, DbErr> {
        Recipe::find()
            .filter(recipe::Column::Slug.eq(slug))
            .one(&self.db)
            .await
    }

    /// One recipe with its score, tags and the caller's vote and favorite.
    pub async fn detail(&self, slug: &str, caller: &Caller) -> Result<Option<RecipeDetail>, DbErr> {
        let Some(model) = self.find_by_slug(slug).await? else {
            return Ok(None);
        };

        let score = score_of(&self.db, model.id).await?;
        let tags = load_tags(&self.db, &[model.id])
            .await?
            .remove(&model.id)
            .unwrap_or_default();
        let current_vote = current_sign(&self.db, model.id, caller.voter.key()).await?;
        let is_favorite = match caller.user_id() {
            Some(user_id) => is_favorite(&self.db, user_id, model.id).await?,
            None => false,
        };

        Ok(Some(RecipeDetail {
            id: model.id,
            title: model.title,
            slug: model.slug,
            description: model.description,
            ingredients: model.ingredients,
            instructions: model.instructions,
            notes: model.notes,
            prep_time: model.prep_time,
            cook_time: model.cook_time,
            servings: model.servings,
            owner_user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            score,
            tags,
            current_vote,
            is_favorite,
        }))
    }

    /// Insert a recipe under a fresh slug derived from its title.
    pub async fn create(
        &self,
        fields: &RecipeFields,
        owner_user_id: Option<Uuid>,
    ) -> Result<recipe::Model, DbErr> {
        let slug = self.allocate_slug(&slugify(&fields.title)).await?;
        let now = chrono::Utc::now();

        let active = recipe::ActiveModel {
            title: Set(fields.title.clone()),
            slug: Set(slug),
            description: Set(fields.description.clone()),
            ingredients: Set(fields.ingredients.clone()),
            instructions: Set(fields.instructions.clone()),
            notes: Set(fields.notes.clone()),
            prep_time: Set(fields.prep_time),
            cook_time: Set(fields.cook_time),
            servings: Set(fields.servings),
            created_at: Set(now),
            updated_at: Set(now),
            user_id: Set(owner_user_id),
            ..Default::default()
        };
        active.insert(&self.db).await
    }

    /// Overwrite a recipe's content. The slug stays the same.
    pub async fn update(&self, id: i32, fields: &RecipeFields) -> Result<recipe::Model, DbErr> {
        let existing = Recipe::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Recipe {} not found", id)))?;

        let mut active: recipe::ActiveModel = existing.into();
        active.title = Set(fields.title.clone());
        active.description = Set(fields.description.clone());
        active.ingredients = Set(fields.ingredients.clone());
        active.instructions = Set(fields.instructions.clone());
        active.notes = Set(fields.notes.clone());
        active.prep_time = Set(fields.prep_time);
        active.cook_time = Set(fields.cook_time);
        active.servings = Set(fields.servings);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&self.db).await
    }

    pub async fn attach_categories(&self, recipe_id: i32, category_ids: &[i32]) -> Result<(), DbErr> {
        if category_ids.is_empty() {
            return Ok(());
        }
        let links = category_ids.iter().map(|&category_id| recipe_category::ActiveModel {
            recipe_id: Set(recipe_id),
            category_id: Set(category_id),
        });
        RecipeCategory::insert_many(links).exec(&self.db).await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        Recipe::find().count(&self.db).await
    }

    /// First of `base`, `base-2`, `base-3`, ... not taken by another recipe.
    async fn allocate_slug(&self, base: &str) -> Result<String, DbErr> {
        let mut attempt = 1;
        loop {
            let candidate = with_suffix(base, attempt);
            let taken = Recipe::find()
                .filter(recipe::Column::Slug.eq(candidate.as_str()))
                .one(&self.db)
                .await?
                .is_some();
            if !taken {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }
}

/// Folds `search` the way the backend's `lower()` folds stored text.
/// SQLite only lowers ASCII letters, so anything else must stay as typed.
fn fold_case(search: &str, backend: DbBackend) -> String {
    match backend {
        DbBackend::Sqlite => search.to_ascii_lowercase(),
        _ => search.to_lowercase(),
    }
}

fn lower(column: recipe::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col((Recipe, column))))
}

fn score_expr() -> SimpleExpr {
    SimpleExpr::FunctionCall(Func::coalesce([
        Expr::col((Vote, vote::Column::Value)).sum(),
        Expr::val(0).into(),
    ]))
}

async fn load_summaries<C: ConnectionTrait>(
    conn: &C,
    condition: Condition,
    sort: SortMode,
    limit: Option<u64>,
) -> Result<Vec<RecipeSummary>, DbErr> {
    let mut query = Recipe::find()
        .select_only()
        .columns([
            recipe::Column::Id,
            recipe::Column::Title,
            recipe::Column::Slug,
            recipe::Column::Description,
            recipe::Column::PrepTime,
            recipe::Column::CookTime,
            recipe::Column::Servings,
            recipe::Column::CreatedAt,
        ])
        .column_as(score_expr(), "score")
        .join(JoinType::LeftJoin, recipe::Relation::Votes.def())
        .filter(condition)
        .group_by(recipe::Column::Id);

    query = match sort {
        SortMode::Score => query.order_by_desc(score_expr()),
        SortMode::CreatedAt => query.order_by_desc(recipe::Column::CreatedAt),
        SortMode::Id => query,
    };
    query = query.order_by_desc(recipe::Column::Id);

    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    let rows = query.into_model::<SummaryRow>().all(conn).await?;
    let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let mut tags = load_tags(conn, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| RecipeSummary {
            tags: tags.remove(&row.id).unwrap_or_default(),
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            prep_time: row.prep_time,
            cook_time: row.cook_time,
            servings: row.servings,
            score: row.score,
            created_at: row.created_at,
        })
        .collect())
}

/// Category names per recipe, in category insertion order.
async fn load_tags<C: ConnectionTrait>(
    conn: &C,
    recipe_ids: &[i32],
) -> Result<HashMap<i32, Vec<String>>, DbErr> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i32, String)> = RecipeCategory::find()
        .select_only()
        .column(recipe_category::Column::RecipeId)
        .column(category::Column::Name)
        .join(JoinType::InnerJoin, recipe_category::Relation::Category.def())
        .filter(recipe_category::Column::RecipeId.is_in(recipe_ids.iter().copied()))
        .order_by_asc(recipe_category::Column::RecipeId)
        .order_by_asc(category::Column::Id)
        .into_tuple()
        .all(conn)
        .await?;

    let mut tags: HashMap<i32, Vec<String>> = HashMap::new();
    for (recipe_id, name) in rows {
        tags.entry(recipe_id).or_default().push(name);
    }
    Ok(tags)
}
