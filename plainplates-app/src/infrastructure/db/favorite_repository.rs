use super::entities::{favorite, Favorite};
use super::vote_repository::{delete_positive, ensure_recipe_exists, set_vote};
use crate::domain::{VoterIdentity, FAVORITE_VOTE_VALUE};
use sea_orm::{entity::*, query::*, ConnectionTrait, DatabaseConnection, DbErr, TransactionTrait};
use uuid::Uuid;

#[derive(Clone)]
pub struct FavoriteRepository {
    db: DatabaseConnection,
}

impl FavoriteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn exists(&self, user_id: Uuid, recipe_id: i32) -> Result<bool, DbErr> {
        is_favorite(&self.db, user_id, recipe_id).await
    }

    /// Toggle a favorite and return whether the recipe is now favorited.
    ///
    /// Favoriting forces the user's vote to +5, replacing a downvote.
    /// Unfavoriting removes the user's vote only if it is positive.
    pub async fn toggle(
        &self,
        user_id: Uuid,
        recipe_id: i32,
        voter: &VoterIdentity,
    ) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        ensure_recipe_exists(&txn, recipe_id).await?;

        let favorited = match Favorite::find_by_id((user_id, recipe_id)).one(&txn).await? {
            Some(existing) => {
                existing.delete(&txn).await?;
                delete_positive(&txn, recipe_id, voter.key()).await?;
                false
            }
            None => {
                let active = favorite::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                    created_at: Set(chrono::Utc::now()),
                };
                active.insert(&txn).await?;
                set_vote(&txn, recipe_id, voter.key(), FAVORITE_VOTE_VALUE).await?;
                true
            }
        };

        txn.commit().await?;
        Ok(favorited)
    }

    /// Recipe ids the user has favorited, most recent first.
    pub async fn recipe_ids_of(&self, user_id: Uuid) -> Result<Vec<i32>, DbErr> {
        Favorite::find()
            .select_only()
            .column(favorite::Column::RecipeId)
            .filter(favorite::Column::UserId.eq(user_id))
            .order_by_desc(favorite::Column::CreatedAt)
            .order_by_desc(favorite::Column::RecipeId)
            .into_tuple()
            .all(&self.db)
            .await
    }
}

pub(super) async fn is_favorite<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    recipe_id: i32,
) -> Result<bool, DbErr> {
    Ok(Favorite::find_by_id((user_id, recipe_id))
        .one(conn)
        .await?
        .is_some())
}
