use super::entities::{vote, Recipe, Vote};
use crate::domain::{VoteChoice, VoteOutcome, VoterIdentity};
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, ConnectionTrait, DatabaseConnection, DbErr, TransactionTrait};

#[derive(Clone)]
pub struct VoteRepository {
    db: DatabaseConnection,
}

impl VoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Cast, change or withdraw a vote.
    ///
    /// The same effective value twice in a row withdraws the vote; a
    /// different value overwrites it. The read and the write share one
    /// transaction.
    pub async fn cast(
        &self,
        recipe_id: i32,
        voter: &VoterIdentity,
        choice: VoteChoice,
    ) -> Result<VoteOutcome, DbErr> {
        let effective = choice.effective_value(voter.is_authenticated());
        let txn = self.db.begin().await?;

        ensure_recipe_exists(&txn, recipe_id).await?;

        let outcome = match find_vote(&txn, recipe_id, voter.key()).await? {
            None => {
                insert_vote(&txn, recipe_id, voter.key(), effective).await?;
                VoteOutcome::Cast { value: effective }
            }
            Some(existing) if existing.value == effective => {
                existing.delete(&txn).await?;
                VoteOutcome::Withdrawn { value: effective }
            }
            Some(existing) => {
                let from = existing.value;
                let mut active: vote::ActiveModel = existing.into();
                active.value = Set(effective);
                active.update(&txn).await?;
                VoteOutcome::Changed {
                    from,
                    to: effective,
                }
            }
        };

        txn.commit().await?;
        tracing::debug!("Vote on recipe {} by {}: {:?}", recipe_id, voter.key(), outcome);
        Ok(outcome)
    }

    /// Sign of the stored vote: -1, 0 or 1.
    #[cfg(test)]
    pub(crate) async fn current_sign(&self, recipe_id: i32, identifier: &str) -> Result<i32, DbErr> {
        current_sign(&self.db, recipe_id, identifier).await
    }

    #[cfg(test)]
    pub(crate) async fn score(&self, recipe_id: i32) -> Result<i64, DbErr> {
        score_of(&self.db, recipe_id).await
    }

    #[cfg(test)]
    pub(crate) async fn count_for(&self, recipe_id: i32) -> Result<usize, DbErr> {
        Ok(Vote::find()
            .filter(vote::Column::RecipeId.eq(recipe_id))
            .all(&self.db)
            .await?
            .len())
    }
}

pub(super) async fn ensure_recipe_exists<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
) -> Result<(), DbErr> {
    Recipe::find_by_id(recipe_id)
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| DbErr::RecordNotFound(format!("Recipe {} not found", recipe_id)))
}

pub(super) async fn find_vote<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    identifier: &str,
) -> Result<Option<vote::Model>, DbErr> {
    Vote::find()
        .filter(vote::Column::RecipeId.eq(recipe_id))
        .filter(vote::Column::Identifier.eq(identifier))
        .one(conn)
        .await
}

async fn insert_vote<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    identifier: &str,
    value: i32,
) -> Result<vote::Model, DbErr> {
    let active = vote::ActiveModel {
        recipe_id: Set(recipe_id),
        identifier: Set(identifier.to_string()),
        value: Set(value),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    active.insert(conn).await
}

/// Overwrite the identity's vote with `value`, inserting it if absent.
pub(super) async fn set_vote<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    identifier: &str,
    value: i32,
) -> Result<(), DbErr> {
    match find_vote(conn, recipe_id, identifier).await? {
        Some(existing) => {
            let mut active: vote::ActiveModel = existing.into();
            active.value = Set(value);
            active.update(conn).await?;
        }
        None => {
            insert_vote(conn, recipe_id, identifier, value).await?;
        }
    }
    Ok(())
}

/// Remove the identity's vote only if it is an upvote.
pub(super) async fn delete_positive<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    identifier: &str,
) -> Result<u64, DbErr> {
    let result = Vote::delete_many()
        .filter(vote::Column::RecipeId.eq(recipe_id))
        .filter(vote::Column::Identifier.eq(identifier))
        .filter(vote::Column::Value.gt(0))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub(super) async fn current_sign<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    identifier: &str,
) -> Result<i32, DbErr> {
    Ok(find_vote(conn, recipe_id, identifier)
        .await?
        .map(|v| v.value.signum())
        .unwrap_or(0))
}

pub(super) async fn score_of<C: ConnectionTrait>(conn: &C, recipe_id: i32) -> Result<i64, DbErr> {
    let total: Option<Option<i64>> = Vote::find()
        .select_only()
        .column_as(Expr::col((Vote, vote::Column::Value)).sum(), "score")
        .filter(vote::Column::RecipeId.eq(recipe_id))
        .into_tuple()
        .one(conn)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}
