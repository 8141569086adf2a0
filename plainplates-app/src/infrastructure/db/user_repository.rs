use super::entities::{user, User};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user::Model>, DbErr> {
        User::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Email is the stable key: a returning user keeps their id and has
    /// their name and Google id refreshed.
    pub async fn upsert(&self, user_data: &crate::domain::User) -> Result<user::Model, DbErr> {
        if let Some(existing) = self.find_by_email(&user_data.email).await? {
            let mut active: user::ActiveModel = existing.into();
            active.name = Set(user_data.name.clone());
            active.google_id = Set(user_data.google_id.clone());
            active.update(&self.db).await
        } else {
            let active = user::ActiveModel {
                id: Set(user_data.id),
                email: Set(user_data.email.clone()),
                name: Set(user_data.name.clone()),
                google_id: Set(user_data.google_id.clone()),
                created_at: Set(chrono::Utc::now()),
            };
            active.insert(&self.db).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain;
    use crate::infrastructure::db::memory_db;

    #[tokio::test]
    async fn test_upsert_is_keyed_by_email() {
        let repo = UserRepository::new(memory_db().await);

        let first = repo
            .upsert(&domain::User::new(
                "cook@example.com".to_string(),
                "Cook".to_string(),
                None,
            ))
            .await
            .unwrap();

        let second = repo
            .upsert(&domain::User::new(
                "cook@example.com".to_string(),
                "Head Cook".to_string(),
                Some("google-123".to_string()),
            ))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Head Cook");
        assert_eq!(second.google_id.as_deref(), Some("google-123"));

        let found = repo.find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(found.email, "cook@example.com");
    }
}
