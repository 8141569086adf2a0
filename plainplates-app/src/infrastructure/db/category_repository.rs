use super::entities::{category, Category};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};

#[derive(Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<crate::domain::Category>, DbErr> {
        let categories = Category::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<crate::domain::Category>, DbErr> {
        Ok(Category::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await?
            .map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::{memory_db, seed::seed_categories};

    #[tokio::test]
    async fn test_list_and_lookup() {
        let db = memory_db().await;
        seed_categories(&db).await.unwrap();
        let repo = CategoryRepository::new(db);

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 14);
        assert!(all.windows(2).all(|w| w[0].name <= w[1].name));

        let dinner = repo.find_by_slug("dinner").await.unwrap().unwrap();
        assert_eq!(dinner.name, "Dinner");
        assert!(repo.find_by_slug("brunch-on-mars").await.unwrap().is_none());
    }
}
