use super::entities::{category, Category};
use super::{RecipeRepository, UserRepository};
use crate::domain::{self, RecipeFields};
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, PaginatorTrait};

const HOUSE_EMAIL: &str = "kitchen@plainplates.app";
const HOUSE_NAME: &str = "PlainPlates Kitchen";

/// (name, slug, description)
const CATEGORIES: &[(&str, &str, &str)] = &[
    ("Breakfast", "breakfast", "Morning meals to start your day right"),
    ("Lunch", "lunch", "Midday meals that are satisfying and quick"),
    ("Dinner", "dinner", "Evening meals for the whole family"),
    ("Dessert", "dessert", "Sweet treats and after-dinner delights"),
    ("Vegetarian", "vegetarian", "Meatless dishes full of flavor"),
    ("Vegan", "vegan", "Plant-based recipes with no animal products"),
    ("Quick & Easy", "quick-easy", "Recipes ready in 30 minutes or less"),
    ("Soups & Stews", "soups-stews", "Comforting bowls for any season"),
    ("Salads", "salads", "Fresh and crisp combinations"),
    ("Pasta", "pasta", "From classic spaghetti to creative noodle dishes"),
    ("Baking", "baking", "Breads, pastries, and other baked goods"),
    ("Grilling", "grilling", "Perfect for cookouts and BBQs"),
    ("Gluten Free", "gluten-free", "No gluten ingredients included"),
    ("High Protein", "high-protein", "Packed with protein to keep you full"),
];

struct SampleRecipe {
    title: &'static str,
    description: &'static str,
    ingredients: &'static str,
    instructions: &'static str,
    notes: &'static str,
    prep_time: i32,
    cook_time: i32,
    servings: i32,
    categories: &'static [&'static str],
}

const SAMPLE_RECIPES: &[SampleRecipe] = &[
    SampleRecipe {
        title: "Classic Chocolate Chip Cookies",
        description: "Perfect chewy chocolate chip cookies with crisp edges and soft centers.",
        ingredients: "- 1 cup (2 sticks) unsalted butter, softened
- 3/4 cup granulated sugar
- 3/4 cup packed brown sugar
- 2 large eggs
- 2 teaspoons vanilla extract
- 2 1/4 cups all-purpose flour
- 1 teaspoon baking soda
- 1/2 teaspoon salt
- 2 cups semi-sweet chocolate chips
- 1 cup chopped walnuts (optional)",
        instructions: "1. Preheat oven to 375°F (190°C).
2. In a large bowl, cream together the butter, granulated sugar, and brown sugar until smooth.
3. Beat in the eggs one at a time, then stir in the vanilla.
4. Combine the flour, baking soda, and salt in a separate bowl. Gradually add to the wet ingredients and mix until just blended.
5. Fold in the chocolate chips and walnuts if using.
6. Drop by rounded tablespoons onto ungreased baking sheets.
7. Bake for 9 to 11 minutes or until golden brown.
8. Cool on baking sheets for 2 minutes before removing to wire racks to cool completely.",
        notes: "For softer cookies, reduce baking time by 1-2 minutes. For crispier cookies, add 1-2 minutes.",
        prep_time: 15,
        cook_time: 10,
        servings: 24,
        categories: &["dessert", "baking"],
    },
    SampleRecipe {
        title: "Quick Chicken Stir Fry",
        description: "A fast weeknight dinner with chicken, vegetables and a simple sauce.",
        ingredients: "- 1 lb boneless, skinless chicken breasts, cut into 1-inch pieces
- 2 tablespoons vegetable oil, divided
- 2 cups mixed vegetables (bell peppers, broccoli, carrots, snap peas)
- 3 cloves garlic, minced
- 1 tablespoon fresh ginger, grated
- 1/4 cup soy sauce
- 1 tablespoon honey
- 1 tablespoon cornstarch
- 1/4 cup water
- 2 green onions, sliced
- Cooked rice, for serving",
        instructions: "1. In a small bowl, whisk together soy sauce, honey, cornstarch, and water. Set aside.
2. Heat 1 tablespoon oil in a large skillet or wok over medium-high heat.
3. Add chicken and cook until no longer pink, about 5-6 minutes. Remove and set aside.
4. Add remaining oil to the pan. Add vegetables, garlic, and ginger. Stir-fry for 3-4 minutes until vegetables are crisp-tender.
5. Return chicken to the pan. Pour sauce over and cook, stirring, until sauce thickens, about 1-2 minutes.
6. Garnish with sliced green onions and serve over rice.",
        notes: "You can swap the chicken for tofu or shrimp. Use any vegetables you have on hand.",
        prep_time: 10,
        cook_time: 10,
        servings: 4,
        categories: &["dinner", "quick-easy"],
    },
    SampleRecipe {
        title: "Classic Spaghetti Carbonara",
        description: "A simple authentic carbonara with eggs, cheese, bacon and black pepper.",
        ingredients: "- 1 lb (450g) spaghetti
- 8 oz (225g) pancetta or guanciale, diced
- 4 large egg yolks
- 2 large whole eggs
- 1 cup (100g) Pecorino Romano cheese, freshly grated
- 1 cup (100g) Parmigiano Reggiano cheese, freshly grated
- 1 tablespoon olive oil
- Freshly ground black pepper
- Salt for pasta water",
        instructions: "1. Bring a large pot of salted water to a boil. Add pasta and cook until al dente according to package directions.
2. While pasta cooks, heat olive oil in a large skillet over medium heat. Add pancetta and cook until crispy, about 5-7 minutes.
3. In a medium bowl, whisk together egg yolks, whole eggs, and grated cheeses. Season with black pepper.
4. When pasta is done, reserve 1 cup of pasta water, then drain.
5. Working quickly, add hot pasta to the skillet with pancetta. Toss to coat in the rendered fat.
6. Remove from heat. Add the egg and cheese mixture, stirring constantly. Add a splash of reserved pasta water to create a creamy sauce.
7. Serve immediately with extra grated cheese and freshly ground black pepper.",
        notes: "The key to carbonara is timing. The residual heat from the pasta cooks the eggs, but if it's too hot, they'll scramble. Keep everything moving and add pasta water as needed for silky texture.",
        prep_time: 10,
        cook_time: 15,
        servings: 4,
        categories: &["dinner", "pasta"],
    },
];

/// Seeds the default categories and the sample recipes. Each part only runs
/// against an empty table.
pub async fn seed_sample_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let categories = seed_categories(db).await?;
    if categories > 0 {
        tracing::info!("Seeded {} categories", categories);
    }

    let recipes = seed_recipes(db).await?;
    if recipes > 0 {
        tracing::info!("Seeded {} sample recipes", recipes);
    }
    Ok(())
}

pub(crate) async fn seed_categories(db: &DatabaseConnection) -> Result<usize, DbErr> {
    if Category::find().count(db).await? > 0 {
        return Ok(0);
    }

    let rows = CATEGORIES.iter().map(|(name, slug, description)| category::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(slug.to_string()),
        description: Set(Some(description.to_string())),
        ..Default::default()
    });
    Category::insert_many(rows).exec(db).await?;
    Ok(CATEGORIES.len())
}

async fn seed_recipes(db: &DatabaseConnection) -> Result<usize, DbErr> {
    let recipes = RecipeRepository::new(db.clone());
    if recipes.count().await? > 0 {
        return Ok(0);
    }

    let owner = UserRepository::new(db.clone())
        .upsert(&domain::User::new(
            HOUSE_EMAIL.to_string(),
            HOUSE_NAME.to_string(),
            None,
        ))
        .await?;

    for sample in SAMPLE_RECIPES {
        let fields = RecipeFields {
            title: sample.title.to_string(),
            description: sample.description.to_string(),
            ingredients: sample.ingredients.to_string(),
            instructions: sample.instructions.to_string(),
            notes: Some(sample.notes.to_string()),
            prep_time: sample.prep_time,
            cook_time: sample.cook_time,
            servings: sample.servings,
        };
        let recipe = recipes.create(&fields, Some(owner.id)).await?;

        let category_ids: Vec<i32> = Category::find()
            .select_only()
            .column(category::Column::Id)
            .filter(category::Column::Slug.is_in(sample.categories.iter().copied()))
            .order_by_asc(category::Column::Id)
            .into_tuple()
            .all(db)
            .await?;
        recipes.attach_categories(recipe.id, &category_ids).await?;
    }

    Ok(SAMPLE_RECIPES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecipeFilter, SortMode};
    use crate::infrastructure::db::{memory_db, CategoryRepository};

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let db = memory_db().await;
        seed_sample_data(&db).await.unwrap();
        seed_sample_data(&db).await.unwrap();

        let categories = CategoryRepository::new(db.clone()).list().await.unwrap();
        assert_eq!(categories.len(), CATEGORIES.len());
        assert_eq!(categories[0].name, "Baking");

        let recipes = RecipeRepository::new(db);
        assert_eq!(recipes.count().await.unwrap(), 3);

        let listed = recipes
            .list(&RecipeFilter::default().with_sort(SortMode::Id))
            .await
            .unwrap();
        let carbonara = listed
            .iter()
            .find(|r| r.slug == "classic-spaghetti-carbonara")
            .unwrap();
        assert_eq!(carbonara.tags, vec!["Dinner", "Pasta"]);
    }

    #[test]
    fn test_sample_recipes_follow_edit_rules() {
        for sample in SAMPLE_RECIPES {
            assert!(domain::validate_ingredients(sample.ingredients).is_empty(), "{}", sample.title);
            assert!(domain::validate_instructions(sample.instructions).is_empty(), "{}", sample.title);
        }
    }
}
