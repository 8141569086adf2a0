use askama::Template;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use plainplates_app::domain::{
    Category, RecipeDetail, RecipeEdit, RecipeSummary, SessionUser, SortMode,
};

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

#[derive(Template)]
#[template(path = "components/recipe_cards.html")]
pub struct RecipeCards {
    pub recipes: Vec<RecipeSummary>,
}

pub struct CategoryLink {
    pub name: String,
    pub slug: String,
    pub selected: bool,
}

fn category_links(categories: Vec<Category>, selected: Option<&str>) -> Vec<CategoryLink> {
    categories
        .into_iter()
        .map(|c| CategoryLink {
            selected: selected == Some(c.slug.as_str()),
            name: c.name,
            slug: c.slug,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomePage {
    pub user: Option<SessionUser>,
    pub category_links: Vec<CategoryLink>,
    pub top: RecipeCards,
    pub newest: RecipeCards,
}

impl HomePage {
    pub fn new(
        user: Option<SessionUser>,
        top: Vec<RecipeSummary>,
        newest: Vec<RecipeSummary>,
        categories: Vec<Category>,
    ) -> Self {
        Self {
            user,
            category_links: category_links(categories, None),
            top: RecipeCards { recipes: top },
            newest: RecipeCards { recipes: newest },
        }
    }
}

pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "pages/listing.html")]
pub struct ListingPage {
    pub user: Option<SessionUser>,
    pub heading: String,
    pub search: String,
    pub category_slug: Option<String>,
    pub sort_options: Vec<SortOption>,
    pub category_links: Vec<CategoryLink>,
    pub cards: RecipeCards,
}

impl ListingPage {
    pub fn new(
        user: Option<SessionUser>,
        recipes: Vec<RecipeSummary>,
        categories: Vec<Category>,
        search: Option<String>,
        category: Option<Category>,
        sort: SortMode,
    ) -> Self {
        let sort_options = [
            (SortMode::Score, "Top rated"),
            (SortMode::CreatedAt, "Newest"),
            (SortMode::Id, "Recently added"),
        ]
        .into_iter()
        .map(|(mode, label)| SortOption {
            value: mode.as_str(),
            label,
            selected: mode == sort,
        })
        .collect();

        let heading = match &category {
            Some(c) => format!("{} recipes", c.name),
            None => "Recipes".to_string(),
        };
        let category_slug = category.map(|c| c.slug);

        Self {
            user,
            heading,
            search: search.unwrap_or_default(),
            category_links: category_links(categories, category_slug.as_deref()),
            category_slug,
            sort_options,
            cards: RecipeCards { recipes },
        }
    }
}

#[derive(Template)]
#[template(path = "pages/recipe.html")]
pub struct RecipePage {
    pub user: Option<SessionUser>,
    pub voted_up: bool,
    pub voted_down: bool,
    pub can_edit: bool,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub recipe: RecipeDetail,
}

impl RecipePage {
    pub fn new(user: Option<SessionUser>, recipe: RecipeDetail) -> Self {
        Self {
            voted_up: recipe.current_vote > 0,
            voted_down: recipe.current_vote < 0,
            can_edit: recipe.is_owned_by(user.as_ref().map(|u| u.id)),
            ingredients: list_items(&recipe.ingredients, |l| l.strip_prefix("- ").unwrap_or(l)),
            instructions: list_items(&recipe.instructions, strip_numbering),
            user,
            recipe,
        }
    }
}

fn list_items(text: &str, strip: impl Fn(&str) -> &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| strip(line).to_string())
        .collect()
}

fn strip_numbering(line: &str) -> &str {
    match line.split_once(". ") {
        Some((number, rest)) if number.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => line,
    }
}

#[derive(Template)]
#[template(path = "pages/favorites.html")]
pub struct FavoritesPage {
    pub user: Option<SessionUser>,
    pub cards: RecipeCards,
}

impl FavoritesPage {
    pub fn new(user: SessionUser, recipes: Vec<RecipeSummary>) -> Self {
        Self {
            user: Some(user),
            cards: RecipeCards { recipes },
        }
    }
}

/// The submission form. Pasted text is never echoed back.
#[derive(Template)]
#[template(path = "pages/submit.html")]
pub struct SubmitPage {
    pub user: Option<SessionUser>,
    pub error: Option<String>,
}

impl SubmitPage {
    pub fn new(user: SessionUser, error: Option<String>) -> Self {
        Self {
            user: Some(user),
            error,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/edit.html")]
pub struct EditPage {
    pub user: Option<SessionUser>,
    pub slug: String,
    pub edit: RecipeEdit,
    pub error: Option<String>,
}

impl EditPage {
    pub fn new(user: SessionUser, slug: String, edit: RecipeEdit, error: Option<String>) -> Self {
        Self {
            user: Some(user),
            slug,
            edit,
            error,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginPage {
    pub user: Option<SessionUser>,
    pub error: Option<String>,
}

impl LoginPage {
    pub fn new(error: Option<String>) -> Self {
        Self { user: None, error }
    }
}

#[derive(Template)]
#[template(path = "pages/error.html")]
pub struct ErrorPage {
    pub user: Option<SessionUser>,
    pub title: String,
    pub message: String,
}

impl ErrorPage {
    pub fn new(title: &str, message: &str) -> Self {
        Self {
            user: None,
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}
