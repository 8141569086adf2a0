use plainplates_errors::AppError;
use serde::{Deserialize, Deserializer, Serialize};

/// A recipe as it appears in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub score: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub tags: Vec<String>,
}

/// A single recipe with the caller's relationship to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub notes: Option<String>,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub owner_user_id: Option<uuid::Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub score: i64,
    pub tags: Vec<String>,
    /// Sign of the caller's stored vote: -1, 0 or 1.
    pub current_vote: i32,
    pub is_favorite: bool,
}

impl RecipeDetail {
    pub fn is_owned_by(&self, user_id: Option<uuid::Uuid>) -> bool {
        matches!((self.owner_user_id, user_id), (Some(owner), Some(caller)) if owner == caller)
    }
}

/// Validated content of a recipe, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFields {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub notes: Option<String>,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
}

/// Raw edit-form state. Kept as strings so a rejected edit can be shown back
/// exactly as the user typed it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeEdit {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    #[serde(default)]
    pub notes: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
}

impl RecipeEdit {
    pub fn from_detail(detail: &RecipeDetail) -> Self {
        Self {
            title: detail.title.clone(),
            description: detail.description.clone(),
            ingredients: detail.ingredients.clone(),
            instructions: detail.instructions.clone(),
            notes: detail.notes.clone().unwrap_or_default(),
            prep_time: detail.prep_time.to_string(),
            cook_time: detail.cook_time.to_string(),
            servings: detail.servings.to_string(),
        }
    }
}

/// The JSON object the structuring service is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StructuredRecipe {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "text_or_lines")]
    pub ingredients: String,
    #[serde(deserialize_with = "text_or_lines")]
    pub instructions: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
}

/// Models sometimes return list fields as JSON arrays instead of one
/// newline-separated string.
fn text_or_lines<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrLines {
        Text(String),
        Lines(Vec<String>),
    }

    Ok(match TextOrLines::deserialize(deserializer)? {
        TextOrLines::Text(text) => text,
        TextOrLines::Lines(lines) => lines.join("\n"),
    })
}

impl StructuredRecipe {
    /// Parse a model reply, tolerating a surrounding markdown code fence.
    pub fn from_reply(reply: &str) -> Result<Self, AppError> {
        let json = strip_code_fence(reply);
        let parsed: Self = serde_json::from_str(json).map_err(|e| {
            AppError::Validation(format!(
                "We couldn't read the recipe structure ({}). Please tidy up the text and try again.",
                e
            ))
        })?;
        parsed.check()?;
        Ok(parsed)
    }

    fn check(&self) -> Result<(), AppError> {
        let mut problems = Vec::new();
        if self.title.trim().is_empty() {
            problems.push("the recipe needs a title");
        }
        if self.ingredients.trim().is_empty() {
            problems.push("no ingredients were found");
        }
        if self.instructions.trim().is_empty() {
            problems.push("no instructions were found");
        }
        if self.prep_time < 0 || self.cook_time < 0 {
            problems.push("times can't be negative");
        }
        if self.servings <= 0 {
            problems.push("servings must be at least 1");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "The recipe is incomplete: {}.",
                problems.join(", ")
            )))
        }
    }
}

impl From<StructuredRecipe> for RecipeFields {
    fn from(recipe: StructuredRecipe) -> Self {
        Self {
            title: recipe.title.trim().to_string(),
            description: recipe.description.trim().to_string(),
            ingredients: recipe.ingredients.trim().to_string(),
            instructions: recipe.instructions.trim().to_string(),
            notes: recipe
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
        }
    }
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "title": "BBQ Beef Ribs",
        "description": "Oven-baked ribs finished under the broiler.",
        "ingredients": "- 4.5 lbs beef ribs\n- 5 tablespoons BBQ sauce",
        "instructions": "1. Preheat the oven.\n2. Bake for 3.5 hours.",
        "prep_time": 15,
        "cook_time": 215,
        "servings": 4
    }"#;

    #[test]
    fn test_plain_json_reply() {
        let recipe = StructuredRecipe::from_reply(REPLY).unwrap();
        assert_eq!(recipe.title, "BBQ Beef Ribs");
        assert_eq!(recipe.cook_time, 215);
        assert!(recipe.notes.is_none());
    }

    #[test]
    fn test_fenced_reply() {
        let fenced = format!("```json\n{}\n```", REPLY);
        assert_eq!(
            StructuredRecipe::from_reply(&fenced).unwrap().title,
            "BBQ Beef Ribs"
        );

        let bare_fence = format!("```\n{}\n```\n", REPLY);
        assert!(StructuredRecipe::from_reply(&bare_fence).is_ok());
    }

    #[test]
    fn test_list_fields_are_joined() {
        let reply = r#"{"title": "Toast", "description": "", "ingredients": ["- bread", "- butter"],
            "instructions": ["1. Toast.", "2. Butter."], "notes": "Hot.", "prep_time": 1, "cook_time": 2, "servings": 1}"#;
        let recipe = StructuredRecipe::from_reply(reply).unwrap();
        assert_eq!(recipe.ingredients, "- bread\n- butter");
        assert_eq!(recipe.notes.as_deref(), Some("Hot."));
    }

    #[test]
    fn test_unparseable_reply_is_validation_error() {
        let err = StructuredRecipe::from_reply("Sorry, I can't help with that.").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_missing_field_or_wrong_type_is_rejected() {
        let missing = r#"{"title": "Toast", "description": "", "ingredients": "- bread", "instructions": "1. Toast."}"#;
        assert!(StructuredRecipe::from_reply(missing).is_err());

        let wrong_type = REPLY.replace("\"servings\": 4", "\"servings\": \"four\"");
        assert!(StructuredRecipe::from_reply(&wrong_type).is_err());
    }

    #[test]
    fn test_incomplete_recipe_is_rejected() {
        let reply = REPLY.replace("\"servings\": 4", "\"servings\": 0");
        let err = StructuredRecipe::from_reply(&reply).unwrap_err();
        assert!(err.user_message().contains("servings"));
    }

    #[test]
    fn test_blank_notes_become_none() {
        let reply = REPLY.replace("\"servings\": 4", "\"servings\": 4, \"notes\": \"  \"");
        let fields = RecipeFields::from(StructuredRecipe::from_reply(&reply).unwrap());
        assert!(fields.notes.is_none());
    }
}
