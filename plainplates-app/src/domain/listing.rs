use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    Score,
    CreatedAt,
    Id,
}

impl SortMode {
    /// Unknown values fall back to newest-inserted-first.
    pub fn parse(value: &str) -> Self {
        match value {
            "score" => Self::Score,
            "created_at" => Self::CreatedAt,
            _ => Self::Id,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::CreatedAt => "created_at",
            Self::Id => "id",
        }
    }
}

/// Optional predicates for a recipe listing. Everything left as `None` is
/// simply not applied.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub search: Option<String>,
    pub category_slug: Option<String>,
    pub sort: SortMode,
    pub limit: Option<u64>,
}

impl RecipeFilter {
    pub fn top(sort: SortMode, limit: u64) -> Self {
        Self {
            sort,
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    pub fn with_category(mut self, category_slug: Option<String>) -> Self {
        self.category_slug = category_slug.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!(SortMode::parse("score"), SortMode::Score);
        assert_eq!(SortMode::parse("created_at"), SortMode::CreatedAt);
        assert_eq!(SortMode::parse("id"), SortMode::Id);
        assert_eq!(SortMode::parse("title"), SortMode::Id);
    }

    #[test]
    fn test_blank_predicates_are_dropped() {
        let filter = RecipeFilter::default()
            .with_search(Some("   ".to_string()))
            .with_category(Some(String::new()));
        assert!(filter.search.is_none());
        assert!(filter.category_slug.is_none());

        let filter = RecipeFilter::default().with_search(Some(" chicken ".to_string()));
        assert_eq!(filter.search.as_deref(), Some("chicken"));
    }
}
