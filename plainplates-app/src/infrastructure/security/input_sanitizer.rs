use plainplates_errors::AppError;
use regex_lite::Regex;

pub const MAX_SUBMISSION_CHARS: usize = 10_000;

const BLOCKED_WORDS: &[&str] = &[
    "fuck", "fucking", "shit", "bitch", "bastard", "asshole", "cunt", "piss", "slut",
    "whore", "wanker", "twat", "bollocks", "motherfucker",
];

pub struct InputSanitizer;

impl InputSanitizer {
    /// Checks raw submission text before it is sent to the structuring service.
    pub fn validate_recipe_text(raw_text: &str) -> Result<String, AppError> {
        let text = raw_text.trim();

        if text.is_empty() {
            return Err(AppError::Validation(
                "Paste a recipe before submitting".to_string(),
            ));
        }

        let length = text.chars().count();
        if length > MAX_SUBMISSION_CHARS {
            return Err(AppError::Validation(format!(
                "Recipe text is too long ({} characters, limit is {})",
                length, MAX_SUBMISSION_CHARS
            )));
        }

        Ok(text.to_string())
    }
}

/// Whole-word, case-insensitive profanity matcher.
#[derive(Clone)]
pub struct ContentFilter {
    pattern: Regex,
}

impl ContentFilter {
    pub fn new() -> Result<Self, AppError> {
        Self::with_words(BLOCKED_WORDS)
    }

    pub fn with_words(words: &[&str]) -> Result<Self, AppError> {
        let alternatives = words
            .iter()
            .map(|w| regex_lite::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives))
            .map_err(|e| AppError::Internal(format!("Invalid word filter: {}", e)))?;
        Ok(Self { pattern })
    }

    pub fn is_profane(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Returns one problem per labeled field that contains a blocked word.
    pub fn check_fields(&self, fields: &[(&str, &str)]) -> Vec<String> {
        fields
            .iter()
            .filter(|(_, value)| self.is_profane(value))
            .map(|(label, _)| format!("{} contains language that isn't allowed", label))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_submission_rejected() {
        assert!(matches!(
            InputSanitizer::validate_recipe_text("   \n\t "),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_submission_trimmed() {
        assert_eq!(
            InputSanitizer::validate_recipe_text("  Toast\n- bread  ").unwrap(),
            "Toast\n- bread"
        );
    }

    #[test]
    fn test_oversized_submission_rejected() {
        let text = "a".repeat(MAX_SUBMISSION_CHARS + 1);
        assert!(InputSanitizer::validate_recipe_text(&text).is_err());
        let text = "a".repeat(MAX_SUBMISSION_CHARS);
        assert!(InputSanitizer::validate_recipe_text(&text).is_ok());
    }

    #[test]
    fn test_profanity_whole_words_only() {
        let filter = ContentFilter::new().unwrap();
        assert!(filter.is_profane("This is SHIT soup"));
        assert!(filter.is_profane("shit."));
        assert!(!filter.is_profane("Scunthorpe pudding"));
        assert!(!filter.is_profane("Dickens-style Christmas pudding with shiitake"));
        assert!(!filter.is_profane("Mix the flour"));
    }

    #[test]
    fn test_traditional_dish_names_pass() {
        let filter = ContentFilter::new().unwrap();
        assert!(!filter.is_profane("Spotted Dick"));
        assert!(filter
            .check_fields(&[
                ("Title", "Spotted Dick with custard"),
                ("Notes", "A steamed suet pudding."),
            ])
            .is_empty());
    }

    #[test]
    fn test_check_fields_reports_labels() {
        let filter = ContentFilter::with_words(&["darn"]).unwrap();
        let problems = filter.check_fields(&[
            ("Title", "Darn good chili"),
            ("Description", "Hearty"),
            ("Notes", "darn it"),
        ]);
        assert_eq!(
            problems,
            vec![
                "Title contains language that isn't allowed".to_string(),
                "Notes contains language that isn't allowed".to_string(),
            ]
        );
    }
}
