//! Line-format rules for the ingredient and instruction blocks of a recipe.
//!
//! Each function returns every problem it finds so the edit form can show
//! them all at once.

const INGREDIENT_PREFIX: &str = "- ";

fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

pub fn validate_ingredients(text: &str) -> Vec<String> {
    let mut problems = Vec::new();
    let mut count = 0;

    for (index, line) in content_lines(text).enumerate() {
        count += 1;
        if !line.starts_with(INGREDIENT_PREFIX) {
            problems.push(format!(
                "Ingredient line {} must start with \"- \" (found \"{}\")",
                index + 1,
                line
            ));
        }
    }

    if count == 0 {
        problems.push("Ingredients can't be empty".to_string());
    }
    problems
}

/// Instructions must be numbered `1. `, `2. `, ... with no gaps.
pub fn validate_instructions(text: &str) -> Vec<String> {
    let mut problems = Vec::new();
    let mut count = 0;

    for (index, line) in content_lines(text).enumerate() {
        count += 1;
        let expected = format!("{}. ", index + 1);
        if !line.starts_with(&expected) {
            problems.push(format!(
                "Instruction line {} must start with \"{}\" (found \"{}\")",
                index + 1,
                expected,
                line
            ));
        }
    }

    if count == 0 {
        problems.push("Instructions can't be empty".to_string());
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_ingredients() {
        assert!(validate_ingredients("- Flour\n- Sugar\n\n- 2 eggs").is_empty());
    }

    #[test]
    fn test_missing_prefix_on_first_ingredient() {
        let problems = validate_ingredients("Flour\n- Sugar");
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("Ingredient line 1"));
    }

    #[test]
    fn test_empty_ingredients() {
        assert_eq!(validate_ingredients("  \n "), vec!["Ingredients can't be empty"]);
    }

    #[test]
    fn test_well_formed_instructions() {
        let text = "1. Preheat the oven.\n2. Mix.\n3. Bake.\n4. Cool.\n5. Slice.\n6. Serve.\n7. Eat.\n8. Rest.\n9. Wash up.\n10. Repeat.";
        assert!(validate_instructions(text).is_empty());
    }

    #[test]
    fn test_gap_in_instruction_numbering() {
        let problems = validate_instructions("1. Step\n3. Step");
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("\"2. \""));
    }

    #[test]
    fn test_instructions_must_start_at_one() {
        let problems = validate_instructions("0. Step\n1. Step");
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn test_instruction_number_needs_space() {
        assert_eq!(validate_instructions("1.Step").len(), 1);
    }
}
