//! Field-level draft validation.
//!
//! Runs before anything touches the network. Ingredient rows without a
//! name are editing placeholders and are ignored; a named row must carry
//! both quantity and unit. Fully blank step rows are likewise ignored,
//! but a step with media and no description is an error.

use crate::types::RecipeDraft;

/// Which part of the form an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Category,
    Portions,
    Ingredients,
    Ingredient(usize),
    Steps,
    Step(usize),
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Title => write!(f, "title"),
            Field::Category => write!(f, "category"),
            Field::Portions => write!(f, "portions"),
            Field::Ingredients => write!(f, "ingredients"),
            Field::Ingredient(i) => write!(f, "ingredient {}", i + 1),
            Field::Steps => write!(f, "steps"),
            Field::Step(i) => write!(f, "step {}", i + 1),
        }
    }
}

/// One validation failure, addressed to a form field or list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a draft for submission.
///
/// When `categories` is supplied (sourced from the remote category list by
/// the caller), the draft's category must match one of them after
/// normalization. Returns an empty list when the draft is submittable.
pub fn validate_draft(draft: &RecipeDraft, categories: Option<&[String]>) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if draft.title.trim().is_empty() {
        errors.push(FieldError::new(Field::Title, "title is required"));
    }

    if draft.category.trim().is_empty() {
        errors.push(FieldError::new(Field::Category, "category is required"));
    } else if let Some(known) = categories {
        let wanted = draft.category.trim().to_lowercase();
        if !known.iter().any(|c| c.trim().to_lowercase() == wanted) {
            errors.push(FieldError::new(
                Field::Category,
                "category is not one of the available categories",
            ));
        }
    }

    if draft.portions.trim().is_empty() {
        errors.push(FieldError::new(Field::Portions, "portions are required"));
    }

    let mut named = 0;
    for (index, ingredient) in draft.ingredients.iter().enumerate() {
        if ingredient.is_placeholder() {
            continue;
        }
        named += 1;
        if ingredient.quantity.trim().is_empty() || ingredient.unit.trim().is_empty() {
            errors.push(FieldError::new(
                Field::Ingredient(index),
                "a named ingredient needs a quantity and a unit",
            ));
        }
    }
    if named == 0 {
        errors.push(FieldError::new(
            Field::Ingredients,
            "at least one ingredient is required",
        ));
    }

    let mut real_steps = 0;
    for (index, step) in draft.steps.iter().enumerate() {
        if step.is_placeholder() {
            continue;
        }
        real_steps += 1;
        if step.description.trim().is_empty() {
            errors.push(FieldError::new(
                Field::Step(index),
                "a step needs a description",
            ));
        }
    }
    if real_steps == 0 {
        errors.push(FieldError::new(
            Field::Steps,
            "at least one step is required",
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DraftStep, IngredientEntry, RecipeDraft};

    fn valid_draft() -> RecipeDraft {
        RecipeDraft {
            title: "Pizza Carbonara".to_string(),
            description: None,
            category: "Pizzas".to_string(),
            portions: "4".to_string(),
            ingredients: vec![IngredientEntry::new("guanciale", "100", "g")],
            steps: vec![DraftStep::new("Fry the guanciale")],
            final_photo_uri: None,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(validate_draft(&valid_draft(), None).is_empty());
    }

    #[test]
    fn required_fields_are_reported_individually() {
        let errors = validate_draft(&RecipeDraft::default(), None);
        let fields: Vec<Field> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&Field::Title));
        assert!(fields.contains(&Field::Category));
        assert!(fields.contains(&Field::Portions));
        assert!(fields.contains(&Field::Ingredients));
        assert!(fields.contains(&Field::Steps));
    }

    #[test]
    fn placeholder_ingredient_rows_are_ignored() {
        let mut draft = valid_draft();
        draft.ingredients.push(IngredientEntry::default());
        assert!(validate_draft(&draft, None).is_empty());
    }

    #[test]
    fn named_ingredient_without_unit_fails_that_entry() {
        let mut draft = valid_draft();
        draft.ingredients.push(IngredientEntry::new("eggs", "3", ""));
        let errors = validate_draft(&draft, None);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Ingredient(1));
    }

    #[test]
    fn only_placeholder_ingredients_means_no_ingredients_yet() {
        let mut draft = valid_draft();
        draft.ingredients = vec![IngredientEntry::default()];
        let errors = validate_draft(&draft, None);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Ingredients);
    }

    #[test]
    fn step_with_media_but_no_description_fails() {
        let mut draft = valid_draft();
        draft
            .steps
            .push(DraftStep::with_media("", "file:///tmp/pic.jpg"));
        let errors = validate_draft(&draft, None);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Step(1));
    }

    #[test]
    fn category_must_be_a_known_one_when_list_given() {
        let categories = vec!["Pizzas".to_string(), "Stews".to_string()];

        let draft = valid_draft();
        assert!(validate_draft(&draft, Some(&categories)).is_empty());

        let mut off_list = valid_draft();
        off_list.category = "Rockets".to_string();
        let errors = validate_draft(&off_list, Some(&categories));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Category);
    }

    #[test]
    fn category_match_is_case_insensitive() {
        let categories = vec!["Pizzas".to_string()];
        let mut draft = valid_draft();
        draft.category = " pizzas ".to_string();
        assert!(validate_draft(&draft, Some(&categories)).is_empty());
    }
}
