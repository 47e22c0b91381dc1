//! Prefill a draft from an existing remote recipe record.
//!
//! The backend has shipped the same concepts under several key spellings
//! over time, so every field is read through one adapter with an explicit
//! priority order. The adapter always yields a well-formed draft: missing
//! lists are seeded with a single blank placeholder row so the editing
//! form has something to render.
//!
//! Key priority per field (first present wins):
//! - description:     `description`, `desc`
//! - category:        `category`, `categoryName`
//! - portions:        `portions`, `servings`, `portion`
//! - ingredients:     `ingredients`, `ingredientsList`
//!   - name:          `name`, `ingredientName`, `title`
//!   - quantity:      `quantity`, `amount`, `qty`
//!   - unit:          `unit`, `measure`
//! - steps:           `stepsList`, `steps`
//!   - description:   `description`, `text`, `step`
//!   - media:         `imageUrl`, `mediaUrl`, `image`
//! - final photo:     `imageUrl`, `photo`, `image`

use serde_json::Value;

use crate::types::{DraftStep, IngredientEntry, RecipeDraft};

/// Read the first present, non-null string among the given keys.
pub(crate) fn pick_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| value.get(k).and_then(Value::as_str))
}

/// Read the first present array among the given keys.
pub(crate) fn pick_array<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter().find_map(|k| value.get(k).and_then(Value::as_array))
}

/// Like `pick_str` but also accepts numbers, rendering them as strings.
/// Portions in particular have arrived as both `"4"` and `4`.
fn pick_stringish(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match value.get(k) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Build an editable draft from a raw recipe record.
pub fn hydrate_draft(raw: &Value) -> RecipeDraft {
    let title = pick_str(raw, &["title", "name"]).unwrap_or_default().to_string();
    let description = pick_str(raw, &["description", "desc"]).map(str::to_string);
    let category = pick_str(raw, &["category", "categoryName"])
        .unwrap_or_default()
        .to_string();
    let portions = pick_stringish(raw, &["portions", "servings", "portion"]).unwrap_or_default();

    let mut ingredients: Vec<IngredientEntry> = pick_array(raw, &["ingredients", "ingredientsList"])
        .map(|items| items.iter().map(hydrate_ingredient).collect())
        .unwrap_or_default();
    if ingredients.is_empty() {
        ingredients.push(IngredientEntry::default());
    }

    let mut steps: Vec<DraftStep> = pick_array(raw, &["stepsList", "steps"])
        .map(|items| items.iter().map(hydrate_step).collect())
        .unwrap_or_default();
    if steps.is_empty() {
        steps.push(DraftStep::default());
    }

    let final_photo_uri = pick_str(raw, &["imageUrl", "photo", "image"]).map(str::to_string);

    RecipeDraft {
        title,
        description,
        category,
        portions,
        ingredients,
        steps,
        final_photo_uri,
    }
}

fn hydrate_ingredient(item: &Value) -> IngredientEntry {
    // Some very old records stored ingredients as bare strings.
    if let Some(s) = item.as_str() {
        return IngredientEntry {
            name: s.to_string(),
            ..Default::default()
        };
    }

    IngredientEntry {
        name: pick_str(item, &["name", "ingredientName", "title"])
            .unwrap_or_default()
            .to_string(),
        quantity: pick_stringish(item, &["quantity", "amount", "qty"]).unwrap_or_default(),
        unit: pick_str(item, &["unit", "measure"]).unwrap_or_default().to_string(),
    }
}

fn hydrate_step(item: &Value) -> DraftStep {
    if let Some(s) = item.as_str() {
        return DraftStep {
            description: s.to_string(),
            media_uri: None,
        };
    }

    DraftStep {
        description: pick_str(item, &["description", "text", "step"])
            .unwrap_or_default()
            .to_string(),
        media_uri: pick_str(item, &["imageUrl", "mediaUrl", "image"]).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hydrates_canonical_record() {
        let raw = json!({
            "id": "r-9",
            "title": "Pizza Carbonara",
            "description": "Creamy",
            "category": "Pizzas",
            "portions": "4",
            "ingredients": [
                {"name": "guanciale", "quantity": "100", "unit": "g"}
            ],
            "stepsList": [
                {"description": "Fry it", "imageUrl": "https://cdn.example.com/s1.jpg"}
            ],
            "imageUrl": "https://cdn.example.com/final.jpg"
        });

        let draft = hydrate_draft(&raw);
        assert_eq!(draft.title, "Pizza Carbonara");
        assert_eq!(draft.category, "Pizzas");
        assert_eq!(draft.portions, "4");
        assert_eq!(draft.ingredients[0].name, "guanciale");
        assert_eq!(draft.steps[0].description, "Fry it");
        assert_eq!(
            draft.steps[0].media_uri.as_deref(),
            Some("https://cdn.example.com/s1.jpg")
        );
        assert_eq!(
            draft.final_photo_uri.as_deref(),
            Some("https://cdn.example.com/final.jpg")
        );
    }

    #[test]
    fn tolerates_alternate_key_spellings() {
        let raw = json!({
            "name": "Old Stew",
            "desc": "from the legacy API",
            "categoryName": "Stews",
            "servings": 6,
            "ingredientsList": [
                {"ingredientName": "beef", "amount": "1", "measure": "kg"}
            ],
            "steps": [
                {"text": "Simmer", "mediaUrl": "https://cdn.example.com/old.jpg"}
            ],
            "photo": "https://cdn.example.com/cover.jpg"
        });

        let draft = hydrate_draft(&raw);
        assert_eq!(draft.title, "Old Stew");
        assert_eq!(draft.description.as_deref(), Some("from the legacy API"));
        assert_eq!(draft.category, "Stews");
        assert_eq!(draft.portions, "6");
        assert_eq!(draft.ingredients[0], IngredientEntry::new("beef", "1", "kg"));
        assert_eq!(draft.steps[0].description, "Simmer");
        assert_eq!(
            draft.final_photo_uri.as_deref(),
            Some("https://cdn.example.com/cover.jpg")
        );
    }

    #[test]
    fn earlier_key_wins_when_both_present() {
        let raw = json!({
            "title": "Canonical",
            "name": "Legacy",
            "portions": "2",
            "servings": 8
        });
        let draft = hydrate_draft(&raw);
        assert_eq!(draft.title, "Canonical");
        assert_eq!(draft.portions, "2");
    }

    #[test]
    fn missing_lists_get_blank_placeholders() {
        let draft = hydrate_draft(&json!({"title": "Bare"}));
        assert_eq!(draft.ingredients.len(), 1);
        assert!(draft.ingredients[0].is_placeholder());
        assert_eq!(draft.steps.len(), 1);
        assert!(draft.steps[0].is_placeholder());
        assert!(draft.final_photo_uri.is_none());
    }

    #[test]
    fn bare_string_rows_become_named_entries() {
        let raw = json!({
            "title": "Ancient",
            "ingredients": ["salt"],
            "steps": ["Mix everything"]
        });
        let draft = hydrate_draft(&raw);
        assert_eq!(draft.ingredients[0].name, "salt");
        assert!(draft.ingredients[0].quantity.is_empty());
        assert_eq!(draft.steps[0].description, "Mix everything");
    }
}
