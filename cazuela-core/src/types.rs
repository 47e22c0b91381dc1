use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier assigned to a recipe by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One ingredient row on the editing form.
///
/// A row with an empty name is an editing placeholder and is skipped by
/// validation; a named row must carry both quantity and unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
}

impl IngredientEntry {
    pub fn new(name: &str, quantity: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
        }
    }

    /// True when the row is an untouched editing placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// One preparation step on the editing form.
///
/// `media_uri` may reference a device-local file (to be uploaded at submit
/// time) or an already-remote URL (kept as-is on the edit-existing path).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftStep {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_uri: Option<String>,
}

impl DraftStep {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            media_uri: None,
        }
    }

    pub fn with_media(description: &str, media_uri: &str) -> Self {
        Self {
            description: description.to_string(),
            media_uri: Some(media_uri.to_string()),
        }
    }

    /// True when the row is an untouched editing placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.description.trim().is_empty() && self.media_uri.is_none()
    }
}

/// A recipe as edited on the device, not yet accepted by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub portions: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientEntry>,
    #[serde(default)]
    pub steps: Vec<DraftStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_photo_uri: Option<String>,
}

impl RecipeDraft {
    /// Ingredient rows that are not editing placeholders.
    pub fn named_ingredients(&self) -> impl Iterator<Item = (usize, &IngredientEntry)> {
        self.ingredients
            .iter()
            .enumerate()
            .filter(|(_, i)| !i.is_placeholder())
    }

    /// Step rows that are not editing placeholders.
    pub fn real_steps(&self) -> impl Iterator<Item = (usize, &DraftStep)> {
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_placeholder())
    }
}

/// Persistence envelope for a deferred draft.
///
/// The id is assigned client-side when the draft is stored so that removal
/// after a successful submit is a filter by id, never an in-place mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDraft {
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub draft: RecipeDraft,
}

impl StoredDraft {
    pub fn new(draft: RecipeDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            saved_at: Utc::now(),
            draft,
        }
    }
}

/// A step as stored on the server, with resolved remote media.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteStep {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// The server-side recipe resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecipe {
    pub id: RecipeId,
    #[serde(default)]
    pub author: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub portions: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientEntry>,
    #[serde(default)]
    pub steps_list: Vec<RemoteStep>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

/// One row of a title search result. The service may return a superset of
/// candidates; the conflict resolver filters client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub author: String,
}

/// Body sent to the recipe create/update endpoints. Media references must
/// already be resolved to remote URLs before this is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePayload {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub portions: String,
    pub ingredients: Vec<IngredientEntry>,
    pub steps_list: Vec<RemoteStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Always false on create from this client; the server flips it.
    pub is_verified: bool,
}

/// Connectivity medium reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    Wifi,
    Cellular,
    None,
    Unknown,
}

/// Current network reachability. Never persisted; only ever the latest
/// state pushed by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityState {
    pub reachable: bool,
    pub transport: Transport,
}

impl ConnectivityState {
    pub fn offline() -> Self {
        Self {
            reachable: false,
            transport: Transport::None,
        }
    }

    pub fn wifi() -> Self {
        Self {
            reachable: true,
            transport: Transport::Wifi,
        }
    }

    pub fn cellular() -> Self {
        Self {
            reachable: true,
            transport: Transport::Cellular,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_ingredient_is_skipped() {
        let draft = RecipeDraft {
            ingredients: vec![
                IngredientEntry::default(),
                IngredientEntry::new("flour", "2", "cups"),
            ],
            ..Default::default()
        };
        let named: Vec<_> = draft.named_ingredients().collect();
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].0, 1);
    }

    #[test]
    fn step_with_media_only_is_not_placeholder() {
        let step = DraftStep {
            description: String::new(),
            media_uri: Some("file:///tmp/pic.jpg".to_string()),
        };
        assert!(!step.is_placeholder());
    }

    #[test]
    fn stored_draft_round_trips_through_json() {
        let stored = StoredDraft::new(RecipeDraft {
            title: "Pizza Carbonara".to_string(),
            ..Default::default()
        });
        let json = serde_json::to_string(&stored).unwrap();
        let back: StoredDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stored);
    }
}
