//! Remote recipe service abstraction.
//!
//! This module provides a trait-based abstraction over the recipe
//! backend's REST API, with an HTTP implementation for the app and a
//! canned-response mock for tests.

mod http;
mod mock;

pub use http::{HttpRecipeService, HttpRecipeServiceBuilder};
pub use mock::{MockRecipeService, ServiceCall};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ServiceError;
use crate::types::{RecipeId, RecipePayload, RecipeSummary, RemoteRecipe};

/// Trait for the recipe backend, enabling mockability in tests.
#[async_trait]
pub trait RecipeService: Send + Sync {
    /// Search recipes by title and author. The backend matches loosely and
    /// may return a superset; callers filter client-side.
    async fn search(&self, title: &str, author: &str) -> Result<Vec<RecipeSummary>, ServiceError>;

    /// Fetch a single recipe record, raw. Returned as JSON so the
    /// hydration adapter can tolerate the backend's key variations.
    async fn fetch(&self, id: &RecipeId) -> Result<Value, ServiceError>;

    /// Create a recipe and return the created record.
    async fn create(&self, payload: &RecipePayload) -> Result<RemoteRecipe, ServiceError>;

    /// Update an existing recipe in place.
    async fn update(&self, id: &RecipeId, payload: &RecipePayload) -> Result<(), ServiceError>;

    /// List the category names recipes may be filed under.
    async fn list_categories(&self) -> Result<Vec<String>, ServiceError>;
}
