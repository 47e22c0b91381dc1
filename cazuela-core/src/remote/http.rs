//! HTTP implementation of the recipe service.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ServiceError;
use crate::hydrate::{pick_array, pick_str};
use crate::types::{RecipeId, RecipePayload, RecipeSummary, RemoteRecipe, RemoteStep};

use super::RecipeService;

/// Configuration for HttpRecipeService.
#[derive(Clone)]
pub struct HttpRecipeServiceBuilder {
    base_url: String,
    bearer_token: Option<String>,
    timeout: Duration,
    user_agent: String,
}

impl HttpRecipeServiceBuilder {
    /// Create a new builder for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            timeout: Duration::from_secs(30),
            user_agent: "Cazuela/1.0 (mobile)".to_string(),
        }
    }

    /// Set the bearer token attached to every request. The caller sources
    /// it once; the service never reads ambient storage.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Build the HttpRecipeService.
    pub fn build(self) -> Result<HttpRecipeService, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;

        Ok(HttpRecipeService {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            bearer_token: self.bearer_token,
            client,
        })
    }
}

/// Production recipe service speaking to the backend's REST API.
pub struct HttpRecipeService {
    base_url: String,
    bearer_token: Option<String>,
    client: reqwest::Client,
}

impl HttpRecipeService {
    /// Get a builder for custom configuration.
    pub fn builder(base_url: impl Into<String>) -> HttpRecipeServiceBuilder {
        HttpRecipeServiceBuilder::new(base_url)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_json(&self, request: reqwest::RequestBuilder) -> Result<Value, ServiceError> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::RequestFailed(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(ServiceError::Api {
                status,
                message: error_message(&body),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ServiceError::Parse(e.to_string()))
    }
}

/// Pull a human-readable message out of an error body, falling back to the
/// raw body when the shape is unrecognized.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
        {
            return message.to_string();
        }
        if let Some(message) = pick_str(&value, &["error", "message"]) {
            return message.to_string();
        }
    }
    body.to_string()
}

/// Read a search response, which has arrived both as a bare array and
/// wrapped in a `results`/`recipes` envelope.
fn summaries_from_response(value: &Value) -> Vec<RecipeSummary> {
    let items = match value.as_array() {
        Some(items) => items,
        None => match pick_array(value, &["results", "recipes"]) {
            Some(items) => items,
            None => return Vec::new(),
        },
    };

    items
        .iter()
        .filter_map(|item| {
            let id = pick_str(item, &["id", "_id"])?;
            let title = pick_str(item, &["title", "name"])?;
            Some(RecipeSummary {
                id: RecipeId::from(id),
                title: title.to_string(),
                author: pick_str(item, &["user", "author", "userName"])
                    .unwrap_or_default()
                    .to_string(),
            })
        })
        .collect()
}

/// Read a category list: bare strings, `{name}` objects, or an envelope.
fn categories_from_response(value: &Value) -> Vec<String> {
    let items = match value.as_array() {
        Some(items) => items,
        None => match pick_array(value, &["categories", "results"]) {
            Some(items) => items,
            None => return Vec::new(),
        },
    };

    items
        .iter()
        .filter_map(|item| {
            item.as_str()
                .or_else(|| pick_str(item, &["name", "title"]))
                .map(str::to_string)
        })
        .collect()
}

/// Read a created-recipe response; some backend versions return only the
/// assigned id, in which case the rest is filled from what was sent.
fn created_recipe(value: &Value, payload: &RecipePayload) -> Result<RemoteRecipe, ServiceError> {
    if let Ok(recipe) = serde_json::from_value::<RemoteRecipe>(value.clone()) {
        return Ok(recipe);
    }

    let id = pick_str(value, &["id", "_id"])
        .ok_or_else(|| ServiceError::Parse("created recipe carried no id".to_string()))?;

    Ok(RemoteRecipe {
        id: RecipeId::from(id),
        author: pick_str(value, &["user", "author"]).unwrap_or_default().to_string(),
        title: payload.title.clone(),
        description: payload.description.clone(),
        category: payload.category.clone(),
        portions: payload.portions.clone(),
        ingredients: payload.ingredients.clone(),
        steps_list: payload
            .steps_list
            .iter()
            .map(|s| RemoteStep {
                description: s.description.clone(),
                image_url: s.image_url.clone(),
            })
            .collect(),
        image_url: payload.image_url.clone(),
        is_verified: false,
    })
}

#[async_trait]
impl RecipeService for HttpRecipeService {
    async fn search(&self, title: &str, author: &str) -> Result<Vec<RecipeSummary>, ServiceError> {
        let url = format!("{}/recipes", self.base_url);
        tracing::debug!(title, author, "searching recipes");
        let request = self
            .authed(self.client.get(&url))
            .query(&[("title", title), ("user", author)]);
        let value = self.send_json(request).await?;
        Ok(summaries_from_response(&value))
    }

    async fn fetch(&self, id: &RecipeId) -> Result<Value, ServiceError> {
        let url = format!("{}/recipes/{}", self.base_url, id);
        tracing::debug!(%id, "fetching recipe");
        self.send_json(self.authed(self.client.get(&url))).await
    }

    async fn create(&self, payload: &RecipePayload) -> Result<RemoteRecipe, ServiceError> {
        let url = format!("{}/recipes", self.base_url);
        tracing::debug!(title = %payload.title, "creating recipe");
        let value = self
            .send_json(self.authed(self.client.post(&url)).json(payload))
            .await?;
        let recipe = created_recipe(&value, payload)?;
        tracing::info!(id = %recipe.id, title = %recipe.title, "recipe created");
        Ok(recipe)
    }

    async fn update(&self, id: &RecipeId, payload: &RecipePayload) -> Result<(), ServiceError> {
        let url = format!("{}/recipes/{}", self.base_url, id);
        tracing::debug!(%id, title = %payload.title, "updating recipe");
        self.send_json(self.authed(self.client.put(&url)).json(payload))
            .await?;
        tracing::info!(%id, "recipe updated");
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<String>, ServiceError> {
        let url = format!("{}/categories", self.base_url);
        let value = self.send_json(self.authed(self.client.get(&url))).await?;
        Ok(categories_from_response(&value))
    }
}
