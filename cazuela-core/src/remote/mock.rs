//! Mock recipe service for testing.
//!
//! Responses are canned per operation; every call is recorded so tests can
//! assert what did (and, more importantly, did not) reach the backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ServiceError;
use crate::types::{RecipeId, RecipePayload, RecipeSummary, RemoteRecipe, RemoteStep};

use super::RecipeService;

/// A recorded call against the mock service.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    Search { title: String, author: String },
    Fetch { id: RecipeId },
    Create { title: String },
    Update { id: RecipeId, title: String },
    Categories,
}

impl ServiceCall {
    /// True for calls that would change server state.
    pub fn is_mutation(&self) -> bool {
        matches!(self, ServiceCall::Create { .. } | ServiceCall::Update { .. })
    }
}

/// Mock recipe service for testing.
pub struct MockRecipeService {
    search_results: Result<Vec<RecipeSummary>, String>,
    records: HashMap<RecipeId, Value>,
    categories: Vec<String>,
    create_id: Option<RecipeId>,
    create_error: Option<String>,
    update_error: Option<String>,
    calls: Mutex<Vec<ServiceCall>>,
    created: Mutex<Vec<RecipePayload>>,
    next_id: Mutex<u32>,
}

impl MockRecipeService {
    /// Create a new mock with empty search results and no records.
    pub fn new() -> Self {
        Self {
            search_results: Ok(Vec::new()),
            records: HashMap::new(),
            categories: Vec::new(),
            create_id: None,
            create_error: None,
            update_error: None,
            calls: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Set the summaries returned by search.
    pub fn with_search_results(mut self, results: Vec<RecipeSummary>) -> Self {
        self.search_results = Ok(results);
        self
    }

    /// Make search fail.
    pub fn with_search_error(mut self, error: &str) -> Self {
        self.search_results = Err(error.to_string());
        self
    }

    /// Add a raw record served by fetch.
    pub fn with_record(mut self, id: &str, record: Value) -> Self {
        self.records.insert(RecipeId::from(id), record);
        self
    }

    /// Set the category list.
    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Fix the id assigned to created recipes.
    pub fn with_create_id(mut self, id: &str) -> Self {
        self.create_id = Some(RecipeId::from(id));
        self
    }

    /// Make create fail.
    pub fn with_create_error(mut self, error: &str) -> Self {
        self.create_error = Some(error.to_string());
        self
    }

    /// Make update fail.
    pub fn with_update_error(mut self, error: &str) -> Self {
        self.update_error = Some(error.to_string());
        self
    }

    /// Every call made against this mock, in order.
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// True if any create or update reached the mock.
    pub fn saw_mutation(&self) -> bool {
        self.calls.lock().unwrap().iter().any(ServiceCall::is_mutation)
    }

    /// Payloads received by create, in order.
    pub fn created_payloads(&self) -> Vec<RecipePayload> {
        self.created.lock().unwrap().clone()
    }

    fn record(&self, call: ServiceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for MockRecipeService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeService for MockRecipeService {
    async fn search(&self, title: &str, author: &str) -> Result<Vec<RecipeSummary>, ServiceError> {
        self.record(ServiceCall::Search {
            title: title.to_string(),
            author: author.to_string(),
        });
        match &self.search_results {
            Ok(results) => Ok(results.clone()),
            Err(e) => Err(ServiceError::RequestFailed(e.clone())),
        }
    }

    async fn fetch(&self, id: &RecipeId) -> Result<Value, ServiceError> {
        self.record(ServiceCall::Fetch { id: id.clone() });
        self.records.get(id).cloned().ok_or_else(|| ServiceError::Api {
            status: 404,
            message: format!("no mock record for id {id}"),
        })
    }

    async fn create(&self, payload: &RecipePayload) -> Result<RemoteRecipe, ServiceError> {
        self.record(ServiceCall::Create {
            title: payload.title.clone(),
        });
        if let Some(error) = &self.create_error {
            return Err(ServiceError::RequestFailed(error.clone()));
        }
        self.created.lock().unwrap().push(payload.clone());

        let id = self.create_id.clone().unwrap_or_else(|| {
            let mut next = self.next_id.lock().unwrap();
            let id = RecipeId::new(format!("mock-{}", *next));
            *next += 1;
            id
        });

        Ok(RemoteRecipe {
            id,
            author: String::new(),
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

    async fn update(&self, id: &RecipeId, payload: &RecipePayload) -> Result<(), ServiceError> {
        self.record(ServiceCall::Update {
            id: id.clone(),
            title: payload.title.clone(),
        });
        match &self.update_error {
            Some(error) => Err(ServiceError::RequestFailed(error.clone())),
            None => Ok(()),
        }
    }

    async fn list_categories(&self) -> Result<Vec<String>, ServiceError> {
        self.record(ServiceCall::Categories);
        Ok(self.categories.clone())
    }
}
