//! Connectivity-aware recipe publish workflow.
//!
//! The library behind the app's publish screen: title conflict checks
//! against the author's own recipes, prefill from an existing recipe,
//! media upload, routing a validated draft to the server or to local draft
//! storage depending on connectivity, and replaying stored drafts later.
//! The UI layer owns rendering and prompts; everything here returns typed
//! outcomes for it to display.

pub mod conflict;
pub mod connectivity;
pub mod draft_store;
pub mod error;
pub mod hydrate;
pub mod media;
pub mod remote;
pub mod types;
pub mod validate;
pub mod workflow;

pub use conflict::{check_title_conflict, normalize_title, TitleConflict};
pub use connectivity::{ConnectivityCallback, ConnectivityMonitor, SharedMonitor};
pub use draft_store::{DraftStore, FileDraftStore, MemoryDraftStore};
pub use error::{
    ConflictCheckError, DraftStoreError, HydrateError, MediaError, MediaSlot, ServiceError,
    SubmitError, UploadError,
};
pub use hydrate::hydrate_draft;
pub use media::{
    is_local_uri, resolve_media, HttpMediaUploader, MediaUploader, MockUploader, ResolvedMedia,
};
pub use remote::{
    HttpRecipeService, HttpRecipeServiceBuilder, MockRecipeService, RecipeService, ServiceCall,
};
pub use types::{
    ConnectivityState, DraftStep, IngredientEntry, RecipeDraft, RecipeId, RecipePayload,
    RecipeSummary, RemoteRecipe, RemoteStep, StoredDraft, Transport,
};
pub use validate::{validate_draft, Field, FieldError};
pub use workflow::{
    CellularDecision, DraftRetryReport, RecipePublisher, RetryDisposition, SubmitOptions,
    SubmitOutcome,
};
