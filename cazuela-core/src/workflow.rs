//! The submission router and draft retry runner.
//!
//! One submission attempt walks an explicit phase chain:
//! Validate → CheckConnectivity → {SaveAsDraft | ConfirmCellular |
//! Submitting}. The phase value is the single authority on where the
//! attempt stands; there are no per-modal loading flags to drift out of
//! sync. The workflow never retries on its own — every retry is a
//! user-initiated call, either resubmitting the form or running the draft
//! retry runner.

use std::sync::Arc;

use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::conflict::{self, TitleConflict};
use crate::connectivity::ConnectivityMonitor;
use crate::draft_store::DraftStore;
use crate::error::{ConflictCheckError, DraftStoreError, HydrateError, SubmitError};
use crate::hydrate;
use crate::media::{resolve_media, MediaUploader, ResolvedMedia};
use crate::remote::RecipeService;
use crate::types::{RecipeDraft, RecipeId, RecipePayload, RemoteStep, StoredDraft, Transport};
use crate::validate::validate_draft;

/// The user's standing answer to the cellular-data prompt.
///
/// `Ask` means the user has not been prompted yet: if the connection turns
/// out to be cellular, the attempt stops at
/// [`SubmitOutcome::CellularConfirmationRequired`] and the UI re-invokes
/// with the chosen decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellularDecision {
    #[default]
    Ask,
    PublishNow,
    DeferToWifi,
}

/// Per-attempt submission inputs beyond the draft itself.
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    /// Id of an existing recipe to update instead of creating a new one.
    /// Set when the user chose edit-existing after a title conflict; lives
    /// only for the current editing session.
    pub edit_target: Option<RecipeId>,
    /// Category names sourced from the server by the caller. When present,
    /// the draft's category must be one of them.
    pub categories: Option<Vec<String>>,
    pub cellular: CellularDecision,
}

/// How a submission attempt concluded (errors travel separately as
/// [`SubmitError`]).
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// No connectivity (or the user deferred to wifi): the draft now sits
    /// in the user's draft collection.
    SavedAsDraft { draft_id: Uuid },
    /// The connection is cellular and the user has not decided yet.
    CellularConfirmationRequired,
    /// The recipe is on the server.
    Submitted { id: RecipeId, updated: bool },
}

/// Authoritative position of one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Validate,
    CheckConnectivity,
    ConfirmCellular,
    SaveAsDraft,
    Submitting,
}

/// Per-draft outcome of a retry run.
#[derive(Debug)]
pub enum RetryDisposition {
    /// Submitted and removed from the draft store.
    Submitted { id: RecipeId },
    /// No connectivity when this draft's turn came; left stored.
    SkippedOffline,
    /// Cellular connection and the decision callback answered `Ask`.
    ConfirmationRequired,
    /// Cellular connection and the user deferred this draft to wifi.
    Deferred,
    /// The attempt failed; the draft is left stored for another run.
    Failed(SubmitError),
    /// The recipe reached the server but the stale local draft could not
    /// be removed; surfaced so the caller can warn about the leftover.
    RemovalFailed { id: RecipeId, error: DraftStoreError },
}

/// Report row for one stored draft in a retry run.
#[derive(Debug)]
pub struct DraftRetryReport {
    pub draft_id: Uuid,
    pub title: String,
    pub disposition: RetryDisposition,
}

/// Orchestrates title checks, hydration, media upload, submission routing
/// and draft retry over the four collaborator seams.
///
/// Entry points take the author alias explicitly; nothing here reads
/// ambient "current user" state.
pub struct RecipePublisher {
    service: Arc<dyn RecipeService>,
    uploader: Arc<dyn MediaUploader>,
    connectivity: Arc<dyn ConnectivityMonitor>,
    drafts: Arc<dyn DraftStore>,
}

impl RecipePublisher {
    pub fn new(
        service: Arc<dyn RecipeService>,
        uploader: Arc<dyn MediaUploader>,
        connectivity: Arc<dyn ConnectivityMonitor>,
        drafts: Arc<dyn DraftStore>,
    ) -> Self {
        Self {
            service,
            uploader,
            connectivity,
            drafts,
        }
    }

    /// Check whether `author` already owns a recipe with this title.
    pub async fn check_title_conflict(
        &self,
        title: &str,
        author: &str,
    ) -> Result<TitleConflict, ConflictCheckError> {
        conflict::check_title_conflict(self.service.as_ref(), title, author).await
    }

    /// Fetch an existing recipe and turn it into an editable draft for the
    /// edit-existing path. On failure the caller stays on the title step.
    pub async fn hydrate_from_existing(&self, id: &RecipeId) -> Result<RecipeDraft, HydrateError> {
        let raw = self.service.fetch(id).await.map_err(HydrateError::Fetch)?;
        Ok(hydrate::hydrate_draft(&raw))
    }

    /// Run one submission attempt for a draft.
    ///
    /// Ordering within the attempt is fixed: validation, then the
    /// connectivity read, then media uploads, then the create/update call.
    /// On any error the draft fields are untouched and the user may retry.
    pub async fn submit(
        &self,
        author: &str,
        draft: &RecipeDraft,
        options: &SubmitOptions,
    ) -> Result<SubmitOutcome, SubmitError> {
        let mut phase = Phase::Validate;

        loop {
            tracing::debug!(?phase, author, title = %draft.title, "submission phase");
            match phase {
                Phase::Validate => {
                    let errors = validate_draft(draft, options.categories.as_deref());
                    if !errors.is_empty() {
                        return Err(SubmitError::Validation(errors));
                    }
                    phase = Phase::CheckConnectivity;
                }
                Phase::CheckConnectivity => {
                    let state = self.connectivity.current();
                    phase = if !state.reachable {
                        Phase::SaveAsDraft
                    } else if state.transport == Transport::Cellular {
                        Phase::ConfirmCellular
                    } else {
                        // Wifi, and also reachable-but-unknown transport:
                        // the prompt exists to warn about metered data.
                        Phase::Submitting
                    };
                }
                Phase::ConfirmCellular => match options.cellular {
                    CellularDecision::Ask => {
                        return Ok(SubmitOutcome::CellularConfirmationRequired)
                    }
                    CellularDecision::PublishNow => phase = Phase::Submitting,
                    CellularDecision::DeferToWifi => phase = Phase::SaveAsDraft,
                },
                Phase::SaveAsDraft => {
                    let draft_id = self
                        .save_draft(author, draft.clone())
                        .await
                        .map_err(SubmitError::DraftPersistence)?;
                    return Ok(SubmitOutcome::SavedAsDraft { draft_id });
                }
                Phase::Submitting => {
                    let (id, updated) = self
                        .push_to_server(draft, options.edit_target.as_ref())
                        .instrument(info_span!("submit_recipe", title = %draft.title))
                        .await?;
                    return Ok(SubmitOutcome::Submitted { id, updated });
                }
            }
        }
    }

    /// Attempt every stored draft for `author`, one at a time, each fully
    /// resolved before the next. One draft's failure never blocks the
    /// rest, and each success removes its draft from the store immediately
    /// so a crash mid-run loses no confirmed progress.
    ///
    /// `decide_cellular` is consulted per draft when the connection is
    /// cellular; the UI backs it with a prompt, tests with a constant.
    pub async fn retry_all_drafts(
        &self,
        author: &str,
        decide_cellular: &(dyn Fn(&StoredDraft) -> CellularDecision + Sync),
    ) -> Result<Vec<DraftRetryReport>, DraftStoreError> {
        let snapshot = self.drafts.get(author).await?;
        tracing::info!(author, drafts = snapshot.len(), "retrying stored drafts");

        let mut reports = Vec::with_capacity(snapshot.len());
        for stored in snapshot {
            let disposition = self.retry_one(author, &stored, decide_cellular).await;
            tracing::debug!(draft = %stored.id, ?disposition, "draft retry resolved");
            reports.push(DraftRetryReport {
                draft_id: stored.id,
                title: stored.draft.title.clone(),
                disposition,
            });
        }
        Ok(reports)
    }

    async fn retry_one(
        &self,
        author: &str,
        stored: &StoredDraft,
        decide_cellular: &(dyn Fn(&StoredDraft) -> CellularDecision + Sync),
    ) -> RetryDisposition {
        let state = self.connectivity.current();
        if !state.reachable {
            return RetryDisposition::SkippedOffline;
        }
        if state.transport == Transport::Cellular {
            match decide_cellular(stored) {
                CellularDecision::Ask => return RetryDisposition::ConfirmationRequired,
                CellularDecision::DeferToWifi => return RetryDisposition::Deferred,
                CellularDecision::PublishNow => {}
            }
        }

        // Stored drafts always replay through the create path; the edit
        // target never outlives the editing session it was found in.
        match self.push_to_server(&stored.draft, None).await {
            Ok((id, _)) => match self.remove_draft(author, stored.id).await {
                Ok(()) => RetryDisposition::Submitted { id },
                Err(error) => {
                    tracing::warn!(draft = %stored.id, %error, "submitted but draft removal failed");
                    RetryDisposition::RemovalFailed { id, error }
                }
            },
            Err(e) => RetryDisposition::Failed(e),
        }
    }

    /// Upload media and issue the create or update call. The create/update
    /// is never reached if any upload failed.
    async fn push_to_server(
        &self,
        draft: &RecipeDraft,
        edit_target: Option<&RecipeId>,
    ) -> Result<(RecipeId, bool), SubmitError> {
        let resolved = resolve_media(&self.uploader, draft).await?;
        let payload = build_payload(draft, &resolved);

        match edit_target {
            Some(id) => {
                self.service
                    .update(id, &payload)
                    .await
                    .map_err(SubmitError::Submission)?;
                Ok((id.clone(), true))
            }
            None => {
                let created = self
                    .service
                    .create(&payload)
                    .await
                    .map_err(SubmitError::Submission)?;
                Ok((created.id, false))
            }
        }
    }

    /// Append a draft to the user's stored collection. The list is re-read
    /// immediately before the write so a stale in-memory copy can't drop
    /// drafts stored since.
    async fn save_draft(
        &self,
        author: &str,
        draft: RecipeDraft,
    ) -> Result<Uuid, DraftStoreError> {
        let stored = StoredDraft::new(draft);
        let draft_id = stored.id;

        let mut drafts = self.drafts.get(author).await?;
        drafts.push(stored);
        self.drafts.set(author, drafts).await?;

        tracing::info!(author, draft = %draft_id, "draft saved for later");
        Ok(draft_id)
    }

    /// Remove one stored draft by id, against the latest persisted list.
    async fn remove_draft(&self, author: &str, draft_id: Uuid) -> Result<(), DraftStoreError> {
        let drafts = self.drafts.get(author).await?;
        let remaining: Vec<StoredDraft> =
            drafts.into_iter().filter(|d| d.id != draft_id).collect();
        self.drafts.set(author, remaining).await
    }
}

/// Build the wire payload from a validated draft and its resolved media.
/// Placeholder rows are dropped; `is_verified` is always false from this
/// client.
fn build_payload(draft: &RecipeDraft, media: &ResolvedMedia) -> RecipePayload {
    RecipePayload {
        title: draft.title.trim().to_string(),
        description: draft
            .description
            .clone()
            .filter(|d| !d.trim().is_empty()),
        category: draft.category.trim().to_string(),
        portions: draft.portions.trim().to_string(),
        ingredients: draft.named_ingredients().map(|(_, i)| i.clone()).collect(),
        steps_list: draft
            .real_steps()
            .map(|(index, step)| RemoteStep {
                description: step.description.trim().to_string(),
                image_url: media.step_media.get(index).cloned().flatten(),
            })
            .collect(),
        image_url: media.final_photo_url.clone(),
        is_verified: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DraftStep, IngredientEntry};

    fn draft_with_placeholders() -> RecipeDraft {
        RecipeDraft {
            title: "  Pizza Carbonara ".to_string(),
            description: Some("  ".to_string()),
            category: "Pizzas".to_string(),
            portions: " 4 ".to_string(),
            ingredients: vec![
                IngredientEntry::new("guanciale", "100", "g"),
                IngredientEntry::default(),
            ],
            steps: vec![
                DraftStep::with_media("Fry", "file:///a.jpg"),
                DraftStep::default(),
            ],
            final_photo_uri: None,
        }
    }

    #[test]
    fn payload_drops_placeholders_and_trims() {
        let draft = draft_with_placeholders();
        let media = ResolvedMedia {
            final_photo_url: None,
            step_media: vec![Some("https://cdn.example.com/a.jpg".to_string()), None],
        };

        let payload = build_payload(&draft, &media);
        assert_eq!(payload.title, "Pizza Carbonara");
        assert_eq!(payload.description, None);
        assert_eq!(payload.portions, "4");
        assert_eq!(payload.ingredients.len(), 1);
        assert_eq!(payload.steps_list.len(), 1);
        assert_eq!(
            payload.steps_list[0].image_url.as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
        assert!(!payload.is_verified);
    }

    #[test]
    fn step_media_keeps_original_indices_after_placeholder_drop() {
        let draft = RecipeDraft {
            title: "T".to_string(),
            category: "C".to_string(),
            portions: "2".to_string(),
            ingredients: vec![IngredientEntry::new("salt", "1", "pinch")],
            steps: vec![
                DraftStep::default(),
                DraftStep::with_media("Second", "file:///b.jpg"),
            ],
            ..Default::default()
        };
        let media = ResolvedMedia {
            final_photo_url: None,
            step_media: vec![None, Some("https://cdn.example.com/b.jpg".to_string())],
        };

        let payload = build_payload(&draft, &media);
        assert_eq!(payload.steps_list.len(), 1);
        assert_eq!(
            payload.steps_list[0].image_url.as_deref(),
            Some("https://cdn.example.com/b.jpg")
        );
    }
}
