use thiserror::Error;

use crate::validate::FieldError;

/// Error type for remote recipe service calls.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),
}

/// Error type for a single media upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("could not read media at {uri}: {source}")]
    ReadFailed {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    #[error("upload request failed: {0}")]
    RequestFailed(String),

    #[error("upload endpoint returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("upload response had no URL: {0}")]
    Parse(String),
}

/// Which media slot of a draft an upload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    FinalPhoto,
    Step(usize),
}

impl std::fmt::Display for MediaSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaSlot::FinalPhoto => write!(f, "final photo"),
            MediaSlot::Step(i) => write!(f, "step {}", i + 1),
        }
    }
}

/// A failed media resolution, naming the offending slot so the user can
/// tell which step's picture did not make it.
#[derive(Debug, Error)]
#[error("media upload failed for {slot}: {source}")]
pub struct MediaError {
    pub slot: MediaSlot,
    #[source]
    pub source: UploadError,
}

/// Error type for draft store reads and writes.
#[derive(Debug, Error)]
pub enum DraftStoreError {
    #[error("draft store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("draft store held malformed data: {0}")]
    Malformed(String),

    #[error("draft store backend error: {0}")]
    Backend(String),
}

/// The title conflict check could not complete. This is distinct from
/// "no conflict found": the workflow must halt and let the user retry
/// rather than proceed to create.
#[derive(Debug, Error)]
pub enum ConflictCheckError {
    #[error("title check unavailable: {0}")]
    Unavailable(#[source] ServiceError),
}

/// Fetching the conflicting recipe for prefill failed; the user stays on
/// the title step.
#[derive(Debug, Error)]
pub enum HydrateError {
    #[error("could not load existing recipe: {0}")]
    Fetch(#[source] ServiceError),
}

/// Failure of a single submission attempt, surfaced at the workflow
/// boundary. Draft fields are preserved on every variant except
/// `Validation`, where they were never consumed to begin with.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("draft failed validation ({} fields)", .0.len())]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    MediaUpload(#[from] MediaError),

    #[error("recipe submission failed: {0}")]
    Submission(#[source] ServiceError),

    /// Even the offline fallback failed: the recipe is not saved anywhere.
    #[error("could not save draft: {0}")]
    DraftPersistence(#[source] DraftStoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_slot_display_is_one_based() {
        assert_eq!(MediaSlot::Step(0).to_string(), "step 1");
        assert_eq!(MediaSlot::FinalPhoto.to_string(), "final photo");
    }

    #[test]
    fn media_error_names_the_slot() {
        let err = MediaError {
            slot: MediaSlot::Step(2),
            source: UploadError::RequestFailed("timed out".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("step 3"), "got: {msg}");
    }
}
