//! Title conflict detection.
//!
//! A user may not own two recipes with the same normalized title. The
//! remote search endpoint matches loosely (substring/partial), so the
//! resolver scans the returned candidates client-side and picks the first
//! exact normalized match owned by the author.

use crate::error::ConflictCheckError;
use crate::remote::RecipeService;
use crate::types::RecipeId;

/// Outcome of a title conflict check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleConflict {
    /// No recipe owned by the author has this title.
    None,
    /// The author already owns a recipe with this title; its id is the
    /// edit target for the rest of the session.
    Existing { id: RecipeId },
}

/// Normalization applied to both sides of every title comparison.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Check whether `author` already owns a recipe titled `title`.
///
/// A service failure is surfaced as [`ConflictCheckError::Unavailable`],
/// never as "no conflict" — the caller must halt and let the user retry
/// the check rather than proceed to create.
pub async fn check_title_conflict(
    service: &dyn RecipeService,
    title: &str,
    author: &str,
) -> Result<TitleConflict, ConflictCheckError> {
    let wanted = normalize_title(title);

    let candidates = service
        .search(title, author)
        .await
        .map_err(ConflictCheckError::Unavailable)?;

    tracing::debug!(title, author, candidates = candidates.len(), "conflict check");

    for candidate in candidates {
        if candidate.author == author && normalize_title(&candidate.title) == wanted {
            tracing::debug!(id = %candidate.id, "title conflict found");
            return Ok(TitleConflict::Existing { id: candidate.id });
        }
    }

    Ok(TitleConflict::None)
}
