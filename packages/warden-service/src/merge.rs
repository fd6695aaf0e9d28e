use std::collections::HashSet;

use tracing::warn;

use warden_domain::{AuthorizedSet, Candidate, GroundedPassage};

use crate::DocumentFetcher;

/// Reconciles the scored candidate list with the subject's authorized set.
///
/// Candidates are visited in the order the search backend ranked them, so
/// the output stays sorted by descending relevance without re-sorting.
/// Duplicate identifiers are dropped before any fetch happens; a failed or
/// missing fetch skips that candidate only. Iteration stops as soon as
/// `top_k` passages are admitted, which bounds fetch cost to the authorized
/// prefix actually needed.
///
/// Every passage returned satisfies `authorized.contains(&passage.source)`.
/// A fetch failure is a skip, never an admission.
pub async fn merge_authorized(
	docs: &dyn DocumentFetcher,
	authorized: &AuthorizedSet,
	candidates: Vec<Candidate>,
	top_k: usize,
) -> Vec<GroundedPassage> {
	if authorized.is_empty() || top_k == 0 {
		// Zero grants means zero fetches: unauthorized identifiers must not
		// reach the document store, not even as fetch traffic.
		return Vec::new();
	}

	let mut seen = HashSet::new();
	let mut passages = Vec::new();

	for candidate in candidates {
		if !seen.insert(candidate.doc_id.clone()) {
			continue;
		}

		let document = match docs.fetch(&candidate.doc_id).await {
			Ok(Some(document)) => document,
			Ok(None) => {
				warn!(doc_id = %candidate.doc_id, "Candidate document is missing; skipping.");

				continue;
			},
			Err(err) => {
				warn!(doc_id = %candidate.doc_id, error = %err, "Candidate fetch failed; skipping.");

				continue;
			},
		};

		if !authorized.contains(&document.source) {
			continue;
		}

		passages.push(GroundedPassage {
			source: document.source,
			text: document.text,
			score: candidate.score,
			metadata: document.metadata,
		});

		if passages.len() == top_k {
			break;
		}
	}

	passages
}
