use tracing::{info, warn};

use warden_domain::{AuthorizedSet, Candidate, GroundedPassage};

use crate::{ServiceError, ServiceResult, WardenService, merge, respond};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QueryRequest {
	pub query: String,
	pub subject: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SourceScore {
	pub source: String,
	pub score: f32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QueryOutcome {
	pub query: String,
	pub subject: String,
	pub authorized_count: usize,
	pub sources: Vec<SourceScore>,
	pub answer: String,
}

impl WardenService {
	/// Runs one query end to end. Past request validation, every remote
	/// failure degrades to an empty or refusal outcome; none of them relaxes
	/// the authorization check to keep the request alive.
	pub async fn process_query(&self, req: QueryRequest) -> ServiceResult<QueryOutcome> {
		if req.query.trim().is_empty() || req.subject.trim().is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "query and subject are required.".to_string(),
			});
		}

		let query = req.query.clone();
		let subject = req.subject.clone();

		// The grant lookup and the query embedding are independent of each
		// other; only the vector search needs both.
		let (authorized, query_vector) =
			tokio::join!(self.resolve_authorized_documents(&subject), self.embed_query(&query));

		if authorized.is_empty() {
			info!(%subject, "No authorized documents; skipping retrieval.");

			return Ok(build_outcome(req, Vec::new(), respond::NO_CONTEXT_ANSWER.to_string()));
		}

		let candidates = self.search_candidates(query_vector).await;
		let passages = merge::merge_authorized(
			self.docs.as_ref(),
			&authorized,
			candidates,
			self.cfg.retrieval.top_k as usize,
		)
		.await;
		let answer = respond::answer(
			self.providers.generation.as_ref(),
			&self.cfg.providers.generation,
			&query,
			&passages,
		)
		.await;

		info!(%subject, authorized_count = passages.len(), "Query completed.");

		Ok(build_outcome(req, passages, answer))
	}

	/// Fail-closed grant resolution: any oracle failure counts as zero
	/// grants, never as "all authorized".
	async fn resolve_authorized_documents(&self, subject: &str) -> AuthorizedSet {
		match self.providers.oracle.list_objects(&self.cfg.authorization, subject).await {
			Ok(objects) =>
				AuthorizedSet::from_prefixed(objects, &self.cfg.authorization.object_type),
			Err(err) => {
				warn!(error = %err, subject, "Authorization oracle failed; treating as zero grants.");

				AuthorizedSet::empty()
			},
		}
	}

	async fn embed_query(&self, query: &str) -> Option<Vec<f32>> {
		let want = self.cfg.providers.embedding.dimensions as usize;

		match self.providers.embedding.embed(&self.cfg.providers.embedding, query).await {
			Ok(vector) if vector.len() == want => Some(vector),
			Ok(vector) => {
				warn!(
					got = vector.len(),
					want, "Embedding dimension mismatch; treating as no results."
				);

				None
			},
			Err(err) => {
				warn!(error = %err, "Query embedding failed; treating as no results.");

				None
			},
		}
	}

	/// Over-fetched nearest-neighbor lookup. A missing embedding or a search
	/// failure both collapse to "no candidates" so the query still completes
	/// with a refusal outcome.
	async fn search_candidates(&self, query_vector: Option<Vec<f32>>) -> Vec<Candidate> {
		let Some(vector) = query_vector else {
			return Vec::new();
		};
		let limit = u64::from(self.cfg.retrieval.top_k)
			* u64::from(self.cfg.retrieval.overfetch_multiplier);

		match self.search.search(vector, limit).await {
			Ok(candidates) => candidates,
			Err(err) => {
				warn!(error = %err, "Vector search failed; treating as no results.");

				Vec::new()
			},
		}
	}
}

fn build_outcome(
	req: QueryRequest,
	passages: Vec<GroundedPassage>,
	answer: String,
) -> QueryOutcome {
	let sources = passages
		.iter()
		.map(|passage| SourceScore { source: passage.source.clone(), score: passage.score })
		.collect();

	QueryOutcome {
		query: req.query,
		subject: req.subject,
		authorized_count: passages.len(),
		sources,
		answer,
	}
}
