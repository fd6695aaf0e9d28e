pub const DOC_ID_PAYLOAD_KEY: &str = "doc_id";

use std::time::Duration;

use qdrant_client::qdrant::{Query, QueryPointsBuilder, ScoredPoint, value::Kind};
use tokio::time;
use tracing::warn;

use warden_domain::Candidate;

use crate::{Error, Result};

const SEARCH_ATTEMPTS: u32 = 3;
const SEARCH_BACKOFF_START: Duration = Duration::from_millis(100);

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
	pub timeout: Duration,
}
impl QdrantStore {
	pub fn new(cfg: &warden_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self {
			client,
			collection: cfg.collection.clone(),
			vector_dim: cfg.vector_dim,
			timeout: Duration::from_millis(cfg.timeout_ms),
		})
	}

	/// Nearest-neighbor query returning candidates in the backend's rank
	/// order. The query is read-only, so transient failures and timeouts are
	/// retried with bounded backoff before the error is handed back.
	pub async fn search_candidates(&self, vector: Vec<f32>, limit: u64) -> Result<Vec<Candidate>> {
		let mut backoff = SEARCH_BACKOFF_START;
		let mut attempt = 1;

		loop {
			let search = QueryPointsBuilder::new(self.collection.clone())
				.query(Query::new_nearest(vector.clone()))
				.with_payload(true)
				.limit(limit);
			let err = match time::timeout(self.timeout, self.client.query(search)).await {
				Ok(Ok(response)) => return Ok(collect_candidates(&response.result)),
				Ok(Err(err)) => Error::from(err),
				Err(_) => Error::Unavailable("Vector search timed out.".to_string()),
			};

			if attempt < SEARCH_ATTEMPTS {
				warn!(error = %err, attempt, "Vector search failed; retrying.");
				time::sleep(backoff).await;

				backoff = backoff.saturating_mul(2);
				attempt += 1;
			} else {
				return Err(err);
			}
		}
	}
}

fn collect_candidates(points: &[ScoredPoint]) -> Vec<Candidate> {
	let mut candidates = Vec::with_capacity(points.len());

	for point in points {
		let doc_id = point.payload.get(DOC_ID_PAYLOAD_KEY).and_then(|value| match &value.kind {
			Some(Kind::StringValue(text)) => Some(text.as_str()),
			_ => None,
		});
		let Some(doc_id) = doc_id else {
			warn!(score = point.score, "Search hit is missing a doc_id payload; skipping.");

			continue;
		};

		candidates.push(Candidate { doc_id: doc_id.to_string(), score: point.score });
	}

	candidates
}
