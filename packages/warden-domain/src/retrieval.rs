use serde_json::Value;

/// A scored hit from the vector search backend. Candidates arrive in the
/// backend's rank order (descending score, backend-native tie order) and are
/// never re-sorted downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
	pub doc_id: String,
	pub score: f32,
}

/// A request-scoped, read-only copy of a stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
	pub doc_id: String,
	pub source: String,
	pub text: String,
	pub metadata: Value,
}

/// A document admitted into generation context. `source` is a member of the
/// authorized set the query was resolved against; the merge step enforces
/// this unconditionally.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedPassage {
	pub source: String,
	pub text: String,
	pub score: f32,
	pub metadata: Value,
}
