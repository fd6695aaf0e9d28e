use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub authorization: Authorization,
	pub storage: Storage,
	pub providers: Providers,
	pub retrieval: Retrieval,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

/// Connection details for the external authorization oracle plus the fixed
/// triple (relation, object type, subject type) this deployment's
/// authorization model is queried with.
#[derive(Debug, Deserialize)]
pub struct Authorization {
	pub api_base: String,
	pub store_id: String,
	pub authorization_model_id: String,
	/// Optional: a local oracle may run unauthenticated.
	pub api_token: Option<String>,
	#[serde(default = "default_relation")]
	pub relation: String,
	#[serde(default = "default_object_type")]
	pub object_type: String,
	#[serde(default = "default_subject_type")]
	pub subject_type: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub generation: GenerationProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct GenerationProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub max_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Retrieval {
	/// How many passages a query may hand to generation.
	pub top_k: u32,
	/// Over-fetch factor applied to the vector search so that candidates
	/// excluded by authorization filtering do not starve the result set.
	#[serde(default = "default_overfetch_multiplier")]
	pub overfetch_multiplier: u32,
}

fn default_relation() -> String {
	"viewer".to_string()
}

fn default_object_type() -> String {
	"doc".to_string()
}

fn default_subject_type() -> String {
	"user".to_string()
}

fn default_overfetch_multiplier() -> u32 {
	2
}
