pub mod merge;
pub mod query;
pub mod respond;

use std::{future::Future, pin::Pin, sync::Arc};

use warden_config::{Authorization, Config, EmbeddingProviderConfig, GenerationProviderConfig};
use warden_domain::{Candidate, Document};
use warden_providers::{embedding, generation, oracle};
use warden_storage::{db::Db, docs, models::StoredDocument, qdrant::QdrantStore};

pub use merge::merge_authorized;
pub use query::{QueryOutcome, QueryRequest, SourceScore};
pub use respond::{GENERATION_FAILURE_ANSWER, NO_CONTEXT_ANSWER};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Resolves which objects a subject may read. Implementations report
/// failures as errors; the pipeline is the only place allowed to decide what
/// a failure means, and it always decides "zero grants".
pub trait AuthorizationOracle
where
	Self: Send + Sync,
{
	fn list_objects<'a>(
		&'a self,
		cfg: &'a Authorization,
		subject: &'a str,
	) -> BoxFuture<'a, warden_providers::Result<Vec<String>>>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, warden_providers::Result<Vec<f32>>>;
}

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		system: &'a str,
		user: &'a str,
	) -> BoxFuture<'a, warden_providers::Result<String>>;
}

pub trait VectorSearch
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u64,
	) -> BoxFuture<'a, warden_storage::Result<Vec<Candidate>>>;
}

pub trait DocumentFetcher
where
	Self: Send + Sync,
{
	fn fetch<'a>(
		&'a self,
		doc_id: &'a str,
	) -> BoxFuture<'a, warden_storage::Result<Option<Document>>>;
}

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	Provider { message: String },
	Storage { message: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::Provider { message } => write!(f, "Provider error: {message}"),
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<warden_providers::Error> for ServiceError {
	fn from(err: warden_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<warden_storage::Error> for ServiceError {
	fn from(err: warden_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

#[derive(Clone)]
pub struct Providers {
	pub oracle: Arc<dyn AuthorizationOracle>,
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub generation: Arc<dyn GenerationProvider>,
}

struct DefaultProviders;

impl AuthorizationOracle for DefaultProviders {
	fn list_objects<'a>(
		&'a self,
		cfg: &'a Authorization,
		subject: &'a str,
	) -> BoxFuture<'a, warden_providers::Result<Vec<String>>> {
		Box::pin(oracle::list_objects(cfg, subject))
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, warden_providers::Result<Vec<f32>>> {
		Box::pin(embedding::embed(cfg, text))
	}
}

impl GenerationProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		system: &'a str,
		user: &'a str,
	) -> BoxFuture<'a, warden_providers::Result<String>> {
		Box::pin(generation::generate(cfg, system, user))
	}
}

impl Providers {
	pub fn new(
		oracle: Arc<dyn AuthorizationOracle>,
		embedding: Arc<dyn EmbeddingProvider>,
		generation: Arc<dyn GenerationProvider>,
	) -> Self {
		Self { oracle, embedding, generation }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { oracle: provider.clone(), embedding: provider.clone(), generation: provider }
	}
}

impl VectorSearch for QdrantStore {
	fn search<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u64,
	) -> BoxFuture<'a, warden_storage::Result<Vec<Candidate>>> {
		Box::pin(self.search_candidates(vector, limit))
	}
}

impl DocumentFetcher for Db {
	fn fetch<'a>(
		&'a self,
		doc_id: &'a str,
	) -> BoxFuture<'a, warden_storage::Result<Option<Document>>> {
		Box::pin(async move {
			let row = docs::get_document(&self.pool, doc_id).await?;

			Ok(row.map(document_from_row))
		})
	}
}

fn document_from_row(row: StoredDocument) -> Document {
	Document { doc_id: row.doc_id, source: row.source, text: row.content, metadata: row.metadata }
}

pub struct WardenService {
	pub cfg: Config,
	pub search: Arc<dyn VectorSearch>,
	pub docs: Arc<dyn DocumentFetcher>,
	pub providers: Providers,
}
impl WardenService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		Self { cfg, search: Arc::new(qdrant), docs: Arc::new(db), providers: Providers::default() }
	}

	pub fn with_collaborators(
		cfg: Config,
		search: Arc<dyn VectorSearch>,
		docs: Arc<dyn DocumentFetcher>,
		providers: Providers,
	) -> Self {
		Self { cfg, search, docs, providers }
	}
}
