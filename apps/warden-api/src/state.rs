use std::sync::Arc;

use warden_service::WardenService;
use warden_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<WardenService>,
}
impl AppState {
	pub async fn new(config: warden_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let qdrant = QdrantStore::new(&config.storage.qdrant)?;
		let service = WardenService::new(config, db, qdrant);

		Ok(Self { service: Arc::new(service) })
	}
}
