use std::sync::Arc;

use xpass_service::DiscoveryService;
use xpass_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<DiscoveryService>,
}
impl AppState {
	pub async fn new(config: xpass_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = DiscoveryService::new(config, Arc::new(db));

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: DiscoveryService) -> Self {
		Self { service: Arc::new(service) }
	}
}
