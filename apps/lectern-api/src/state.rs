use std::sync::Arc;

use lectern_service::LecternService;
use lectern_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<LecternService>,
}
impl AppState {
	/// Connects to Postgres, applies the schema, and wires the HTTP ledger.
	pub async fn new(config: lectern_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = LecternService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
