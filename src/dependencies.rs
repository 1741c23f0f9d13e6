use std::sync::Arc;

use crate::{
	adapters::repositories::Storage,
	config::Config,
	database::{connection_pool, lazy_connection_pool, DatabaseExecutor},
	services::response::ServiceError,
};

/// Everything a request needs, built once at startup and handed to the router.
#[derive(Clone)]
pub struct AppState {
	pub config: Arc<Config>,
	pub storage: Storage,
}

impl AppState {
	pub fn new(
		config: Config,
		executor: DatabaseExecutor,
	) -> Self {
		Self {
			config: Arc::new(config),
			storage: Storage::new(executor),
		}
	}

	pub async fn connect(config: Config) -> Result<Self, ServiceError> {
		let pool = connection_pool(&config.db).await?;
		let executor = DatabaseExecutor::new(pool, config.db.query_timeout);
		Ok(Self::new(config, executor))
	}

	/// Same as [`AppState::connect`] but nothing is dialed until the first query.
	pub fn connect_lazy(config: Config) -> Result<Self, ServiceError> {
		let pool = lazy_connection_pool(&config.db)?;
		let executor = DatabaseExecutor::new(pool, config.db.query_timeout);
		Ok(Self::new(config, executor))
	}
}
