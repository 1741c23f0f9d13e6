use sqlx::{migrate::Migrator, PgPool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::Config, services::response::ServiceError};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub struct Boostrap;
impl Boostrap {
	/// `RUST_LOG` wins over `LOG_LEVEL`.
	pub fn tracing(config: &Config) {
		let default_filter = format!("social={level},tower_http={level},axum::rejection=trace", level = config.log_level);

		tracing_subscriber::registry()
			.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
			.with(tracing_subscriber::fmt::layer())
			.init();
	}

	pub async fn migrate(pool: &PgPool) -> Result<(), ServiceError> {
		MIGRATOR
			.run(pool)
			.await
			.map_err(|err| ServiceError::Internal(format!("migration failed: {err}")))?;
		tracing::info!("database migrations applied");
		Ok(())
	}
}
