use std::future::Future;
use std::time::Duration;

use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::{Query, QueryAs};
use sqlx::{postgres::PgPool, FromRow, Postgres};

use crate::config::DatabaseConfig;
use crate::services::response::ServiceError;

/// Executes parameterized statements against Postgres. Every call gets its own
/// deadline; an elapsed deadline cancels that statement only.
#[derive(Clone)]
pub struct DatabaseExecutor {
	pool: PgPool,
	timeout: Duration,
}

impl DatabaseExecutor {
	pub fn new(
		pool: PgPool,
		timeout: Duration,
	) -> Self {
		Self { pool, timeout }
	}

	pub fn connection(&self) -> &PgPool {
		&self.pool
	}

	/// Single row, zero rows is `NotFound`.
	pub async fn fetch_one<'q, O>(
		&self,
		query: QueryAs<'q, Postgres, O, PgArguments>,
	) -> Result<O, ServiceError>
	where
		O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
	{
		self.fetch_optional(query).await?.ok_or(ServiceError::NotFound)
	}

	pub async fn fetch_optional<'q, O>(
		&self,
		query: QueryAs<'q, Postgres, O, PgArguments>,
	) -> Result<Option<O>, ServiceError>
	where
		O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
	{
		self.with_deadline(query.fetch_optional(&self.pool)).await
	}

	/// Zero rows is an empty vector, not an error.
	pub async fn fetch_all<'q, O>(
		&self,
		query: QueryAs<'q, Postgres, O, PgArguments>,
	) -> Result<Vec<O>, ServiceError>
	where
		O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
	{
		self.with_deadline(query.fetch_all(&self.pool)).await
	}

	/// Returns the number of affected rows.
	pub async fn execute<'q>(
		&self,
		query: Query<'q, Postgres, PgArguments>,
	) -> Result<u64, ServiceError> {
		let result = self.with_deadline(query.execute(&self.pool)).await?;
		Ok(result.rows_affected())
	}

	async fn with_deadline<T>(
		&self,
		fut: impl Future<Output = Result<T, sqlx::Error>>,
	) -> Result<T, ServiceError> {
		match tokio::time::timeout(self.timeout, fut).await {
			Ok(result) => result.map_err(ServiceError::from),
			Err(_elapsed) => {
				tracing::warn!(timeout = ?self.timeout, "query deadline elapsed");
				Err(ServiceError::Timeout(self.timeout))
			}
		}
	}
}

pub async fn connection_pool(config: &DatabaseConfig) -> Result<PgPool, ServiceError> {
	pool_options(config)
		.connect(&config.addr)
		.await
		.map_err(ServiceError::Database)
}

/// Pool that only connects on first use.
pub fn lazy_connection_pool(config: &DatabaseConfig) -> Result<PgPool, ServiceError> {
	pool_options(config).connect_lazy(&config.addr).map_err(ServiceError::Database)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
	PgPoolOptions::new()
		.max_connections(config.max_open_conns)
		.min_connections(config.max_idle_conns.min(config.max_open_conns))
		.idle_timeout(config.max_idle_time)
		.acquire_timeout(config.query_timeout)
}
