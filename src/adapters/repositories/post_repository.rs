use chrono::{DateTime, Utc};

use crate::{domain::post::entity::Post, services::response::ServiceError};

use super::Repository;

impl Repository<Post> {
	/// Inserts the post and fills in its generated id, timestamps and version.
	pub async fn create(
		&self,
		post: &mut Post,
	) -> Result<(), ServiceError> {
		let (id, created_at, updated_at, version) = self
			.executor
			.fetch_one(
				sqlx::query_as::<_, (i64, DateTime<Utc>, DateTime<Utc>, i32)>(
					r#"
					INSERT INTO posts (title, content, user_id, tags)
					VALUES ($1, $2, $3, $4)
					RETURNING id, created_at, updated_at, version
					"#,
				)
				.bind(&post.title)
				.bind(&post.content)
				.bind(post.user_id)
				.bind(&post.tags),
			)
			.await?;

		post.id = id;
		post.created_at = created_at;
		post.updated_at = updated_at;
		post.version = version;
		Ok(())
	}

	/// Loaded together with its author summary.
	pub async fn get_by_id(
		&self,
		post_id: i64,
	) -> Result<Post, ServiceError> {
		self.executor
			.fetch_one(
				sqlx::query_as::<_, Post>(
					r#"
					SELECT p.id, p.title, p.content, p.user_id, p.tags, p.version, p.created_at, p.updated_at,
					       u.username
					FROM posts p
					JOIN users u ON u.id = p.user_id
					WHERE p.id = $1
					"#,
				)
				.bind(post_id),
			)
			.await
	}

	/// Compare-and-swap on `version`. `post.version` is the version the caller
	/// expects to replace; on success it holds the new one.
	pub async fn update(
		&self,
		post: &mut Post,
	) -> Result<(), ServiceError> {
		let updated = self
			.executor
			.fetch_optional(
				sqlx::query_as::<_, (i32, DateTime<Utc>)>(
					r#"
					UPDATE posts
					SET title = $1, content = $2, tags = $3, updated_at = NOW(), version = version + 1
					WHERE id = $4 AND version = $5
					RETURNING version, updated_at
					"#,
				)
				.bind(&post.title)
				.bind(&post.content)
				.bind(&post.tags)
				.bind(post.id)
				.bind(post.version),
			)
			.await?;

		let Some((version, updated_at)) = updated else {
			if !self.exists(post.id).await? {
				return Err(ServiceError::NotFound);
			}
			tracing::info!(post_id = post.id, expected_version = post.version, "stale post update rejected");
			return Err(ServiceError::Conflict("the post has been modified by another user, try again".to_string()));
		};

		post.version = version;
		post.updated_at = updated_at;
		Ok(())
	}

	pub async fn delete(
		&self,
		post_id: i64,
	) -> Result<(), ServiceError> {
		let affected = self
			.executor
			.execute(sqlx::query("DELETE FROM posts WHERE id = $1").bind(post_id))
			.await?;

		if affected == 0 {
			return Err(ServiceError::NotFound);
		}
		Ok(())
	}

	async fn exists(
		&self,
		post_id: i64,
	) -> Result<bool, ServiceError> {
		let (exists,) = self
			.executor
			.fetch_one(sqlx::query_as::<_, (bool,)>("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)").bind(post_id))
			.await?;
		Ok(exists)
	}
}
