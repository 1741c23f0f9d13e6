use chrono::{DateTime, Utc};

use crate::{
	domain::user::{password::Password, User},
	services::response::ServiceError,
};

use super::Repository;

impl Repository<User> {
	/// Duplicate username or email is a `Conflict`.
	pub async fn create(
		&self,
		username: String,
		email: String,
		password: Password,
	) -> Result<User, ServiceError> {
		let (id, created_at) = self
			.executor
			.fetch_one(
				sqlx::query_as::<_, (i64, DateTime<Utc>)>(
					r#"
					INSERT INTO users (username, email, password)
					VALUES ($1, $2, $3)
					RETURNING id, created_at
					"#,
				)
				.bind(&username)
				.bind(&email)
				.bind(password.as_str()),
			)
			.await?;

		Ok(User {
			id,
			username,
			email,
			password,
			created_at,
		})
	}

	pub async fn get_by_id(
		&self,
		user_id: i64,
	) -> Result<User, ServiceError> {
		self.executor
			.fetch_one(
				sqlx::query_as::<_, User>("SELECT id, username, email, password, created_at FROM users WHERE id = $1")
					.bind(user_id),
			)
			.await
	}

	pub async fn get_by_email(
		&self,
		email: &str,
	) -> Result<User, ServiceError> {
		self.executor
			.fetch_one(
				sqlx::query_as::<_, User>("SELECT id, username, email, password, created_at FROM users WHERE email = $1")
					.bind(email),
			)
			.await
	}

	/// Adds the edge `follower -> followed`. Following twice is a `Conflict`,
	/// an unknown `followed` is `NotFound`.
	pub async fn follow(
		&self,
		follower_id: i64,
		followed_id: i64,
	) -> Result<(), ServiceError> {
		if follower_id == followed_id {
			return Err(ServiceError::Validation("users cannot follow themselves".to_string()));
		}

		let affected = self
			.executor
			.execute(
				sqlx::query(
					r#"
					INSERT INTO followers (user_id, follower_id)
					VALUES ($1, $2)
					ON CONFLICT (user_id, follower_id) DO NOTHING
					"#,
				)
				.bind(follower_id)
				.bind(followed_id),
			)
			.await?;

		if affected == 0 {
			return Err(ServiceError::Conflict("already following this user".to_string()));
		}
		Ok(())
	}

	pub async fn unfollow(
		&self,
		follower_id: i64,
		followed_id: i64,
	) -> Result<(), ServiceError> {
		let affected = self
			.executor
			.execute(
				sqlx::query("DELETE FROM followers WHERE user_id = $1 AND follower_id = $2")
					.bind(follower_id)
					.bind(followed_id),
			)
			.await?;

		if affected == 0 {
			return Err(ServiceError::NotFound);
		}
		Ok(())
	}
}
