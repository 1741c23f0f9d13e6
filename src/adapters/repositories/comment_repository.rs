use chrono::{DateTime, Utc};

use crate::{
	domain::{comment::Comment, user::UserSummary},
	services::response::ServiceError,
};

use super::Repository;

type CommentRow = (i64, i64, i64, String, DateTime<Utc>, String);

impl Repository<Comment> {
	/// Missing post or author surfaces as `NotFound` through the foreign keys.
	pub async fn create(
		&self,
		post_id: i64,
		author: UserSummary,
		content: String,
	) -> Result<Comment, ServiceError> {
		let (id, created_at) = self
			.executor
			.fetch_one(
				sqlx::query_as::<_, (i64, DateTime<Utc>)>(
					r#"
					INSERT INTO comments (post_id, user_id, content)
					VALUES ($1, $2, $3)
					RETURNING id, created_at
					"#,
				)
				.bind(post_id)
				.bind(author.id)
				.bind(&content),
			)
			.await?;

		Ok(Comment {
			id,
			post_id,
			user_id: author.id,
			content,
			created_at,
			user: author,
		})
	}

	/// Newest first.
	pub async fn get_by_post_id(
		&self,
		post_id: i64,
	) -> Result<Vec<Comment>, ServiceError> {
		let rows = self
			.executor
			.fetch_all(
				sqlx::query_as::<_, CommentRow>(
					r#"
					SELECT c.id, c.post_id, c.user_id, c.content, c.created_at, u.username
					FROM comments c
					JOIN users u ON u.id = c.user_id
					WHERE c.post_id = $1
					ORDER BY c.created_at DESC, c.id DESC
					"#,
				)
				.bind(post_id),
			)
			.await?;

		Ok(rows
			.into_iter()
			.map(|(id, post_id, user_id, content, created_at, username)| Comment {
				id,
				post_id,
				user_id,
				content,
				created_at,
				user: UserSummary { id: user_id, username },
			})
			.collect())
	}

	/// A comment is only addressable through the post it belongs to.
	pub async fn get_by_id(
		&self,
		post_id: i64,
		comment_id: i64,
	) -> Result<Comment, ServiceError> {
		let (id, post_id, user_id, content, created_at, username) = self
			.executor
			.fetch_one(
				sqlx::query_as::<_, CommentRow>(
					r#"
					SELECT c.id, c.post_id, c.user_id, c.content, c.created_at, u.username
					FROM comments c
					JOIN users u ON u.id = c.user_id
					WHERE c.id = $1 AND c.post_id = $2
					"#,
				)
				.bind(comment_id)
				.bind(post_id),
			)
			.await?;

		Ok(Comment {
			id,
			post_id,
			user_id,
			content,
			created_at,
			user: UserSummary { id: user_id, username },
		})
	}

	pub async fn delete(
		&self,
		post_id: i64,
		comment_id: i64,
	) -> Result<(), ServiceError> {
		let affected = self
			.executor
			.execute(
				sqlx::query("DELETE FROM comments WHERE id = $1 AND post_id = $2")
					.bind(comment_id)
					.bind(post_id),
			)
			.await?;

		if affected == 0 {
			return Err(ServiceError::NotFound);
		}
		Ok(())
	}
}
