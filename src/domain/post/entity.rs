use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{postgres::PgRow, FromRow, Row};

use crate::domain::{comment::Comment, user::UserSummary};

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
pub struct Post {
	pub id: i64,
	pub title: String,
	pub content: String,
	pub user_id: i64,
	pub tags: Vec<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	pub version: i32,
	pub comments: Vec<Comment>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user: Option<UserSummary>,
}

// The author summary is filled whenever the statement selects `username`.
impl<'r> FromRow<'r, PgRow> for Post {
	fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
		let user_id: i64 = row.try_get("user_id")?;
		let user = match row.try_get::<String, _>("username") {
			Ok(username) => Some(UserSummary { id: user_id, username }),
			Err(sqlx::Error::ColumnNotFound(_)) => None,
			Err(err) => return Err(err),
		};

		Ok(Self {
			id: row.try_get("id")?,
			title: row.try_get("title")?,
			content: row.try_get("content")?,
			user_id,
			tags: row.try_get("tags")?,
			created_at: row.try_get("created_at")?,
			updated_at: row.try_get("updated_at")?,
			version: row.try_get("version")?,
			comments: Vec::new(),
			user,
		})
	}
}

/// Feed row: a post with its author's username and how many comments it has.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct PostWithMetadata {
	#[serde(flatten)]
	pub post: Post,
	pub comment_count: i64,
}

impl<'r> FromRow<'r, PgRow> for PostWithMetadata {
	fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
		Ok(Self {
			post: Post::from_row(row)?,
			comment_count: row.try_get("comment_count")?,
		})
	}
}
