use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::UserSummary;

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Comment {
	pub id: i64,
	pub post_id: i64,
	pub user_id: i64,
	pub content: String,
	pub created_at: DateTime<Utc>,
	pub user: UserSummary,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateComment {
	#[validate(length(min = 1, max = 1000))]
	pub content: String,
}
