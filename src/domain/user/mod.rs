pub mod password;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};
use validator::Validate;

use self::password::Password;
use crate::services::response::ServiceError;

#[derive(Clone, Debug, Serialize)]
pub struct User {
	pub id: i64,
	pub username: String,
	pub email: String,
	#[serde(skip_serializing)]
	pub password: Password,
	pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for User {
	fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
		Ok(Self {
			id: row.try_get("id")?,
			username: row.try_get("username")?,
			email: row.try_get("email")?,
			password: Password::from(row.try_get::<String, _>("password")?),
			created_at: row.try_get("created_at")?,
		})
	}
}

/// Author information denormalized onto posts and comments.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserSummary {
	pub id: i64,
	pub username: String,
}

impl From<&User> for UserSummary {
	fn from(user: &User) -> Self {
		Self {
			id: user.id,
			username: user.username.clone(),
		}
	}
}

/// The user on whose behalf a request is made, resolved before the handler runs.
#[derive(Clone, Debug)]
pub struct Viewer(pub User);

impl Viewer {
	/// `Forbidden` unless the viewer is one of the resource's `owners`.
	pub fn authorize(
		&self,
		owners: &[i64],
	) -> Result<(), ServiceError> {
		if owners.contains(&self.0.id) {
			return Ok(());
		}
		tracing::info!(viewer_id = self.0.id, ?owners, "modification by non-owner rejected");
		Err(ServiceError::Forbidden)
	}
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUser {
	#[validate(length(min = 1, max = 100))]
	pub username: String,
	#[validate(email, length(max = 255))]
	pub email: String,
	#[validate(length(min = 3, max = 72))]
	pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyCredentials {
	#[validate(email, length(max = 255))]
	pub email: String,
	#[validate(length(min = 1, max = 72))]
	pub password: String,
}
