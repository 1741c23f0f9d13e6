use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
	extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path},
	http::{request::Parts, Request},
	Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{
	dependencies::AppState,
	domain::{post::entity::Post, user::User},
	services::response::ServiceError,
};

/// JSON body that has been deserialized and passed its `Validate` rules.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S, B> FromRequest<S, B> for ValidatedJson<T>
where
	T: DeserializeOwned + Validate,
	S: Send + Sync,
	Json<T>: FromRequest<S, B, Rejection = JsonRejection>,
	B: Send + 'static,
{
	type Rejection = ServiceError;

	async fn from_request(
		req: Request<B>,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let Json(value) = Json::<T>::from_request(req, state).await?;
		value.validate()?;
		Ok(Self(value))
	}
}

/// The post addressed by `:post_id`.
pub struct PathPost(pub Post);

/// The user addressed by `:user_id`.
pub struct PathUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for PathPost {
	type Rejection = ServiceError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let post_id = path_id(parts, state, "post_id").await?;
		Ok(Self(state.storage.posts.get_by_id(post_id).await?))
	}
}

#[async_trait]
impl FromRequestParts<AppState> for PathUser {
	type Rejection = ServiceError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let user_id = path_id(parts, state, "user_id").await?;
		Ok(Self(state.storage.users.get_by_id(user_id).await?))
	}
}

async fn path_id(
	parts: &mut Parts,
	state: &AppState,
	name: &str,
) -> Result<i64, ServiceError> {
	let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
		.await
		.map_err(|rejection| ServiceError::Validation(rejection.body_text()))?;

	params
		.get(name)
		.and_then(|raw| raw.parse().ok())
		.ok_or_else(|| ServiceError::Validation(format!("{name} must be an integer")))
}
