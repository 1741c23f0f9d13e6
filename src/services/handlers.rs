use axum::{
	extract::{
		rejection::{PathRejection, QueryRejection},
		Path, Query, State,
	},
	http::StatusCode,
	response::IntoResponse,
	Extension,
};
use serde::Serialize;

use crate::{
	common::extractors::{PathPost, PathUser, ValidatedJson},
	dependencies::AppState,
	domain::{
		comment::CreateComment,
		feed::{FeedQuery, FeedQueryParams},
		post::{entity::Post, CreatePost, UpdatePost},
		user::{password::Password, RegisterUser, UserSummary, VerifyCredentials, Viewer},
	},
};

use super::response::{ServiceError, ServiceResponse};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub env: String,
	pub version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	ServiceResponse::from(HealthResponse {
		status: "ok",
		env: state.config.env.clone(),
		version: VERSION,
	})
}

pub struct PostHandler;
impl PostHandler {
	pub async fn create(
		State(state): State<AppState>,
		Extension(Viewer(author)): Extension<Viewer>,
		ValidatedJson(payload): ValidatedJson<CreatePost>,
	) -> Result<impl IntoResponse, ServiceError> {
		let mut post = Post {
			title: payload.title,
			content: payload.content,
			user_id: author.id,
			tags: payload.tags,
			user: Some(UserSummary::from(&author)),
			..Default::default()
		};
		state.storage.posts.create(&mut post).await?;
		tracing::info!(post_id = post.id, user_id = author.id, "post created");

		Ok((StatusCode::CREATED, ServiceResponse::from(post)))
	}

	/// The post together with its comments, newest first.
	pub async fn get(
		State(state): State<AppState>,
		PathPost(mut post): PathPost,
	) -> Result<impl IntoResponse, ServiceError> {
		post.comments = state.storage.comments.get_by_post_id(post.id).await?;
		Ok(ServiceResponse::from(post))
	}

	pub async fn update(
		State(state): State<AppState>,
		Extension(viewer): Extension<Viewer>,
		PathPost(mut post): PathPost,
		ValidatedJson(payload): ValidatedJson<UpdatePost>,
	) -> Result<impl IntoResponse, ServiceError> {
		viewer.authorize(&[post.user_id])?;
		payload.apply(&mut post);
		state.storage.posts.update(&mut post).await?;
		Ok(ServiceResponse::from(post))
	}

	pub async fn delete(
		State(state): State<AppState>,
		Extension(viewer): Extension<Viewer>,
		PathPost(post): PathPost,
	) -> Result<impl IntoResponse, ServiceError> {
		viewer.authorize(&[post.user_id])?;
		state.storage.posts.delete(post.id).await?;
		tracing::info!(post_id = post.id, "post deleted");
		Ok(StatusCode::NO_CONTENT)
	}
}

pub struct CommentHandler;
impl CommentHandler {
	pub async fn create(
		State(state): State<AppState>,
		Extension(Viewer(author)): Extension<Viewer>,
		PathPost(post): PathPost,
		ValidatedJson(payload): ValidatedJson<CreateComment>,
	) -> Result<impl IntoResponse, ServiceError> {
		let comment = state
			.storage
			.comments
			.create(post.id, UserSummary::from(&author), payload.content)
			.await?;
		Ok((StatusCode::CREATED, ServiceResponse::from(comment)))
	}

	/// Allowed for the comment's author and for the author of the post.
	pub async fn delete(
		State(state): State<AppState>,
		Extension(viewer): Extension<Viewer>,
		path: Result<Path<(i64, i64)>, PathRejection>,
	) -> Result<impl IntoResponse, ServiceError> {
		let Path((post_id, comment_id)) = path?;
		let post = state.storage.posts.get_by_id(post_id).await?;
		let comment = state.storage.comments.get_by_id(post_id, comment_id).await?;
		viewer.authorize(&[comment.user_id, post.user_id])?;

		state.storage.comments.delete(post_id, comment_id).await?;
		Ok(StatusCode::NO_CONTENT)
	}
}

pub struct UserHandler;
impl UserHandler {
	pub async fn register(
		State(state): State<AppState>,
		ValidatedJson(payload): ValidatedJson<RegisterUser>,
	) -> Result<impl IntoResponse, ServiceError> {
		let password = Password::hash(&payload.password)?;
		let user = state.storage.users.create(payload.username, payload.email, password).await?;
		tracing::info!(user_id = user.id, "user registered");

		Ok((StatusCode::CREATED, ServiceResponse::from(user)))
	}

	/// Checks an email/password pair. Unknown email and wrong password look the same.
	pub async fn verify(
		State(state): State<AppState>,
		ValidatedJson(payload): ValidatedJson<VerifyCredentials>,
	) -> Result<impl IntoResponse, ServiceError> {
		let user = match state.storage.users.get_by_email(&payload.email).await {
			Ok(user) => user,
			Err(ServiceError::NotFound) => return Err(ServiceError::Authentication),
			Err(err) => return Err(err),
		};
		user.password.verify(&payload.password)?;
		Ok(StatusCode::NO_CONTENT)
	}

	pub async fn get(PathUser(user): PathUser) -> impl IntoResponse {
		ServiceResponse::from(user)
	}

	pub async fn follow(
		State(state): State<AppState>,
		Extension(Viewer(viewer)): Extension<Viewer>,
		PathUser(target): PathUser,
	) -> Result<impl IntoResponse, ServiceError> {
		state.storage.users.follow(viewer.id, target.id).await?;
		tracing::info!(follower_id = viewer.id, followed_id = target.id, "user followed");
		Ok(StatusCode::NO_CONTENT)
	}

	pub async fn unfollow(
		State(state): State<AppState>,
		Extension(Viewer(viewer)): Extension<Viewer>,
		PathUser(target): PathUser,
	) -> Result<impl IntoResponse, ServiceError> {
		state.storage.users.unfollow(viewer.id, target.id).await?;
		Ok(StatusCode::NO_CONTENT)
	}
}

pub struct FeedHandler;
impl FeedHandler {
	pub async fn get(
		State(state): State<AppState>,
		Extension(Viewer(viewer)): Extension<Viewer>,
		params: Result<Query<FeedQueryParams>, QueryRejection>,
	) -> Result<impl IntoResponse, ServiceError> {
		let Query(params) = params?;
		let query = FeedQuery::try_from(params)?;

		let feed = state.storage.posts.feed(viewer.id, &query).await?;
		Ok(ServiceResponse::from(feed))
	}
}
