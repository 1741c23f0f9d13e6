use axum::{
	http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
	middleware,
	routing::{delete, get, patch, post, put},
	Router,
};
use tower::ServiceBuilder;
use tower_http::{
	cors::CorsLayer,
	request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
	trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
	common::middleware_viewer::{resolve_viewer, VIEWER_HEADER},
	dependencies::AppState,
	services::handlers::{health_check, CommentHandler, FeedHandler, PostHandler, UserHandler},
};

pub const API_PREFIX: &str = "/v1";

#[derive(Clone, Default)]
struct RequestUuid;

impl MakeRequestId for RequestUuid {
	fn make_request_id<B>(
		&mut self,
		_request: &Request<B>,
	) -> Option<RequestId> {
		let id = Uuid::new_v4().to_string().parse().ok()?;
		Some(RequestId::new(id))
	}
}

pub fn post_routers(state: AppState) -> Router<AppState> {
	let as_viewer = middleware::from_fn_with_state(state, resolve_viewer);

	Router::new()
		.route("/", post(PostHandler::create))
		.route("/:post_id", patch(PostHandler::update).delete(PostHandler::delete))
		.route("/:post_id/comments", post(CommentHandler::create))
		.route("/:post_id/comments/:comment_id", delete(CommentHandler::delete))
		.route_layer(as_viewer)
		.route("/:post_id", get(PostHandler::get))
}

pub fn user_routers(state: AppState) -> Router<AppState> {
	let as_viewer = middleware::from_fn_with_state(state, resolve_viewer);

	Router::new()
		.route("/:user_id/follow", put(UserHandler::follow))
		.route("/:user_id/unfollow", put(UserHandler::unfollow))
		.route_layer(as_viewer)
		.route("/:user_id", get(UserHandler::get))
}

pub fn feed_routers(state: AppState) -> Router<AppState> {
	Router::new()
		.route("/", get(FeedHandler::get))
		.route_layer(middleware::from_fn_with_state(state, resolve_viewer))
}

pub fn authentication_routers() -> Router<AppState> {
	Router::new()
		.route("/user", post(UserHandler::register))
		.route("/verify", post(UserHandler::verify))
}

pub fn create_routes(state: AppState) -> Router {
	let api = Router::new()
		.route("/health", get(health_check))
		.nest("/authentication", authentication_routers())
		.nest("/posts", post_routers(state.clone()))
		.nest("/users", user_routers(state.clone()))
		.nest("/feed", feed_routers(state.clone()));

	let origins: Vec<HeaderValue> = state
		.config
		.allow_origins
		.split(',')
		.filter_map(|origin| origin.trim().parse().ok())
		.collect();

	let x_request_id = HeaderName::from_static("x-request-id");

	Router::new()
		.nest(API_PREFIX, api)
		.layer(
			CorsLayer::new()
				.allow_origin(origins)
				.allow_methods([Method::GET, Method::POST, Method::PATCH, Method::PUT, Method::DELETE])
				.allow_headers([CONTENT_TYPE, HeaderName::from_static(VIEWER_HEADER)]),
		)
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::new(x_request_id.clone(), RequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::new(x_request_id)),
		)
		.with_state(state)
}
