#![allow(dead_code)]

use std::time::Duration;

use axum::{
	body::Body,
	http::{Method, Request, StatusCode},
	Router,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::Value;
use social::{
	adapters::repositories::Storage,
	bootstrap::Boostrap,
	config::Config,
	database::DatabaseExecutor,
	dependencies::AppState,
	domain::{
		post::entity::Post,
		user::{password::Password, User},
	},
	routes::create_routes,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tower::ServiceExt;

pub struct TestContext {
	pub pool: PgPool,
	pub storage: Storage,
}

pub async fn set_up() -> TestContext {
	dotenv::dotenv().ok();
	let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
	let pool = PgPoolOptions::new().max_connections(5).connect(&url).await.unwrap();
	Boostrap::migrate(&pool).await.unwrap();

	let storage = Storage::new(DatabaseExecutor::new(pool.clone(), Duration::from_secs(5)));
	TestContext { pool, storage }
}

impl TestContext {
	/// The full router, backed by the test database.
	pub fn app(&self) -> Router {
		let config = Config::new().unwrap();
		create_routes(AppState::new(config, DatabaseExecutor::new(self.pool.clone(), Duration::from_secs(5))))
	}

	pub async fn user(
		&self,
		name: &str,
	) -> User {
		let suffix: u64 = rand::thread_rng().gen();
		let username = format!("{name}_{suffix}");
		let email = format!("{username}@example.com");
		self.storage
			.users
			.create(username, email, Password::hash("password").unwrap())
			.await
			.unwrap()
	}

	pub async fn post(
		&self,
		author: &User,
		title: &str,
		content: &str,
		tags: &[&str],
	) -> Post {
		let mut post = Post {
			title: title.to_string(),
			content: content.to_string(),
			user_id: author.id,
			tags: tags.iter().map(|tag| tag.to_string()).collect(),
			..Default::default()
		};
		self.storage.posts.create(&mut post).await.unwrap();
		post
	}

	pub async fn backdate(
		&self,
		post: &Post,
		created_at: DateTime<Utc>,
	) {
		sqlx::query("UPDATE posts SET created_at = $1 WHERE id = $2")
			.bind(created_at)
			.bind(post.id)
			.execute(&self.pool)
			.await
			.unwrap();
	}
}

/// Sends one request and returns the status with the decoded JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(
	app: &Router,
	method: Method,
	uri: &str,
	viewer: Option<i64>,
	body: Option<Value>,
) -> (StatusCode, Value) {
	let mut request = Request::builder().method(method).uri(uri);
	if let Some(viewer_id) = viewer {
		request = request.header("x-user-id", viewer_id.to_string());
	}
	let request = match body {
		Some(json) => request
			.header("content-type", "application/json")
			.body(Body::from(json.to_string()))
			.unwrap(),
		None => request.body(Body::empty()).unwrap(),
	};

	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
	let json = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).unwrap()
	};
	(status, json)
}
