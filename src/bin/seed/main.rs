use std::process::ExitCode;

use rand::{seq::SliceRandom, Rng};
use social::{
	adapters::repositories::Storage,
	bootstrap::Boostrap,
	config::Config,
	dependencies::AppState,
	domain::{
		post::entity::Post,
		user::{password::Password, User, UserSummary},
	},
	services::response::ServiceError,
};

const USERS: usize = 20;
const POSTS: usize = 100;
const COMMENTS: usize = 300;
const FOLLOWS_PER_USER: usize = 5;

const TITLES: &[&str] = &[
	"Ownership in practice",
	"Why I switched my service to async",
	"Ten lessons from a year of on-call",
	"Benchmarking Postgres indexes",
	"A gentle introduction to lifetimes",
	"What pagination gets wrong",
	"Designing for optimistic concurrency",
	"Reading query plans",
];

const CONTENTS: &[&str] = &[
	"Short notes from a long week of debugging.",
	"The borrow checker was right, again.",
	"Every feed is a query with opinions.",
	"Offsets are easy until they are not.",
	"Version counters beat locks for this workload.",
];

const TAGS: &[&str] = &["rust", "go", "postgres", "async", "backend", "devops", "testing"];

const REMARKS: &[&str] = &[
	"Great write-up, thanks!",
	"I ran into the same thing last month.",
	"Could you share the benchmark setup?",
	"This needs a follow-up post.",
];

#[tokio::main]
async fn main() -> ExitCode {
	let config = match Config::new() {
		Ok(config) => config,
		Err(err) => {
			eprintln!("configuration error: {err}");
			return ExitCode::FAILURE;
		}
	};
	Boostrap::tracing(&config);

	let state = match AppState::connect(config).await {
		Ok(state) => state,
		Err(err) => {
			tracing::error!(error = %err, "database connection pool could not be established");
			return ExitCode::FAILURE;
		}
	};

	let result = async {
		Boostrap::migrate(state.storage.posts.executor.connection()).await?;
		seed(&state.storage).await
	}
	.await;

	match result {
		Ok(()) => {
			tracing::info!("seeding complete");
			ExitCode::SUCCESS
		}
		Err(err) => {
			tracing::error!(error = %err, "seeding failed");
			ExitCode::FAILURE
		}
	}
}

async fn seed(storage: &Storage) -> Result<(), ServiceError> {
	let password = Password::hash("password")?;
	let batch: u32 = rand::thread_rng().gen();

	let mut users: Vec<User> = Vec::with_capacity(USERS);
	for i in 0..USERS {
		let username = format!("user{batch}_{i}");
		let email = format!("{username}@example.com");
		users.push(storage.users.create(username, email, password.clone()).await?);
	}
	tracing::info!(count = users.len(), "users created");

	for user in &users {
		let others: Vec<&User> = users.iter().filter(|other| other.id != user.id).collect();
		let followed: Vec<i64> = others
			.choose_multiple(&mut rand::thread_rng(), FOLLOWS_PER_USER)
			.map(|other| other.id)
			.collect();
		for followed_id in followed {
			storage.users.follow(user.id, followed_id).await?;
		}
	}

	let mut posts: Vec<Post> = Vec::with_capacity(POSTS);
	for _ in 0..POSTS {
		let mut post = random_post(&users);
		storage.posts.create(&mut post).await?;
		posts.push(post);
	}
	tracing::info!(count = posts.len(), "posts created");

	for _ in 0..COMMENTS {
		let (post_id, author, content) = {
			let mut rng = rand::thread_rng();
			let post = &posts[rng.gen_range(0..posts.len())];
			let author = &users[rng.gen_range(0..users.len())];
			let content = REMARKS[rng.gen_range(0..REMARKS.len())].to_string();
			(post.id, UserSummary::from(author), content)
		};
		storage.comments.create(post_id, author, content).await?;
	}
	tracing::info!(count = COMMENTS, "comments created");

	Ok(())
}

fn random_post(users: &[User]) -> Post {
	let mut rng = rand::thread_rng();
	let author = &users[rng.gen_range(0..users.len())];
	let tag_count = rng.gen_range(0..=3);

	Post {
		title: TITLES[rng.gen_range(0..TITLES.len())].to_string(),
		content: CONTENTS[rng.gen_range(0..CONTENTS.len())].to_string(),
		user_id: author.id,
		tags: TAGS.choose_multiple(&mut rng, tag_count).map(|tag| tag.to_string()).collect(),
		user: Some(UserSummary::from(author)),
		..Default::default()
	}
}
