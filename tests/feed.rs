mod common;

use std::collections::BTreeSet;

use chrono::{Duration, Utc};
use social::domain::{
	feed::{FeedQuery, FeedQueryParams, SortDirection},
	post::entity::PostWithMetadata,
	user::UserSummary,
};

use common::set_up;

fn ids(feed: &[PostWithMetadata]) -> Vec<i64> {
	feed.iter().map(|row| row.post.id).collect()
}

fn tags(list: &[&str]) -> BTreeSet<String> {
	list.iter().map(|tag| tag.to_string()).collect()
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_feed_only_contains_own_and_followed_posts() {
	'_given: {
		let ctx = set_up().await;
		let viewer = ctx.user("viewer").await;
		let followed = ctx.user("followed").await;
		let stranger = ctx.user("stranger").await;
		ctx.storage.users.follow(viewer.id, followed.id).await.unwrap();

		let own = ctx.post(&viewer, "mine", "own post", &[]).await;
		let theirs = ctx.post(&followed, "theirs", "followed post", &[]).await;
		let _hidden = ctx.post(&stranger, "hidden", "stranger post", &[]).await;

		'_when: {
			let feed = ctx.storage.posts.feed(viewer.id, &FeedQuery::default()).await.unwrap();

			'_then: {
				assert_eq!(ids(&feed), vec![theirs.id, own.id]);
				for row in &feed {
					assert!(row.post.user_id == viewer.id || row.post.user_id == followed.id);
				}
				assert_eq!(
					feed[0].post.user,
					Some(UserSummary {
						id: followed.id,
						username: followed.username.clone()
					})
				);
			}
		}
	}
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_unfollow_removes_posts_from_feed() {
	let ctx = set_up().await;
	let viewer = ctx.user("viewer").await;
	let followed = ctx.user("followed").await;
	ctx.storage.users.follow(viewer.id, followed.id).await.unwrap();
	ctx.post(&followed, "soon gone", "from the feed", &[]).await;

	ctx.storage.users.unfollow(viewer.id, followed.id).await.unwrap();

	let feed = ctx.storage.posts.feed(viewer.id, &FeedQuery::default()).await.unwrap();
	assert!(feed.is_empty());
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_tag_filter_is_superset_match() {
	let ctx = set_up().await;
	let viewer = ctx.user("viewer").await;
	let go_only = ctx.post(&viewer, "a", "a", &["go"]).await;
	let both = ctx.post(&viewer, "b", "b", &["go", "rust"]).await;
	let untagged = ctx.post(&viewer, "c", "c", &[]).await;

	let unfiltered = ctx.storage.posts.feed(viewer.id, &FeedQuery::default()).await.unwrap();
	let empty_set = FeedQuery {
		tags: BTreeSet::new(),
		..Default::default()
	};
	assert_eq!(ids(&ctx.storage.posts.feed(viewer.id, &empty_set).await.unwrap()), ids(&unfiltered));
	assert_eq!(ids(&unfiltered), vec![untagged.id, both.id, go_only.id]);

	let go = FeedQuery {
		tags: tags(&["go"]),
		..Default::default()
	};
	assert_eq!(ids(&ctx.storage.posts.feed(viewer.id, &go).await.unwrap()), vec![both.id, go_only.id]);

	let go_and_rust = FeedQuery {
		tags: tags(&["go", "rust"]),
		..Default::default()
	};
	assert_eq!(ids(&ctx.storage.posts.feed(viewer.id, &go_and_rust).await.unwrap()), vec![both.id]);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_search_matches_title_or_content_case_insensitively() {
	let ctx = set_up().await;
	let viewer = ctx.user("viewer").await;
	let by_title = ctx.post(&viewer, "Ferris the Crab", "nothing here", &[]).await;
	let by_content = ctx.post(&viewer, "untitled", "a CRAB walks sideways", &[]).await;
	let neither = ctx.post(&viewer, "gopher", "burrows", &[]).await;

	let blank = FeedQuery::try_from(FeedQueryParams {
		search: Some(String::new()),
		..Default::default()
	})
	.unwrap();
	let all = ctx.storage.posts.feed(viewer.id, &blank).await.unwrap();
	assert_eq!(ids(&all), vec![neither.id, by_content.id, by_title.id]);

	let crab = FeedQuery {
		search: "crab".into(),
		..Default::default()
	};
	let feed = ctx.storage.posts.feed(viewer.id, &crab).await.unwrap();
	assert_eq!(ids(&feed), vec![by_content.id, by_title.id]);

	let wildcard = FeedQuery {
		search: "%".into(),
		..Default::default()
	};
	assert!(ctx.storage.posts.feed(viewer.id, &wildcard).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_since_excludes_older_posts() {
	let ctx = set_up().await;
	let viewer = ctx.user("viewer").await;
	let old = ctx.post(&viewer, "old", "old", &[]).await;
	let fresh = ctx.post(&viewer, "fresh", "fresh", &[]).await;
	ctx.backdate(&old, Utc::now() - Duration::days(30)).await;

	let since_last_week = FeedQuery {
		since: Some(Utc::now() - Duration::days(7)),
		..Default::default()
	};
	let feed = ctx.storage.posts.feed(viewer.id, &since_last_week).await.unwrap();
	assert_eq!(ids(&feed), vec![fresh.id]);

	let open = ctx.storage.posts.feed(viewer.id, &FeedQuery::default()).await.unwrap();
	assert_eq!(ids(&open), vec![fresh.id, old.id]);

	let until_last_week = FeedQuery {
		until: Some(Utc::now() - Duration::days(7)),
		..Default::default()
	};
	let feed = ctx.storage.posts.feed(viewer.id, &until_last_week).await.unwrap();
	assert_eq!(ids(&feed), vec![old.id]);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_pagination_is_stable_and_disjoint() {
	let ctx = set_up().await;
	let viewer = ctx.user("viewer").await;
	let mut created = Vec::new();
	for i in 0..5 {
		created.push(ctx.post(&viewer, &format!("post {i}"), "body", &[]).await.id);
	}

	let page = |offset| FeedQuery {
		limit: 2,
		offset,
		sort: SortDirection::Asc,
		..Default::default()
	};
	let first = ctx.storage.posts.feed(viewer.id, &page(0)).await.unwrap();
	let second = ctx.storage.posts.feed(viewer.id, &page(2)).await.unwrap();
	let third = ctx.storage.posts.feed(viewer.id, &page(4)).await.unwrap();

	assert_eq!(ids(&first), created[0..2]);
	assert_eq!(ids(&second), created[2..4]);
	assert_eq!(ids(&third), created[4..5]);
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_comment_count_includes_zero() {
	let ctx = set_up().await;
	let viewer = ctx.user("viewer").await;
	let quiet = ctx.post(&viewer, "quiet", "no comments", &[]).await;
	let busy = ctx.post(&viewer, "busy", "two comments", &[]).await;
	for remark in ["first!", "second!"] {
		ctx.storage
			.comments
			.create(busy.id, UserSummary::from(&viewer), remark.to_string())
			.await
			.unwrap();
	}

	let feed = ctx.storage.posts.feed(viewer.id, &FeedQuery::default()).await.unwrap();
	let counts: Vec<(i64, i64)> = feed.iter().map(|row| (row.post.id, row.comment_count)).collect();
	assert_eq!(counts, vec![(busy.id, 2), (quiet.id, 0)]);
}
