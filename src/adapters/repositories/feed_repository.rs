use sqlx::{Postgres, QueryBuilder};

use crate::{
	domain::{
		feed::FeedQuery,
		post::entity::{Post, PostWithMetadata},
	},
	services::response::ServiceError,
};

use super::Repository;

impl Repository<Post> {
	/// Posts written by `viewer_id` or by anyone `viewer_id` follows, filtered,
	/// sorted and paginated in a single statement. An empty page is `Ok`.
	pub async fn feed(
		&self,
		viewer_id: i64,
		query: &FeedQuery,
	) -> Result<Vec<PostWithMetadata>, ServiceError> {
		let mut builder = feed_statement(viewer_id, query)?;

		let feed = self.executor.fetch_all(builder.build_query_as::<PostWithMetadata>()).await?;
		tracing::debug!(viewer_id, rows = feed.len(), "feed fetched");
		Ok(feed)
	}
}

/// Every client value is a bind parameter. Filters are only appended when
/// active, and limit/offset come last so they apply to the filtered set.
pub(crate) fn feed_statement(
	viewer_id: i64,
	query: &FeedQuery,
) -> Result<QueryBuilder<'static, Postgres>, ServiceError> {
	let (limit, offset) = query.window()?;

	let mut builder = QueryBuilder::new(
		"SELECT p.id, p.user_id, p.title, p.content, p.tags, p.version, p.created_at, p.updated_at, \
		 u.username, COUNT(c.id) AS comment_count \
		 FROM posts p \
		 JOIN users u ON u.id = p.user_id \
		 LEFT JOIN comments c ON c.post_id = p.id \
		 LEFT JOIN followers f ON f.follower_id = p.user_id AND f.user_id = ",
	);
	builder.push_bind(viewer_id);

	builder.push(" WHERE (f.user_id IS NOT NULL OR p.user_id = ");
	builder.push_bind(viewer_id);
	builder.push(")");

	if let Some(pattern) = query.search_pattern() {
		builder.push(" AND (p.title ILIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" OR p.content ILIKE ");
		builder.push_bind(pattern);
		builder.push(")");
	}

	if !query.tags.is_empty() {
		builder.push(" AND p.tags @> ");
		builder.push_bind(query.tag_list());
	}

	if let Some(since) = query.since {
		builder.push(" AND p.created_at >= ");
		builder.push_bind(since);
	}
	if let Some(until) = query.until {
		builder.push(" AND p.created_at <= ");
		builder.push_bind(until);
	}

	let direction = query.sort.as_sql();
	builder.push(" GROUP BY p.id, u.username");
	builder.push(format!(" ORDER BY p.created_at {direction}, p.id {direction}"));
	builder.push(" LIMIT ");
	builder.push_bind(limit);
	builder.push(" OFFSET ");
	builder.push_bind(offset);

	Ok(builder)
}
