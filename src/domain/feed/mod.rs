//! Feed query contract.
//!
//! [`FeedQueryParams`] is what arrives on the query string. It is turned into
//! a [`FeedQuery`] only through [`TryFrom`], so every value the feed engine
//! sees has already been bounded, parsed and normalized.

use std::{collections::BTreeSet, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::services::response::ServiceError;

pub const DEFAULT_FEED_LIMIT: i64 = 20;
pub const MAX_FEED_LIMIT: i64 = 20;
pub const MAX_FEED_TAGS: usize = 5;
pub const MAX_SEARCH_LENGTH: usize = 100;

/// `YYYY-MM-DD HH:MM:SS`, read as UTC.
pub const FEED_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
	Asc,
	#[default]
	Desc,
}

impl SortDirection {
	/// The only piece of the feed statement that is not a bind parameter.
	pub fn as_sql(&self) -> &'static str {
		match self {
			Self::Asc => "ASC",
			Self::Desc => "DESC",
		}
	}
}

impl FromStr for SortDirection {
	type Err = ServiceError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"asc" => Ok(Self::Asc),
			"desc" => Ok(Self::Desc),
			_ => Err(ServiceError::Validation("sort must be one of `asc` or `desc`".to_string())),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedQueryParams {
	pub limit: Option<i64>,
	pub offset: Option<i64>,
	pub sort: Option<String>,
	/// Comma separated.
	pub tags: Option<String>,
	pub search: Option<String>,
	pub since: Option<String>,
	pub until: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedQuery {
	pub limit: i64,
	pub offset: i64,
	pub sort: SortDirection,
	pub search: String,
	pub tags: BTreeSet<String>,
	pub since: Option<DateTime<Utc>>,
	pub until: Option<DateTime<Utc>>,
}

impl Default for FeedQuery {
	fn default() -> Self {
		Self {
			limit: DEFAULT_FEED_LIMIT,
			offset: 0,
			sort: SortDirection::default(),
			search: String::new(),
			tags: BTreeSet::new(),
			since: None,
			until: None,
		}
	}
}

impl FeedQuery {
	/// Limit and offset as they will be bound. Non-positive limits never reach the database.
	pub fn window(&self) -> Result<(i64, i64), ServiceError> {
		if self.limit <= 0 {
			return Err(ServiceError::Validation("limit must be positive".to_string()));
		}
		if self.offset < 0 {
			return Err(ServiceError::Validation("offset must not be negative".to_string()));
		}
		Ok((self.limit, self.offset))
	}

	/// `ILIKE` pattern for the search term, or `None` when search is off.
	pub fn search_pattern(&self) -> Option<String> {
		if self.search.is_empty() {
			return None;
		}
		let mut pattern = String::with_capacity(self.search.len() + 2);
		pattern.push('%');
		for c in self.search.chars() {
			if matches!(c, '%' | '_' | '\\') {
				pattern.push('\\');
			}
			pattern.push(c);
		}
		pattern.push('%');
		Some(pattern)
	}

	pub fn tag_list(&self) -> Vec<String> {
		self.tags.iter().cloned().collect()
	}
}

impl TryFrom<FeedQueryParams> for FeedQuery {
	type Error = ServiceError;

	fn try_from(params: FeedQueryParams) -> Result<Self, Self::Error> {
		let limit = params.limit.unwrap_or(DEFAULT_FEED_LIMIT);
		if !(1..=MAX_FEED_LIMIT).contains(&limit) {
			return Err(ServiceError::Validation(format!("limit must be between 1 and {MAX_FEED_LIMIT}")));
		}

		let offset = params.offset.unwrap_or(0);
		if offset < 0 {
			return Err(ServiceError::Validation("offset must not be negative".to_string()));
		}

		let sort = match params.sort.as_deref() {
			None | Some("") => SortDirection::default(),
			Some(sort) => sort.parse()?,
		};

		let search = params.search.unwrap_or_default().trim().to_string();
		if search.chars().count() > MAX_SEARCH_LENGTH {
			return Err(ServiceError::Validation(format!(
				"search must be at most {MAX_SEARCH_LENGTH} characters"
			)));
		}

		let tags: BTreeSet<String> = params
			.tags
			.as_deref()
			.unwrap_or_default()
			.split(',')
			.map(str::trim)
			.filter(|tag| !tag.is_empty())
			.map(str::to_string)
			.collect();
		if tags.len() > MAX_FEED_TAGS {
			return Err(ServiceError::Validation(format!("at most {MAX_FEED_TAGS} tags can be requested")));
		}

		let since = parse_bound("since", params.since.as_deref())?;
		let until = parse_bound("until", params.until.as_deref())?;
		if let (Some(since), Some(until)) = (since, until) {
			if since > until {
				return Err(ServiceError::Validation("since must not be later than until".to_string()));
			}
		}

		Ok(Self {
			limit,
			offset,
			sort,
			search,
			tags,
			since,
			until,
		})
	}
}

fn parse_bound(
	name: &str,
	value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ServiceError> {
	match value.map(str::trim) {
		None | Some("") => Ok(None),
		Some(raw) => NaiveDateTime::parse_from_str(raw, FEED_TIMESTAMP_FORMAT)
			.map(|naive| Some(naive.and_utc()))
			.map_err(|_| ServiceError::Validation(format!("{name} must be formatted as `YYYY-MM-DD HH:MM:SS`"))),
	}
}
