pub mod entity;

use serde::Deserialize;
use validator::Validate;

use self::entity::Post;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePost {
	#[validate(length(min = 1, max = 100))]
	pub title: String,
	#[validate(length(min = 1, max = 1000))]
	pub content: String,
	#[serde(default)]
	#[validate(length(max = 5))]
	pub tags: Vec<String>,
}

/// Partial update. An absent field is left untouched, an empty one is written as empty.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePost {
	#[validate(length(max = 100))]
	pub title: Option<String>,
	#[validate(length(max = 1000))]
	pub content: Option<String>,
	#[validate(length(max = 5))]
	pub tags: Option<Vec<String>>,

	/// Version the client last saw. Defaults to the version currently stored.
	pub version: Option<i32>,
}

impl UpdatePost {
	pub fn apply(
		self,
		post: &mut Post,
	) {
		if let Some(title) = self.title {
			post.title = title;
		}
		if let Some(content) = self.content {
			post.content = content;
		}
		if let Some(tags) = self.tags {
			post.tags = tags;
		}
		if let Some(version) = self.version {
			post.version = version;
		}
	}
}
