pub(crate) mod comment_repository;
pub(crate) mod feed_repository;
pub(crate) mod post_repository;
pub(crate) mod user_repository;

use std::marker::PhantomData;

use crate::database::DatabaseExecutor;
use crate::domain::{comment::Comment, post::entity::Post, user::User};

/// Store for one entity type. Operations live in `impl Repository<Entity>` blocks.
pub struct Repository<E> {
	pub executor: DatabaseExecutor,
	pub _phantom: PhantomData<E>,
}

impl<E> Repository<E> {
	pub fn new(executor: DatabaseExecutor) -> Self {
		Self {
			executor,
			_phantom: Default::default(),
		}
	}
}

impl<E> Clone for Repository<E> {
	fn clone(&self) -> Self {
		Self::new(self.executor.clone())
	}
}

#[derive(Clone)]
pub struct Storage {
	pub posts: Repository<Post>,
	pub comments: Repository<Comment>,
	pub users: Repository<User>,
}

impl Storage {
	pub fn new(executor: DatabaseExecutor) -> Self {
		Self {
			posts: Repository::new(executor.clone()),
			comments: Repository::new(executor.clone()),
			users: Repository::new(executor),
		}
	}
}
