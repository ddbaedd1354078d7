//! In-process [`CollectionSource`] for fixtures, previews, and tests.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// self
use crate::{
	_prelude::*,
	api::{CollectionFuture, CollectionSource},
};

/// Serves a fixed collection and counts how often it was asked for it.
#[derive(Debug)]
pub struct StaticSource<T> {
	resource: String,
	items: Vec<T>,
	fetches: AtomicUsize,
}
impl<T> StaticSource<T> {
	/// Creates a source serving `items` under the `resource` label.
	pub fn new(resource: impl Into<String>, items: Vec<T>) -> Self {
		Self { resource: resource.into(), items, fetches: AtomicUsize::new(0) }
	}

	/// Number of completed [`CollectionSource::fetch_all`] calls.
	pub fn fetches(&self) -> usize {
		self.fetches.load(Ordering::SeqCst)
	}
}
impl<T> CollectionSource<T> for StaticSource<T>
where
	T: Clone + Send + Sync,
{
	fn resource(&self) -> &str {
		&self.resource
	}

	fn fetch_all(&self) -> CollectionFuture<'_, T> {
		Box::pin(async move {
			self.fetches.fetch_add(1, Ordering::SeqCst);

			Ok(self.items.clone())
		})
	}
}
