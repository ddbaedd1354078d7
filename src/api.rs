//! Backend collection contracts, response envelopes, and built-in sources.
//!
//! The storefront backend wraps every collection in the same envelope:
//!
//! ```json
//! { "data": { "items": [], "pageIndex": 1, "totalPages": 1, "pageSize": 10,
//!             "hasPreviousPage": false, "hasNextPage": false } }
//! ```
//!
//! Listings paginate on the client, so only `items` drives them. The server paging fields are
//! still parsed into [`ServerPage`] for callers that want to inspect them.

#[cfg(feature = "reqwest")] pub mod http;
pub mod memory;
pub mod models;

#[cfg(feature = "reqwest")] pub use http::*;
pub use memory::*;
pub use models::*;

// self
use crate::{_prelude::*, error::TransientError};

/// Boxed future returned by [`CollectionSource::fetch_all`].
pub type CollectionFuture<'a, T> = Pin<Box<dyn Future<Output = Result<Vec<T>>> + 'a + Send>>;

/// Anything that can produce a full collection of `T` in one call.
pub trait CollectionSource<T>
where
	Self: Send + Sync,
{
	/// Resource label used in logs and errors (e.g. `blogs`).
	fn resource(&self) -> &str;

	/// Fetches the entire collection.
	fn fetch_all(&self) -> CollectionFuture<'_, T>;
}

/// Backend resources exposed as collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
	/// Editorial blog posts.
	Blogs,
	/// Skin-type quizzes.
	Quizzes,
	/// Discount coupons.
	Coupons,
	/// Shopping carts.
	Carts,
	/// Placed orders.
	Orders,
}
impl Resource {
	/// Path segment under the API base URL.
	pub const fn path(self) -> &'static str {
		match self {
			Resource::Blogs => "blogs",
			Resource::Quizzes => "quizzes",
			Resource::Coupons => "coupons",
			Resource::Carts => "carts",
			Resource::Orders => "orders",
		}
	}
}
impl Display for Resource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.path())
	}
}

/// Server-side paging metadata. Every field is optional because older endpoints omit them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerPage {
	/// Page the server returned.
	pub page_index: Option<u64>,
	/// Page count reported by the server.
	pub total_pages: Option<u64>,
	/// Page size used by the server.
	pub page_size: Option<u64>,
	/// Whether the server reports an earlier page.
	pub has_previous_page: Option<bool>,
	/// Whether the server reports a later page.
	pub has_next_page: Option<bool>,
}

/// Items plus paging metadata, as found under `data`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedItems<T> {
	/// Items in server order.
	#[serde(default = "Vec::new")]
	pub items: Vec<T>,
	/// Server paging metadata.
	#[serde(flatten)]
	pub page: ServerPage,
}

/// Outer `{ "data": ... }` wrapper.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
	/// Wrapped payload.
	pub data: T,
}

/// Parses a collection envelope, reporting the JSON path of any mismatch.
pub fn parse_envelope<T>(resource: &str, body: &[u8]) -> Result<PagedItems<T>, TransientError>
where
	T: DeserializeOwned,
{
	let de = &mut serde_json::Deserializer::from_slice(body);
	let envelope: Envelope<PagedItems<T>> = serde_path_to_error::deserialize(de)
		.map_err(|source| TransientError::ResponseParse { resource: resource.to_owned(), source })?;

	Ok(envelope.data)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parses_items_and_server_paging() {
		let body = br#"{"data":{"items":[{"id":1,"title":"Retinol 101","tags":["serum"]}],
			"pageIndex":1,"totalPages":4,"pageSize":1,"hasPreviousPage":false,"hasNextPage":true}}"#;
		let parsed: PagedItems<BlogPost> =
			parse_envelope("blogs", body).expect("Envelope should parse.");

		assert_eq!(parsed.items.len(), 1);
		assert_eq!(parsed.items[0].title, "Retinol 101");
		assert_eq!(parsed.page.total_pages, Some(4));
		assert_eq!(parsed.page.has_next_page, Some(true));
	}

	#[test]
	fn missing_paging_fields_are_tolerated() {
		let parsed: PagedItems<BlogPost> =
			parse_envelope("blogs", br#"{"data":{"items":[]}}"#).expect("Envelope should parse.");

		assert!(parsed.items.is_empty());
		assert_eq!(parsed.page, ServerPage::default());
	}

	#[test]
	fn parse_errors_carry_the_json_path() {
		let err = parse_envelope::<BlogPost>("blogs", br#"{"data":{"items":[{"id":"x"}]}}"#)
			.expect_err("String id should be rejected.");

		match err {
			TransientError::ResponseParse { resource, source } => {
				assert_eq!(resource, "blogs");
				assert_eq!(source.path().to_string(), "data.items[0].id");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn resource_paths_are_stable() {
		assert_eq!(Resource::Blogs.path(), "blogs");
		assert_eq!(Resource::Quizzes.to_string(), "quizzes");
	}
}
