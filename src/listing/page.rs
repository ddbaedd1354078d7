//! Pure derivation of a filtered, paginated view.

// self
use crate::{_prelude::*, listing::Tagged};

/// Snapshot of the visible slice of a listing.
///
/// Every field is derived from the same (collection, filter, page) triple, so `items`,
/// `total_pages`, and `total_items` never disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListView<T> {
	/// Items on the current page, in collection order.
	pub items: Vec<T>,
	/// 1-based page the slice was cut for.
	pub page: usize,
	/// Number of pages in the working set; 0 when nothing matches.
	pub total_pages: usize,
	/// Size of the working set (filtered, not paged).
	pub total_items: usize,
	/// Filter the working set was built with.
	pub filter: Option<String>,
}
impl<T> ListView<T> {
	/// Returns true when the current page lies within `1..=total_pages`.
	pub fn page_in_range(&self) -> bool {
		(1..=self.total_pages).contains(&self.page)
	}

	/// Returns true when a later page exists.
	pub fn has_next_page(&self) -> bool {
		self.page < self.total_pages
	}

	/// Returns true when an earlier, in-range page exists.
	pub fn has_previous_page(&self) -> bool {
		self.page > 1 && self.total_pages > 0
	}
}
impl<T> Default for ListView<T> {
	fn default() -> Self {
		Self { items: Vec::new(), page: 1, total_pages: 0, total_items: 0, filter: None }
	}
}

/// Number of pages needed for `len` items.
pub fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
	len.div_ceil(page_size.get())
}

/// Cuts the view for `page` out of `source` after applying `filter`.
///
/// `page` is 1-based; 0 is treated as 1. A page past the end yields an empty slice while still
/// reporting the true page count.
pub fn derive_view<T>(
	source: &[T],
	filter: Option<&str>,
	page: usize,
	page_size: NonZeroUsize,
) -> ListView<T>
where
	T: Clone + Tagged,
{
	let page = page.max(1);
	let working: Vec<&T> = match filter {
		Some(criterion) => source.iter().filter(|item| item.has_tag(criterion)).collect(),
		None => source.iter().collect(),
	};
	let size = page_size.get();
	let items = working
		.iter()
		.skip((page - 1).saturating_mul(size))
		.take(size)
		.map(|item| (*item).clone())
		.collect();

	ListView {
		items,
		page,
		total_pages: total_pages(working.len(), page_size),
		total_items: working.len(),
		filter: filter.map(str::to_owned),
	}
}
