//! Client-side listings over server-fetched collections.
//!
//! A [`ListStore`] owns the full collection, an optional tag filter, and a page number. Each
//! mutator recomputes the derived [`ListView`] under the same write lock that applied the
//! change, so readers always see a slice and page count cut from the same inputs. Filter and
//! page changes never touch the network; the collection itself is fetched once by a
//! [`ListLoader`].

pub mod loader;
pub mod page;

pub use loader::*;
pub use page::*;

// self
use crate::{_prelude::*, config::StorefrontConfig};

/// Items that can be matched against a listing filter.
pub trait Tagged {
	/// Returns true when the item belongs to `tag` (a tag or category label).
	fn has_tag(&self, tag: &str) -> bool;
}

/// Lifecycle of the one-shot collection fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadState {
	/// No fetch has been started.
	Idle,
	/// A fetch is in flight.
	Loading,
	/// The collection arrived.
	Loaded,
	/// The fetch failed; the listing stays empty.
	Failed,
}

/// Listing behavior knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListOptions {
	/// Fixed page size.
	pub page_size: NonZeroUsize,
	/// Jump back to page 1 whenever the filter changes.
	pub reset_page_on_filter: bool,
}
impl ListOptions {
	/// Options with the provided page size and no page reset.
	pub fn new(page_size: NonZeroUsize) -> Self {
		Self { page_size, reset_page_on_filter: false }
	}

	/// Options matching `config`.
	pub fn from_config(config: &StorefrontConfig) -> Self {
		Self { page_size: config.page_size, reset_page_on_filter: config.reset_page_on_filter }
	}

	/// Enables or disables the page reset on filter changes.
	pub fn with_reset_page_on_filter(mut self, enabled: bool) -> Self {
		self.reset_page_on_filter = enabled;

		self
	}
}
impl Default for ListOptions {
	fn default() -> Self {
		Self::new(crate::config::DEFAULT_PAGE_SIZE)
	}
}

struct ListState<T> {
	source: Vec<T>,
	filter: Option<String>,
	page: usize,
	load: LoadState,
	view: Arc<ListView<T>>,
}

pub(crate) struct ListInner<T> {
	options: ListOptions,
	state: RwLock<ListState<T>>,
}
impl<T> ListInner<T>
where
	T: Clone + Tagged,
{
	fn mutate(&self, f: impl FnOnce(&mut ListState<T>)) {
		let mut state = self.state.write();

		f(&mut state);

		state.view = Arc::new(derive_view(
			&state.source,
			state.filter.as_deref(),
			state.page,
			self.options.page_size,
		));
	}
}

/// Filtered, paginated view over a collection.
///
/// The store is the single owner of its state. Dropping it "unmounts" the listing: a fetch
/// still in flight through a [`ListLoader`] completes, but its result is discarded.
pub struct ListStore<T> {
	inner: Arc<ListInner<T>>,
}
impl<T> ListStore<T>
where
	T: Clone + Tagged,
{
	/// Creates an empty store awaiting its first load.
	pub fn new(options: ListOptions) -> Self {
		Self {
			inner: Arc::new(ListInner {
				options,
				state: RwLock::new(ListState {
					source: Vec::new(),
					filter: None,
					page: 1,
					load: LoadState::Idle,
					view: Arc::new(ListView::default()),
				}),
			}),
		}
	}

	/// Creates a store over an already available collection.
	pub fn with_items(options: ListOptions, items: Vec<T>) -> Self {
		let store = Self::new(options);

		store.inner.mutate(|state| {
			state.source = items;
			state.load = LoadState::Loaded;
		});

		store
	}

	/// Options the store was created with.
	pub fn options(&self) -> ListOptions {
		self.inner.options
	}

	/// Current derived view.
	pub fn view(&self) -> Arc<ListView<T>> {
		self.inner.state.read().view.clone()
	}

	/// Current filter criterion.
	pub fn filter(&self) -> Option<String> {
		self.inner.state.read().filter.clone()
	}

	/// Current 1-based page.
	pub fn page(&self) -> usize {
		self.inner.state.read().page
	}

	/// Current fetch lifecycle state.
	pub fn load_state(&self) -> LoadState {
		self.inner.state.read().load
	}

	/// Sets or clears the filter criterion.
	///
	/// The page is kept unless [`ListOptions::reset_page_on_filter`] is set, so a narrower
	/// filter can leave the page past the end; callers decide whether to reset it.
	pub fn set_filter(&self, criterion: Option<&str>) {
		let reset = self.inner.options.reset_page_on_filter;

		self.inner.mutate(|state| {
			let next = criterion.map(str::to_owned);

			if reset && state.filter != next {
				state.page = 1;
			}

			state.filter = next;
		});
	}

	/// Moves to the 1-based page `page`; 0 is treated as 1.
	pub fn set_page(&self, page: usize) {
		self.inner.mutate(|state| state.page = page.max(1));
	}

	/// Handle that can fetch the collection without keeping the store alive.
	pub fn loader(&self) -> ListLoader<T> {
		ListLoader::new(Arc::downgrade(&self.inner))
	}
}
impl<T> Debug for ListStore<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.inner.state.read();

		f.debug_struct("ListStore")
			.field("options", &self.inner.options)
			.field("load", &state.load)
			.field("len", &state.source.len())
			.field("filter", &state.filter)
			.field("page", &state.page)
			.finish()
	}
}
