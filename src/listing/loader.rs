//! One-shot collection loading for [`ListStore`](crate::listing::ListStore).

// self
use crate::{
	_prelude::*,
	api::CollectionSource,
	listing::{ListInner, LoadState, Tagged},
	obs::{self, OpKind, OpOutcome},
};

/// Result of driving a [`ListLoader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
	/// The collection arrived and was installed.
	Loaded {
		/// Number of items installed.
		items: usize,
	},
	/// The fetch failed; the listing stays empty.
	Failed,
	/// Another loader already started; nothing was fetched.
	Skipped(LoadState),
	/// The store was dropped before or during the fetch; the result was thrown away.
	Discarded,
}

/// Fetches a store's collection while holding only a weak reference to it.
///
/// The loader is `Send` whenever the items are, so callers may hand it to whatever executor
/// drives their event loop. Only the first loader to run against a store fetches anything.
pub struct ListLoader<T> {
	inner: Weak<ListInner<T>>,
}
impl<T> ListLoader<T>
where
	T: Clone + Tagged,
{
	pub(crate) fn new(inner: Weak<ListInner<T>>) -> Self {
		Self { inner }
	}

	/// Fetches the collection from `source` and installs it if the store is still alive.
	///
	/// Failures are logged and absorbed: the store records [`LoadState::Failed`] and keeps an
	/// empty collection. No retry is attempted.
	pub async fn run<S>(self, source: &S) -> LoadOutcome
	where
		S: ?Sized + CollectionSource<T>,
	{
		const KIND: OpKind = OpKind::CollectionFetch;

		let resource = source.resource().to_owned();

		{
			let Some(inner) = self.inner.upgrade() else {
				obs::debug_fetch_discarded(&resource);
				obs::record_op_outcome(KIND, OpOutcome::Discarded);

				return LoadOutcome::Discarded;
			};
			let mut state = inner.state.write();

			if state.load != LoadState::Idle {
				return LoadOutcome::Skipped(state.load);
			}

			state.load = LoadState::Loading;
		}

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = obs::in_fetch_span(&resource, source.fetch_all()).await;
		let Some(inner) = self.inner.upgrade() else {
			obs::debug_fetch_discarded(&resource);
			obs::record_op_outcome(KIND, OpOutcome::Discarded);

			return LoadOutcome::Discarded;
		};

		match result {
			Ok(items) => {
				let count = items.len();

				inner.mutate(|state| {
					state.source = items;
					state.load = LoadState::Loaded;
				});
				obs::record_op_outcome(KIND, OpOutcome::Success);

				LoadOutcome::Loaded { items: count }
			},
			Err(e) => {
				obs::warn_fetch_failed(&resource, &e);
				inner.mutate(|state| {
					state.source.clear();
					state.load = LoadState::Failed;
				});
				obs::record_op_outcome(KIND, OpOutcome::Failure);

				LoadOutcome::Failed
			},
		}
	}
}
impl<T> Debug for ListLoader<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ListLoader").field("store_alive", &(self.inner.strong_count() > 0)).finish()
	}
}
