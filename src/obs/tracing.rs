// self
use crate::{_prelude::*, obs::OpKind};

/// Runs one guard evaluation for `path` inside a `storefront.op` span.
pub fn in_guard_span<R>(path: &str, f: impl FnOnce() -> R) -> R {
	#[cfg(feature = "tracing")]
	{
		tracing::info_span!(
			"storefront.op",
			op = OpKind::GuardEvaluation.as_str(),
			stage = "evaluate",
			path
		)
		.in_scope(f)
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (path, OpKind::GuardEvaluation);

		f()
	}
}

/// Awaits a collection fetch for `resource` inside a `storefront.op` span.
///
/// The span is attached to the future rather than entered, so nothing is held across `.await`.
pub async fn in_fetch_span<F>(resource: &str, fut: F) -> F::Output
where
	F: Future,
{
	#[cfg(feature = "tracing")]
	{
		use tracing::Instrument;

		let span = tracing::info_span!(
			"storefront.op",
			op = OpKind::CollectionFetch.as_str(),
			stage = "load",
			resource
		);

		fut.instrument(span).await
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = resource;

		fut.await
	}
}

/// Logs a collection fetch failure that is being absorbed into an empty listing.
pub fn warn_fetch_failed(resource: &str, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(resource, error = %error, "collection fetch failed; listing stays empty");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (resource, error);
	}
}

/// Logs a fetch result dropped because the listing was released before it arrived.
pub fn debug_fetch_discarded(resource: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(resource, "listing released before fetch completed; result discarded");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = resource;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn guard_span_returns_the_evaluation_result() {
		assert_eq!(in_guard_span("/admin", || 7), 7);
	}

	#[tokio::test]
	async fn fetch_span_returns_the_future_output() {
		assert_eq!(in_fetch_span("blogs", async { 42 }).await, 42);
	}

	#[cfg(feature = "tracing")]
	mod recorded {
		// crates.io
		use parking_lot::Mutex;
		use tracing::{
			Event, Metadata, Subscriber,
			span::{Attributes, Id, Record},
		};
		// self
		use super::*;

		#[derive(Clone, Default)]
		struct SpanLog(Arc<Mutex<Vec<(&'static str, Vec<&'static str>)>>>);
		impl Subscriber for SpanLog {
			fn enabled(&self, _: &Metadata<'_>) -> bool {
				true
			}

			fn new_span(&self, span: &Attributes<'_>) -> Id {
				let mut log = self.0.lock();
				let metadata = span.metadata();

				log.push((metadata.name(), metadata.fields().iter().map(|f| f.name()).collect()));

				Id::from_u64(log.len() as u64)
			}

			fn record(&self, _: &Id, _: &Record<'_>) {}

			fn record_follows_from(&self, _: &Id, _: &Id) {}

			fn event(&self, _: &Event<'_>) {}

			fn enter(&self, _: &Id) {}

			fn exit(&self, _: &Id) {}
		}

		#[test]
		fn guard_evaluations_open_an_op_span_with_the_path() {
			let log = SpanLog::default();

			tracing::subscriber::with_default(log.clone(), || in_guard_span("/staff", || ()));

			assert_eq!(*log.0.lock(), vec![("storefront.op", vec!["op", "stage", "path"])]);
		}

		#[test]
		fn fetches_open_an_op_span_with_the_resource() {
			let log = SpanLog::default();
			let runtime = tokio::runtime::Builder::new_current_thread()
				.build()
				.expect("Runtime should build.");

			tracing::subscriber::with_default(log.clone(), || {
				runtime.block_on(in_fetch_span("quizzes", async {}))
			});

			assert_eq!(*log.0.lock(), vec![("storefront.op", vec!["op", "stage", "resource"])]);
		}
	}
}
