//! Optional observability helpers for guards and listings.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `storefront.op` with the `op` (operation
//!   kind) and `stage` (call site) fields, plus events for failed and discarded fetches.
//! - Enable `metrics` to increment the `storefront_op_total` counter for every
//!   attempt/success/failure/discard, labeled by `op` + `outcome`, and the
//!   `storefront_guard_total` counter labeled by the guard's terminal `state`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operation kinds observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Session/role guard evaluation.
	GuardEvaluation,
	/// One-shot collection fetch feeding a listing.
	CollectionFetch,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::GuardEvaluation => "guard_evaluation",
			OpKind::CollectionFetch => "collection_fetch",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure absorbed or propagated.
	Failure,
	/// Result dropped because its owner went away first.
	Discarded,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
			OpOutcome::Discarded => "discarded",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
