// self
use crate::obs::{OpKind, OpOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"storefront_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records the terminal state a guard evaluation settled in (when enabled).
pub fn record_guard_state(state: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("storefront_guard_total", "state" => state).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = state;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_op_outcome(OpKind::CollectionFetch, OpOutcome::Failure);
		record_guard_state("forbidden");
	}
}
