//! Per-view guard sessions that only re-evaluate when the authentication flag flips.

// self
use crate::{
	_prelude::*,
	guard::{GuardDecision, GuardState, RouteGuard},
};

/// Guard bound to one mounted view.
///
/// Views render far more often than the user signs in or out. Re-running the guard on every
/// render would re-issue the same redirect each time, so the session caches the last decision
/// and evaluates again only when the reported authentication flag differs from the one that
/// produced it.
#[derive(Debug)]
pub struct GuardSession {
	guard: RouteGuard,
	requested_path: String,
	last: Option<(bool, GuardDecision)>,
	evaluations: usize,
}
impl GuardSession {
	/// Binds `guard` to the view at `requested_path`.
	pub fn new(guard: RouteGuard, requested_path: impl Into<String>) -> Self {
		Self { guard, requested_path: requested_path.into(), last: None, evaluations: 0 }
	}

	/// Path the view was requested under; used as the login return target.
	pub fn requested_path(&self) -> &str {
		&self.requested_path
	}

	/// Current state; [`GuardState::Unevaluated`] before the first render.
	pub fn state(&self) -> GuardState {
		self.last.as_ref().map_or(GuardState::Unevaluated, |(_, decision)| decision.state)
	}

	/// Number of evaluations performed so far.
	pub fn evaluations(&self) -> usize {
		self.evaluations
	}

	/// Returns the decision for this render, evaluating only if the flag changed.
	pub fn render(&mut self, is_authenticated: bool) -> &GuardDecision {
		if !matches!(&self.last, Some((flag, _)) if *flag == is_authenticated) {
			self.last = None;
		}

		let (_, decision) = self.last.get_or_insert_with(|| {
			self.evaluations += 1;

			(is_authenticated, self.guard.evaluate(&self.requested_path, is_authenticated))
		});

		decision
	}
}
