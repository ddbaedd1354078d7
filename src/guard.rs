//! Session/role guard for protected storefront views.
//!
//! A [`RouteGuard`] decides whether a protected subtree may render. The decision depends on
//! three inputs: the caller-supplied "is authenticated" flag, the credential held by the
//! injected [`CredentialProvider`], and the guard's required [`RoleSet`]. Every failure mode
//! degrades into a navigational redirect; nothing is raised to the caller.
//!
//! ```text
//! Unevaluated ─┬─ Unauthenticated | CredentialMissing | DecodeFailed | Expired ─→ RedirectToLogin
//!              ├─ Authorized ───────────────────────────────────────────────────→ Render
//!              └─ Forbidden ────────────────────────────────────────────────────→ RedirectHome
//! ```

pub mod session;

pub use session::*;

// self
use crate::{
	_prelude::*,
	auth::{CredentialProvider, RoleSet},
	config::{RedirectRoutes, StorefrontConfig},
	obs::{self, OpKind, OpOutcome},
};

/// Where a guard evaluation settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuardState {
	/// No evaluation has run yet.
	Unevaluated,
	/// The caller reported the user as signed out.
	Unauthenticated,
	/// Signed in according to the caller, but storage holds no credential.
	CredentialMissing,
	/// The stored credential could not be decoded.
	DecodeFailed,
	/// The stored credential expired (only with expiry enforcement on).
	Expired,
	/// The credential carries at least one required role.
	Authorized,
	/// The credential carries none of the required roles.
	Forbidden,
}
impl GuardState {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			GuardState::Unevaluated => "unevaluated",
			GuardState::Unauthenticated => "unauthenticated",
			GuardState::CredentialMissing => "credential_missing",
			GuardState::DecodeFailed => "decode_failed",
			GuardState::Expired => "expired",
			GuardState::Authorized => "authorized",
			GuardState::Forbidden => "forbidden",
		}
	}
}
impl Display for GuardState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// What the view layer must do with a guard decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardAction {
	/// Render the protected subtree.
	Render,
	/// Navigate to the login view, which returns the user to `return_to` afterwards.
	RedirectToLogin {
		/// Originally requested path.
		return_to: String,
		/// Fully formed login location including the redirect query.
		location: String,
	},
	/// Navigate to the home view.
	RedirectHome {
		/// Home location.
		location: String,
	},
}

/// Outcome of one guard evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardDecision {
	/// Terminal state reached.
	pub state: GuardState,
	/// Navigation the view layer must perform.
	pub action: GuardAction,
	/// Roles carried by the credential; empty unless the credential decoded.
	pub roles: RoleSet,
}
impl GuardDecision {
	/// Returns true when the protected subtree may render.
	pub fn is_authorized(&self) -> bool {
		matches!(self.action, GuardAction::Render)
	}

	/// Redirect location, if the decision navigates away.
	pub fn location(&self) -> Option<&str> {
		match &self.action {
			GuardAction::Render => None,
			GuardAction::RedirectToLogin { location, .. }
			| GuardAction::RedirectHome { location } => Some(location),
		}
	}
}

/// Gate for a protected subtree requiring any of a set of roles.
#[derive(Clone)]
pub struct RouteGuard {
	/// Roles admitted by this guard; any single match authorizes.
	pub required: RoleSet,
	/// Injected credential storage.
	pub credentials: Arc<dyn CredentialProvider>,
	/// Redirect routes.
	pub routes: RedirectRoutes,
	/// Treat expired credentials as signed out.
	pub enforce_expiry: bool,
}
impl RouteGuard {
	/// Creates a guard with default routes and no expiry enforcement.
	pub fn new(required: RoleSet, credentials: Arc<dyn CredentialProvider>) -> Self {
		Self { required, credentials, routes: RedirectRoutes::default(), enforce_expiry: false }
	}

	/// Creates a guard that follows the routes and expiry policy in `config`.
	pub fn from_config(
		required: RoleSet,
		credentials: Arc<dyn CredentialProvider>,
		config: &StorefrontConfig,
	) -> Self {
		Self {
			required,
			credentials,
			routes: config.routes.clone(),
			enforce_expiry: config.enforce_expiry,
		}
	}

	/// Overrides the redirect routes.
	pub fn with_routes(mut self, routes: RedirectRoutes) -> Self {
		self.routes = routes;

		self
	}

	/// Enables or disables expiry enforcement.
	pub fn with_expiry_enforcement(mut self, enabled: bool) -> Self {
		self.enforce_expiry = enabled;

		self
	}

	/// Starts a per-view session that caches decisions between renders.
	pub fn mount(&self, requested_path: impl Into<String>) -> GuardSession {
		GuardSession::new(self.clone(), requested_path)
	}

	/// Evaluates the guard for `requested_path` using the current time for expiry checks.
	pub fn evaluate(&self, requested_path: &str, is_authenticated: bool) -> GuardDecision {
		self.evaluate_at(requested_path, is_authenticated, OffsetDateTime::now_utc())
	}

	/// Evaluates the guard treating `now` as the current instant.
	pub fn evaluate_at(
		&self,
		requested_path: &str,
		is_authenticated: bool,
		now: OffsetDateTime,
	) -> GuardDecision {
		obs::in_guard_span(requested_path, || self.decide(requested_path, is_authenticated, now))
	}

	fn decide(
		&self,
		requested_path: &str,
		is_authenticated: bool,
		now: OffsetDateTime,
	) -> GuardDecision {
		const KIND: OpKind = OpKind::GuardEvaluation;

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let (state, roles) = self.resolve(is_authenticated, now);
		let action = match state {
			GuardState::Authorized => GuardAction::Render,
			GuardState::Forbidden =>
				GuardAction::RedirectHome { location: self.routes.home_location() },
			_ => GuardAction::RedirectToLogin {
				return_to: requested_path.to_owned(),
				location: self.routes.login_location(requested_path),
			},
		};

		#[cfg(feature = "tracing")]
		tracing::debug!(state = state.as_str(), required = %self.required, roles = %roles, "guard evaluated");

		obs::record_guard_state(state.as_str());
		obs::record_op_outcome(
			KIND,
			if matches!(action, GuardAction::Render) {
				OpOutcome::Success
			} else {
				OpOutcome::Failure
			},
		);

		GuardDecision { state, action, roles }
	}

	fn resolve(&self, is_authenticated: bool, now: OffsetDateTime) -> (GuardState, RoleSet) {
		if !is_authenticated {
			return (GuardState::Unauthenticated, RoleSet::default());
		}

		// A storage read failure is indistinguishable from an empty slot for the guard.
		let credential = match self.credentials.load() {
			Ok(Some(credential)) => credential,
			Ok(None) => return (GuardState::CredentialMissing, RoleSet::default()),
			Err(_e) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(error = %_e, "credential storage unreadable; treating as signed out");

				return (GuardState::CredentialMissing, RoleSet::default());
			},
		};
		let claims = match credential.claims() {
			Ok(claims) => claims,
			Err(_e) => {
				#[cfg(feature = "tracing")]
				tracing::debug!(fingerprint = %credential.fingerprint(), error = %_e, "credential decode failed");

				return (GuardState::DecodeFailed, RoleSet::default());
			},
		};

		if self.enforce_expiry && claims.is_expired_at(now) {
			return (GuardState::Expired, RoleSet::default());
		}

		let roles = claims.role_set();
		let state = if roles.intersects(&self.required) {
			GuardState::Authorized
		} else {
			GuardState::Forbidden
		};

		(state, roles)
	}
}
impl Debug for RouteGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RouteGuard")
			.field("required", &self.required)
			.field("routes", &self.routes)
			.field("enforce_expiry", &self.enforce_expiry)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
	use time::macros::datetime;
	// self
	use super::*;
	use crate::auth::{Credential, MemoryCredentialProvider, StorageError};

	fn provider_with(payload: &str) -> Arc<dyn CredentialProvider> {
		let token = format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(payload));

		Arc::new(MemoryCredentialProvider::with_credential(Credential::new(token)))
	}

	struct BrokenStorage;
	impl CredentialProvider for BrokenStorage {
		fn load(&self) -> Result<Option<Credential>, StorageError> {
			Err(StorageError::Backend { message: "quota exceeded".into() })
		}

		fn store(&self, _credential: Credential) -> Result<(), StorageError> {
			Err(StorageError::Backend { message: "quota exceeded".into() })
		}

		fn clear(&self) -> Result<(), StorageError> {
			Ok(())
		}
	}

	#[test]
	fn unauthenticated_flag_short_circuits_storage() {
		let guard = RouteGuard::new(RoleSet::staff_console(), Arc::new(BrokenStorage));
		let decision = guard.evaluate("/staff", false);

		assert_eq!(decision.state, GuardState::Unauthenticated);
		assert_eq!(decision.location(), Some("/login?redirect=/staff"));
	}

	#[test]
	fn unreadable_storage_counts_as_missing_credential() {
		let guard = RouteGuard::new(RoleSet::staff_console(), Arc::new(BrokenStorage));
		let decision = guard.evaluate("/staff", true);

		assert_eq!(decision.state, GuardState::CredentialMissing);
		assert!(!decision.is_authorized());
	}

	#[test]
	fn expiry_is_ignored_unless_enforced() {
		let guard = RouteGuard::new(
			RoleSet::admin_console(),
			provider_with(r#"{"roles":"Admin","exp":1700000000}"#),
		);
		let later = datetime!(2025-01-01 00:00 UTC);

		assert_eq!(guard.evaluate_at("/admin", true, later).state, GuardState::Authorized);

		let strict = guard.with_expiry_enforcement(true);
		let decision = strict.evaluate_at("/admin", true, later);

		assert_eq!(decision.state, GuardState::Expired);
		assert!(matches!(decision.action, GuardAction::RedirectToLogin { .. }));
		assert_eq!(
			strict.evaluate_at("/admin", true, datetime!(2023-01-01 00:00 UTC)).state,
			GuardState::Authorized,
		);
	}

	#[test]
	fn credential_without_roles_is_forbidden() {
		let guard = RouteGuard::new(RoleSet::admin_console(), provider_with(r#"{"sub":"1"}"#));
		let decision = guard.evaluate("/admin", true);

		assert_eq!(decision.state, GuardState::Forbidden);
		assert_eq!(decision.action, GuardAction::RedirectHome { location: "/".into() });
	}

	#[test]
	fn custom_routes_flow_into_locations() {
		let guard = RouteGuard::new(RoleSet::admin_console(), provider_with(r#"{"roles":[]}"#))
			.with_routes(RedirectRoutes { login: "/sign-in".into(), home: "/shop".into() });

		assert_eq!(guard.evaluate("/admin", true).location(), Some("/shop"));
		assert_eq!(guard.evaluate("/admin", false).location(), Some("/sign-in?redirect=/admin"));
	}
}
