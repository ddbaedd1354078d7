//! Login/logout bookkeeping on top of a [`CredentialProvider`].

// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialClaims, CredentialProvider},
};

/// Owns the injected credential provider and derives the "is authenticated" flag from it.
#[derive(Clone)]
pub struct Session {
	provider: Arc<dyn CredentialProvider>,
}
impl Session {
	/// Wraps a credential provider.
	pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
		Self { provider }
	}

	/// Shared handle to the underlying provider, suitable for handing to guards.
	pub fn provider(&self) -> Arc<dyn CredentialProvider> {
		self.provider.clone()
	}

	/// Stores the token issued by the backend after a successful sign-in.
	///
	/// The token is decoded first so an unreadable credential never reaches storage.
	pub fn login(&self, token: impl Into<String>) -> Result<CredentialClaims> {
		let credential = Credential::new(token);
		let claims = credential.claims()?;

		#[cfg(feature = "tracing")]
		tracing::debug!(fingerprint = %credential.fingerprint(), "storing session credential");

		self.provider.store(credential)?;

		Ok(claims)
	}

	/// Drops the stored credential.
	pub fn logout(&self) -> Result<()> {
		self.provider.clear()?;

		Ok(())
	}

	/// Returns true when a credential is present. Read failures count as signed out.
	pub fn is_authenticated(&self) -> bool {
		matches!(self.provider.load(), Ok(Some(_)))
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session").field("authenticated", &self.is_authenticated()).finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
	// self
	use super::*;
	use crate::{
		auth::{MemoryCredentialProvider, RoleSet},
		error::Error,
	};

	#[test]
	fn login_then_logout_toggles_authentication() {
		let session = Session::new(Arc::new(MemoryCredentialProvider::default()));
		let token = format!(
			"{}.{}.s",
			URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#),
			URL_SAFE_NO_PAD.encode(r#"{"roles":["Staff"]}"#),
		);

		assert!(!session.is_authenticated());

		let claims = session.login(token).expect("Valid token should be stored.");

		assert_eq!(claims.role_set(), RoleSet::new(["Staff"]));
		assert!(session.is_authenticated());

		session.logout().expect("Logout should succeed.");

		assert!(!session.is_authenticated());
	}

	#[test]
	fn undecodable_tokens_are_not_stored() {
		let provider = Arc::new(MemoryCredentialProvider::default());
		let session = Session::new(provider.clone());
		let err = session.login("garbage").expect_err("Garbage token should be rejected.");

		assert!(matches!(err, Error::Credential(_)));
		assert!(provider.load().expect("Memory load is infallible.").is_none());
	}
}
