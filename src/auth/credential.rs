//! Credential storage contracts and built-in providers.
//!
//! A [`CredentialProvider`] stands in for the browser storage that keeps the session token
//! across page loads. Guards receive the provider as an injected capability instead of reading
//! an ambient global, so tests can swap in [`MemoryCredentialProvider`].

pub mod file;
pub mod memory;

pub use file::FileCredentialProvider;
pub use memory::MemoryCredentialProvider;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::CredentialClaims};

/// Error type produced by [`CredentialProvider`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StorageError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage medium.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Storage capability holding the session credential.
pub trait CredentialProvider
where
	Self: Send + Sync,
{
	/// Returns the stored credential, if any.
	fn load(&self) -> Result<Option<Credential>, StorageError>;

	/// Persists or replaces the stored credential.
	fn store(&self, credential: Credential) -> Result<(), StorageError>;

	/// Removes the stored credential (logout).
	fn clear(&self) -> Result<(), StorageError>;
}

/// Redacted credential wrapper keeping the raw token out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);
impl Credential {
	/// Wraps a raw token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Decodes the credential payload.
	pub fn claims(&self) -> Result<CredentialClaims, crate::auth::CredentialError> {
		CredentialClaims::decode(&self.0)
	}

	/// Stable, log-safe fingerprint: base64 (no padding) of the token's SHA-256 digest.
	pub fn fingerprint(&self) -> String {
		STANDARD_NO_PAD.encode(Sha256::digest(self.0.as_bytes()))
	}
}
impl AsRef<str> for Credential {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Credential").field(&"<redacted>").finish()
	}
}
impl Display for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
