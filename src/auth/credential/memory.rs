//! Session-scoped [`CredentialProvider`] that forgets the credential when dropped.

// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialProvider, StorageError},
};

/// Thread-safe in-process credential slot for tests and session-only storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentialProvider(Arc<RwLock<Option<Credential>>>);
impl MemoryCredentialProvider {
	/// Creates a provider pre-seeded with `credential`.
	pub fn with_credential(credential: Credential) -> Self {
		Self(Arc::new(RwLock::new(Some(credential))))
	}
}
impl CredentialProvider for MemoryCredentialProvider {
	fn load(&self) -> Result<Option<Credential>, StorageError> {
		Ok(self.0.read().clone())
	}

	fn store(&self, credential: Credential) -> Result<(), StorageError> {
		*self.0.write() = Some(credential);

		Ok(())
	}

	fn clear(&self) -> Result<(), StorageError> {
		self.0.write().take();

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn clones_share_the_same_slot() {
		let provider = MemoryCredentialProvider::default();
		let view = provider.clone();

		assert!(view.load().expect("Memory load is infallible.").is_none());

		provider.store(Credential::new("a.b.c")).expect("Memory store is infallible.");

		assert_eq!(
			view.load().expect("Memory load is infallible.").as_ref().map(Credential::expose),
			Some("a.b.c"),
		);

		view.clear().expect("Memory clear is infallible.");

		assert!(provider.load().expect("Memory load is infallible.").is_none());
	}
}
