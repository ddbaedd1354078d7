//! File-backed [`CredentialProvider`] that keeps the session across process restarts.

// std
use std::{
	fs::{self, File},
	io::{ErrorKind, Write},
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialProvider, StorageError},
};

#[derive(Serialize, Deserialize)]
struct Snapshot {
	credential: Credential,
}

/// Persists the credential to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileCredentialProvider {
	path: PathBuf,
	inner: Arc<RwLock<Option<Credential>>>,
}
impl FileCredentialProvider {
	/// Opens (or creates) a provider at the provided path, eagerly loading an existing snapshot.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the snapshot file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Option<Credential>, StorageError> {
		let bytes = match fs::read(path) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(e) =>
				return Err(StorageError::Backend {
					message: format!("Failed to read {}: {e}", path.display()),
				}),
		};

		if bytes.is_empty() {
			return Ok(None);
		}

		let snapshot: Snapshot =
			serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(Some(snapshot.credential))
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StorageError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StorageError::Backend {
				message: format!("Failed to create storage directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, credential: &Credential) -> Result<(), StorageError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(&Snapshot { credential: credential.clone() }).map_err(
				|e| StorageError::Serialization {
					message: format!("Failed to serialize credential snapshot: {e}"),
				},
			)?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StorageError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StorageError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StorageError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl CredentialProvider for FileCredentialProvider {
	fn load(&self) -> Result<Option<Credential>, StorageError> {
		Ok(self.inner.read().clone())
	}

	fn store(&self, credential: Credential) -> Result<(), StorageError> {
		let mut guard = self.inner.write();

		self.persist_locked(&credential)?;
		*guard = Some(credential);

		Ok(())
	}

	fn clear(&self) -> Result<(), StorageError> {
		let mut guard = self.inner.write();

		match fs::remove_file(&self.path) {
			Ok(()) => {},
			Err(e) if e.kind() == ErrorKind::NotFound => {},
			Err(e) =>
				return Err(StorageError::Backend {
					message: format!("Failed to remove {}: {e}", self.path.display()),
				}),
		}

		guard.take();

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// self
	use super::*;

	fn temp_path(tag: &str) -> PathBuf {
		let unique = format!(
			"storefront_credential_{tag}_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn store_and_reopen_round_trip() {
		let path = temp_path("reopen");
		let provider = FileCredentialProvider::open(&path).expect("Failed to open provider.");

		assert!(provider.load().expect("Fresh provider should load.").is_none());

		provider.store(Credential::new("h.p.s")).expect("Failed to store credential.");
		drop(provider);

		let reopened = FileCredentialProvider::open(&path).expect("Failed to reopen provider.");
		let loaded = reopened
			.load()
			.expect("Reopened provider should load.")
			.expect("Credential should survive reopen.");

		assert_eq!(loaded.expose(), "h.p.s");

		reopened.clear().expect("Failed to clear credential.");

		assert!(!path.exists());
		assert!(reopened.load().expect("Cleared provider should load.").is_none());
	}

	#[test]
	fn corrupt_snapshot_is_reported() {
		let path = temp_path("corrupt");

		fs::write(&path, b"{not json").expect("Failed to seed corrupt snapshot.");

		let err = FileCredentialProvider::open(&path)
			.expect_err("Corrupt snapshot should fail to open.");

		assert!(matches!(err, StorageError::Serialization { .. }));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn clearing_without_a_snapshot_is_a_noop() {
		let provider =
			FileCredentialProvider::open(temp_path("noop")).expect("Failed to open provider.");

		provider.clear().expect("Clearing an empty provider should succeed.");
	}
}
