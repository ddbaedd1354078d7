//! Crate-level error types shared across guards, listings, sources, and checkout.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical storefront error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::auth::StorageError,
	),
	/// Credential could not be decoded.
	#[error(transparent)]
	Credential(#[from] crate::auth::CredentialError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; the caller may retry later.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Coupon could not be applied to the cart.
	#[error(transparent)]
	Checkout(#[from] crate::checkout::CheckoutError),
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// API base URL cannot be parsed.
	#[error("API base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// API base URL cannot carry path segments (e.g. `data:` or `mailto:` URLs).
	#[error("API base URL `{url}` cannot be used as a base for resource paths.")]
	OpaqueBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// API base URL is missing.
	#[error("Missing API base URL.")]
	MissingBaseUrl,
	/// Redirect path must be absolute within the storefront.
	#[error("The {route} path must start with `/`: {path}.")]
	RelativeRoutePath {
		/// Which route failed validation.
		route: &'static str,
		/// Path that failed validation.
		path: String,
	},
	/// Resource URL could not be joined onto the base URL.
	#[error("Resource path `{resource}` cannot be joined onto the API base URL.")]
	InvalidResourcePath {
		/// Resource path segment.
		resource: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// JSON configuration document is malformed.
	#[error("Configuration document is malformed.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Collection endpoint returned a non-success status.
	#[error("Collection endpoint `{resource}` returned HTTP {status}: {message}.")]
	Endpoint {
		/// Resource path segment that was requested.
		resource: String,
		/// HTTP status code.
		status: u16,
		/// Short preview of the response body.
		message: String,
	},
	/// Collection endpoint responded with JSON that could not be parsed.
	#[error("Collection endpoint `{resource}` returned malformed JSON.")]
	ResponseParse {
		/// Resource path segment that was requested.
		resource: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the collection endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the collection endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::auth::StorageError;

	#[test]
	fn storage_error_converts_into_crate_error_with_source() {
		let storage_error = StorageError::Backend { message: "disk unavailable".into() };
		let error: Error = storage_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("disk unavailable"));

		let source = StdError::source(&error)
			.expect("Crate error should expose the original storage error as its source.");

		assert_eq!(source.to_string(), storage_error.to_string());
	}

	#[test]
	fn endpoint_error_mentions_resource_and_status() {
		let error: Error = TransientError::Endpoint {
			resource: "blogs".into(),
			status: 503,
			message: "maintenance".into(),
		}
		.into();

		assert_eq!(
			error.to_string(),
			"Collection endpoint `blogs` returned HTTP 503: maintenance."
		);
	}
}
