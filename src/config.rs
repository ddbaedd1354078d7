//! Storefront configuration: API location, listing page size, and guard redirect routes.
//!
//! Configuration is assembled through [`StorefrontConfigBuilder`] or loaded from a JSON document
//! with [`StorefrontConfig::from_json`]. Both paths run the same validation, so a
//! [`StorefrontConfig`] value is always usable as-is.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::ConfigError};

/// Page size applied to listings when none is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(6).unwrap();
/// Login view path used when none is configured.
pub const DEFAULT_LOGIN_PATH: &str = "/login";
/// Home view path used when none is configured.
pub const DEFAULT_HOME_PATH: &str = "/";
/// Query parameter carrying the originally requested path to the login view.
pub const REDIRECT_QUERY_PARAM: &str = "redirect";

/// Paths guards redirect to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRoutes {
	/// Login view; receives the requested path through [`REDIRECT_QUERY_PARAM`].
	pub login: String,
	/// Neutral landing view for authenticated users lacking the required roles.
	pub home: String,
}
impl RedirectRoutes {
	/// Location of the login view carrying `return_to` as the redirect target.
	pub fn login_location(&self, return_to: &str) -> String {
		// `/` is legal inside a query component. Any literal `%` was escaped first, so every
		// `%2F` left in the output came from a `/`.
		let target = url::form_urlencoded::byte_serialize(return_to.as_bytes())
			.collect::<String>()
			.replace("%2F", "/");
		let separator = if self.login.contains('?') { '&' } else { '?' };

		format!("{}{separator}{REDIRECT_QUERY_PARAM}={target}", self.login)
	}

	/// Location of the home view.
	pub fn home_location(&self) -> String {
		self.home.clone()
	}
}
impl Default for RedirectRoutes {
	fn default() -> Self {
		Self { login: DEFAULT_LOGIN_PATH.into(), home: DEFAULT_HOME_PATH.into() }
	}
}

/// Validated storefront configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StorefrontConfig {
	/// Backend base URL; always ends with `/` so resource paths join beneath it.
	pub api_base_url: Url,
	/// Fixed listing page size.
	pub page_size: NonZeroUsize,
	/// Guard redirect routes.
	pub routes: RedirectRoutes,
	/// Treat credentials whose `exp` has passed as signed out.
	pub enforce_expiry: bool,
	/// Jump back to page 1 whenever a listing filter changes.
	pub reset_page_on_filter: bool,
	/// Per-request timeout for collection fetches, in seconds.
	pub request_timeout_secs: Option<u64>,
}
impl StorefrontConfig {
	/// Creates a new builder.
	pub fn builder() -> StorefrontConfigBuilder {
		StorefrontConfigBuilder::default()
	}

	/// Parses and validates a JSON configuration document.
	pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(raw);
		let builder: StorefrontConfigBuilder = serde_path_to_error::deserialize(de)
			.map_err(|source| ConfigError::Parse { source })?;

		builder.build()
	}

	/// Absolute URL of a backend resource such as `blogs`.
	pub fn resource_url(&self, resource: &str) -> Result<Url, ConfigError> {
		self.api_base_url.join(resource.trim_start_matches('/')).map_err(|source| {
			ConfigError::InvalidResourcePath { resource: resource.to_owned(), source }
		})
	}

	/// Request timeout as a [`std::time::Duration`].
	pub fn request_timeout(&self) -> Option<StdDuration> {
		self.request_timeout_secs.map(StdDuration::from_secs)
	}
}

/// Builder for [`StorefrontConfig`] values.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfigBuilder {
	/// Backend base URL (required).
	pub api_base_url: Option<String>,
	/// Listing page size; [`DEFAULT_PAGE_SIZE`] when unset.
	pub page_size: Option<NonZeroUsize>,
	/// Login view path; [`DEFAULT_LOGIN_PATH`] when unset.
	pub login_path: Option<String>,
	/// Home view path; [`DEFAULT_HOME_PATH`] when unset.
	pub home_path: Option<String>,
	/// Expiry enforcement toggle.
	pub enforce_expiry: bool,
	/// Page reset toggle.
	pub reset_page_on_filter: bool,
	/// Per-request timeout in seconds.
	pub request_timeout_secs: Option<u64>,
}
impl StorefrontConfigBuilder {
	/// Sets the backend base URL.
	pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
		self.api_base_url = Some(url.into());

		self
	}

	/// Sets the listing page size.
	pub fn page_size(mut self, size: NonZeroUsize) -> Self {
		self.page_size = Some(size);

		self
	}

	/// Sets the login view path.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = Some(path.into());

		self
	}

	/// Sets the home view path.
	pub fn home_path(mut self, path: impl Into<String>) -> Self {
		self.home_path = Some(path.into());

		self
	}

	/// Enables or disables expiry enforcement.
	pub fn enforce_expiry(mut self, enabled: bool) -> Self {
		self.enforce_expiry = enabled;

		self
	}

	/// Enables or disables the page reset on filter changes.
	pub fn reset_page_on_filter(mut self, enabled: bool) -> Self {
		self.reset_page_on_filter = enabled;

		self
	}

	/// Sets the per-request timeout.
	pub fn request_timeout_secs(mut self, secs: u64) -> Self {
		self.request_timeout_secs = Some(secs);

		self
	}

	/// Validates the inputs and produces a [`StorefrontConfig`].
	pub fn build(self) -> Result<StorefrontConfig, ConfigError> {
		let raw = self.api_base_url.ok_or(ConfigError::MissingBaseUrl)?;
		let mut api_base_url =
			Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if api_base_url.cannot_be_a_base() {
			return Err(ConfigError::OpaqueBaseUrl { url: raw });
		}
		if !api_base_url.path().ends_with('/') {
			let path = format!("{}/", api_base_url.path());

			api_base_url.set_path(&path);
		}

		let routes = RedirectRoutes {
			login: validate_route("login", self.login_path, DEFAULT_LOGIN_PATH)?,
			home: validate_route("home", self.home_path, DEFAULT_HOME_PATH)?,
		};

		Ok(StorefrontConfig {
			api_base_url,
			page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
			routes,
			enforce_expiry: self.enforce_expiry,
			reset_page_on_filter: self.reset_page_on_filter,
			request_timeout_secs: self.request_timeout_secs,
		})
	}
}

fn validate_route(
	route: &'static str,
	path: Option<String>,
	default: &str,
) -> Result<String, ConfigError> {
	let path = path.unwrap_or_else(|| default.to_owned());

	if !path.starts_with('/') {
		return Err(ConfigError::RelativeRoutePath { route, path });
	}

	Ok(path)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn builder_applies_defaults_and_normalizes_base() {
		let config = StorefrontConfig::builder()
			.api_base_url("https://api.example.com/v1")
			.build()
			.expect("Minimal configuration should build.");

		assert_eq!(config.api_base_url.as_str(), "https://api.example.com/v1/");
		assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
		assert_eq!(config.routes, RedirectRoutes::default());
		assert!(!config.enforce_expiry);
		assert!(!config.reset_page_on_filter);
		assert_eq!(
			config.resource_url("/blogs").expect("Resource should join.").as_str(),
			"https://api.example.com/v1/blogs",
		);
	}

	#[test]
	fn builder_rejects_bad_inputs() {
		assert!(matches!(StorefrontConfig::builder().build(), Err(ConfigError::MissingBaseUrl)));
		assert!(matches!(
			StorefrontConfig::builder().api_base_url("not a url").build(),
			Err(ConfigError::InvalidBaseUrl { .. })
		));
		assert!(matches!(
			StorefrontConfig::builder().api_base_url("mailto:shop@example.com").build(),
			Err(ConfigError::OpaqueBaseUrl { .. })
		));
		assert!(matches!(
			StorefrontConfig::builder()
				.api_base_url("https://api.example.com")
				.login_path("login")
				.build(),
			Err(ConfigError::RelativeRoutePath { route: "login", .. })
		));
	}

	#[test]
	fn json_documents_share_builder_validation() {
		let config = StorefrontConfig::from_json(
			r#"{"api_base_url":"http://localhost:5000/api","page_size":3,"enforce_expiry":true}"#,
		)
		.expect("JSON configuration should load.");

		assert_eq!(config.page_size.get(), 3);
		assert!(config.enforce_expiry);

		let err = StorefrontConfig::from_json(r#"{"api_base_url":"http://x","page_size":0}"#)
			.expect_err("Zero page size should be rejected.");

		match err {
			ConfigError::Parse { source } => assert_eq!(source.path().to_string(), "page_size"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn login_location_encodes_the_return_target() {
		let routes = RedirectRoutes::default();

		assert_eq!(routes.login_location("/staff"), "/login?redirect=/staff");
		assert_eq!(
			RedirectRoutes { login: "/auth?tab=signin".into(), home: "/".into() }
				.login_location("/admin/orders?page=2"),
			"/auth?tab=signin&redirect=/admin/orders%3Fpage%3D2",
		);
		assert_eq!(
			routes.login_location("/search?q=50% off&tag=a/b"),
			"/login?redirect=/search%3Fq%3D50%25+off%26tag%3Da/b",
		);
	}
}
