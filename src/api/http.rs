//! reqwest-backed collection sources.

// std
use std::{marker::PhantomData, ops::Deref};
// crates.io
use reqwest::header::ACCEPT;
// self
use crate::{
	_prelude::*,
	api::{CollectionFuture, CollectionSource, Resource, parse_envelope},
	auth::CredentialProvider,
	config::StorefrontConfig,
	error::{ConfigError, TransientError, TransportError},
};

const BODY_PREVIEW_LIMIT: usize = 256;

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the request timeout in `config`.
	pub fn from_config(config: &StorefrontConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder();

		if let Some(timeout) = config.request_timeout() {
			builder = builder.timeout(timeout);
		}

		Ok(Self(builder.build()?))
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// Fetches a whole backend collection with a single `GET`.
///
/// When a credential provider is attached, the stored credential (if any) is sent as a bearer
/// token; public collections such as blogs work without one.
pub struct HttpCollectionSource<T> {
	client: ReqwestHttpClient,
	resource: String,
	url: Url,
	credentials: Option<Arc<dyn CredentialProvider>>,
	_item: PhantomData<fn() -> T>,
}
impl<T> HttpCollectionSource<T> {
	/// Source for `resource` under the API base URL in `config`.
	pub fn new(
		client: ReqwestHttpClient,
		config: &StorefrontConfig,
		resource: Resource,
	) -> Result<Self, ConfigError> {
		Ok(Self::from_url(client, resource.path(), config.resource_url(resource.path())?))
	}

	/// Source reading from an explicit URL.
	pub fn from_url(client: ReqwestHttpClient, resource: impl Into<String>, url: Url) -> Self {
		Self { client, resource: resource.into(), url, credentials: None, _item: PhantomData }
	}

	/// Sends the stored credential as a bearer token.
	pub fn with_credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
		self.credentials = Some(credentials);

		self
	}

	/// Endpoint URL.
	pub fn url(&self) -> &Url {
		&self.url
	}
}
impl<T> CollectionSource<T> for HttpCollectionSource<T>
where
	T: DeserializeOwned + Send,
{
	fn resource(&self) -> &str {
		&self.resource
	}

	fn fetch_all(&self) -> CollectionFuture<'_, T> {
		Box::pin(async move {
			let mut request = self.client.get(self.url.clone()).header(ACCEPT, "application/json");
			let credential =
				self.credentials.as_ref().and_then(|provider| provider.load().ok().flatten());

			if let Some(credential) = credential {
				request = request.bearer_auth(credential.expose());
			}

			let response = request.send().await.map_err(TransportError::from)?;
			let status = response.status();
			let body = response.bytes().await.map_err(TransportError::from)?;

			if !status.is_success() {
				return Err(TransientError::Endpoint {
					resource: self.resource.clone(),
					status: status.as_u16(),
					message: preview(&body),
				}
				.into());
			}

			let paged = parse_envelope::<T>(&self.resource, &body)?;

			#[cfg(feature = "tracing")]
			tracing::debug!(
				resource = %self.resource,
				items = paged.items.len(),
				server_total_pages = ?paged.page.total_pages,
				"collection fetched; server paging metadata not used for client pagination"
			);

			Ok(paged.items)
		})
	}
}
impl<T> Debug for HttpCollectionSource<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpCollectionSource")
			.field("resource", &self.resource)
			.field("url", &self.url.as_str())
			.field("authenticated", &self.credentials.is_some())
			.finish()
	}
}

fn preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.into_owned();
	}

	let mut buf: String = text.chars().take(BODY_PREVIEW_LIMIT).collect();

	buf.push('…');

	buf
}
