//! Stateless reads for server-side rendering.
//!
//! Pages rendered on the server act on behalf of a browser session they do not own, so
//! [`ServerApi`] keeps no cookie jar and never refreshes: it forwards the incoming `Cookie`
//! header verbatim and reports the raw status alongside the decoded body.

// crates.io
use http::header::COOKIE;
// self
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, transport::ReqwestTransport};
use crate::{
	_prelude::*,
	config::ClientConfig,
	obs::{CallSpan, trace_event},
	request::{QueryValue, apply_default_headers, resolve_url},
	response::ParsedBody,
	transport::{ApiTransport, OutboundRequest},
};

/// Status reported when no response was received or the body could not be used.
pub const NO_STATUS: u16 = 0;

/// Result of a server-side read.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerResponse<T> {
	/// Decoded body; `None` for non-success statuses and unusable bodies.
	pub data: Option<T>,
	/// HTTP status, or [`NO_STATUS`] when the call failed or the body did not decode.
	pub status: u16,
}
impl<T> ServerResponse<T> {
	fn empty(status: u16) -> Self {
		Self { data: None, status }
	}

	/// Returns `true` when the server answered 2xx with a usable body.
	pub fn is_ok(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Read-only API access for server-rendered pages.
pub struct ServerApi<C>
where
	C: ?Sized + ApiTransport,
{
	/// Transport used for every outbound call; it must not carry its own cookie jar.
	pub transport: Arc<C>,
	config: Arc<ClientConfig>,
}
impl<C> ServerApi<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a server reader that reuses the caller-provided transport.
	pub fn with_transport(config: ClientConfig, transport: impl Into<Arc<C>>) -> Self {
		Self { transport: transport.into(), config: Arc::new(config) }
	}

	/// Fetches `path`, forwarding `cookie` when present.
	///
	/// Null and empty query values are dropped, like every other call in this crate.
	pub async fn get<T>(
		&self,
		path: &str,
		cookie: Option<&str>,
		params: &[(String, QueryValue)],
	) -> ServerResponse<T>
	where
		T: DeserializeOwned,
	{
		let span = CallSpan::new(&Method::GET, path);

		span.instrument(self.fetch(path, cookie, params)).await
	}

	async fn fetch<T>(
		&self,
		path: &str,
		cookie: Option<&str>,
		params: &[(String, QueryValue)],
	) -> ServerResponse<T>
	where
		T: DeserializeOwned,
	{
		let url = match resolve_url(self.config.base_url(), path, params) {
			Ok(url) => url,
			Err(err) => {
				trace_event!(warn, error = %err, "Server-side request could not be built.");

				return ServerResponse::empty(NO_STATUS);
			},
		};
		let mut headers = HeaderMap::new();

		apply_default_headers(&mut headers, false);

		if let Some(cookie) = cookie.filter(|value| !value.is_empty()) {
			match HeaderValue::from_str(cookie) {
				Ok(value) => {
					headers.insert(COOKIE, value);
				},
				Err(err) => {
					trace_event!(warn, error = %err, "Dropping a malformed Cookie header.");
				},
			}
		}

		let request = OutboundRequest { method: Method::GET, url, headers, body: None };
		let response = match self.transport.execute(request).await {
			Ok(response) => response,
			Err(err) => {
				trace_event!(warn, error = %err, "Server-side call failed.");

				return ServerResponse::empty(NO_STATUS);
			},
		};

		if !response.status.is_success() {
			return ServerResponse::empty(response.status.as_u16());
		}

		match ParsedBody::parse(&response.body) {
			ParsedBody::Json(value) => match serde_path_to_error::deserialize(value) {
				Ok(data) => ServerResponse { data: Some(data), status: response.status.as_u16() },
				Err(err) => {
					trace_event!(
						warn,
						path = %err.path(),
						error = %err.inner(),
						"Server-side body does not match the expected shape."
					);

					ServerResponse::empty(NO_STATUS)
				},
			},
			_ => {
				trace_event!(warn, status = response.status.as_u16(), "Server-side body is not JSON.");

				ServerResponse::empty(NO_STATUS)
			},
		}
	}
}
#[cfg(feature = "reqwest")]
impl ServerApi<ReqwestTransport> {
	/// Creates a server reader backed by a reqwest transport without a cookie store.
	pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
		let transport = ReqwestTransport::stateless(&config)?;

		Ok(Self::with_transport(config, transport))
	}
}
impl<C> Clone for ServerApi<C>
where
	C: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self { transport: Arc::clone(&self.transport), config: Arc::clone(&self.config) }
	}
}
impl<C> Debug for ServerApi<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ServerApi").field("base_url", &self.config.base_url()).finish()
	}
}
