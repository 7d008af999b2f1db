//! Transport primitives for storefront API calls.
//!
//! [`ApiTransport`] is the client's only dependency on an HTTP stack. It executes one fully
//! built [`OutboundRequest`] and hands back the raw [`TransportResponse`]; status
//! interpretation, body parsing, and refresh handling all live above it in
//! [`ApiClient`](crate::ApiClient). Tests plug in scripted transports through the same seam.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use http::header::RETRY_AFTER;
use time::format_description::well_known::Rfc2822;
// self
#[cfg(feature = "reqwest")] use crate::{config::ClientConfig, error::ConfigError};
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing storefront API calls.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back a client that is
/// shared across tasks, and so the session refresh future can own an `Arc` of it.
/// Credential handling (cookie jars) is the transport's concern: a transport that models a
/// browser session must replay cookies set by earlier responses.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and returns the status, headers, and fully buffered body.
	///
	/// Only failures that prevent a response from being received are errors; every HTTP
	/// status, including 4xx and 5xx, is an `Ok` response.
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_>;
}

/// A request ready to hit the wire.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// HTTP method.
	pub method: Method,
	/// Fully resolved URL, query string included.
	pub url: Url,
	/// Final header set.
	pub headers: HeaderMap,
	/// Encoded body; `None` sends no body.
	pub body: Option<Bytes>,
}

/// A response as returned by the transport, before any interpretation.
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Bytes,
}
impl TransportResponse {
	/// Builds a response with no headers.
	pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
		Self { status, headers: HeaderMap::new(), body: body.into() }
	}

	/// Parses the `Retry-After` header as a relative duration.
	pub fn retry_after(&self) -> Option<Duration> {
		parse_retry_after(&self.headers)
	}
}

/// [`ApiTransport`] backed by a [`ReqwestClient`].
///
/// [`ReqwestTransport::new`] enables reqwest's cookie store so session cookies issued by login
/// and refresh responses ride along on later calls, the equivalent of a browser's
/// `credentials: "include"`.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a cookie-carrying transport honoring the config's timeout and user agent.
	pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
		Self::build(config, true)
	}

	/// Builds a transport without a cookie store; callers forward cookies explicitly.
	pub fn stateless(config: &ClientConfig) -> Result<Self, ConfigError> {
		Self::build(config, false)
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	fn build(config: &ClientConfig, cookie_store: bool) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder().cookie_store(cookie_store);

		if let Some(timeout) = config.timeout() {
			builder = builder.timeout(timeout);
		}
		if let Some(user_agent) = config.user_agent() {
			builder = builder.user_agent(user_agent);
		}

		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let OutboundRequest { method, url, headers, body } = request;
			let mut builder = self.0.request(method, url).headers(headers);

			if let Some(body) = body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?;

			Ok(TransportResponse { status, headers, body })
		})
	}
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<i64>() {
		return (secs >= 0).then_some(Duration::seconds(secs));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn with_retry_after(value: &'static str) -> TransportResponse {
		let mut response = TransportResponse::new(StatusCode::TOO_MANY_REQUESTS, "");

		response.headers.insert(RETRY_AFTER, HeaderValue::from_static(value));

		response
	}

	#[test]
	fn retry_after_accepts_delta_seconds() {
		assert_eq!(with_retry_after("120").retry_after(), Some(Duration::seconds(120)));
		assert_eq!(with_retry_after("-5").retry_after(), None);
	}

	#[test]
	fn retry_after_accepts_future_http_dates_only() {
		assert_eq!(with_retry_after("Wed, 21 Oct 2015 07:28:00 +0000").retry_after(), None);

		let later = OffsetDateTime::now_utc() + Duration::hours(1);
		let formatted = later.format(&Rfc2822).expect("RFC 2822 formatting should succeed.");
		let mut response = TransportResponse::new(StatusCode::SERVICE_UNAVAILABLE, "");

		response.headers.insert(
			RETRY_AFTER,
			HeaderValue::from_str(&formatted).expect("Formatted date should be a valid header."),
		);

		let delta = response.retry_after().expect("Future dates should produce a delay.");

		assert!(delta > Duration::minutes(59) && delta <= Duration::hours(1));
	}

	#[test]
	fn missing_retry_after_yields_none() {
		assert_eq!(TransportResponse::new(StatusCode::OK, "{}").retry_after(), None);
	}
}
