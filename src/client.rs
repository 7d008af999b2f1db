//! The storefront API client.
//!
//! [`ApiClient`] exposes one operation per HTTP verb. Each resolves the path against the
//! configured base URL, layers the caller's headers over the JSON default, sends the call
//! through its [`ApiTransport`], and normalizes whatever happens into an [`ApiResponse`].
//!
//! A 401 on a first attempt triggers the session refresh protocol: the call joins (or starts)
//! the client's single in-flight refresh, and if the session was renewed the original call is
//! re-issued exactly once. A 401 on that retry, or a failed refresh, is surfaced as a regular
//! [`FailureKind::Unauthorized`](crate::FailureKind::Unauthorized) failure.

// self
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, transport::ReqwestTransport};
use crate::{
	_prelude::*,
	config::ClientConfig,
	obs::{self, CallOutcome, CallSpan, trace_event},
	refresh::{RefreshGate, RefreshMetrics, RefreshOutcome, RefreshRole},
	request::{ApiRequest, RequestBody, RequestOptions, apply_default_headers},
	response::{ApiResponse, Failure, ParsedBody, Success},
	transport::{ApiTransport, OutboundRequest},
};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Whether a dispatch is the caller's original call or its post-refresh replay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attempt {
	First,
	Retry,
}

/// Storefront API facade shared by every caller in the process.
///
/// Cloning is cheap and clones share the transport, the refresh slot, and the refresh
/// metrics. Separately constructed clients never share refresh state.
pub struct ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Transport used for every outbound call, refreshes included.
	pub transport: Arc<C>,
	/// Shared counters for session refresh activity.
	pub refresh_metrics: Arc<RefreshMetrics>,
	config: Arc<ClientConfig>,
	refresh_gate: RefreshGate,
}
impl<C> ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(config: ClientConfig, transport: impl Into<Arc<C>>) -> Self {
		Self {
			transport: transport.into(),
			refresh_metrics: Default::default(),
			config: Arc::new(config),
			refresh_gate: Default::default(),
		}
	}

	/// Configuration this client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Returns `true` while a session refresh is in flight.
	pub fn is_refreshing(&self) -> bool {
		self.refresh_gate.is_refreshing()
	}

	/// Issues a `GET`.
	pub async fn get<T>(&self, path: &str, options: RequestOptions) -> ApiResponse<T>
	where
		T: DeserializeOwned,
	{
		self.send(Method::GET, path, RequestBody::Empty, options).await
	}

	/// Issues a `POST`.
	pub async fn post<T>(
		&self,
		path: &str,
		body: impl Into<RequestBody>,
		options: RequestOptions,
	) -> ApiResponse<T>
	where
		T: DeserializeOwned,
	{
		self.send(Method::POST, path, body.into(), options).await
	}

	/// Issues a `PUT`.
	pub async fn put<T>(
		&self,
		path: &str,
		body: impl Into<RequestBody>,
		options: RequestOptions,
	) -> ApiResponse<T>
	where
		T: DeserializeOwned,
	{
		self.send(Method::PUT, path, body.into(), options).await
	}

	/// Issues a `PATCH`.
	pub async fn patch<T>(
		&self,
		path: &str,
		body: impl Into<RequestBody>,
		options: RequestOptions,
	) -> ApiResponse<T>
	where
		T: DeserializeOwned,
	{
		self.send(Method::PATCH, path, body.into(), options).await
	}

	/// Issues a `DELETE`.
	pub async fn delete<T>(
		&self,
		path: &str,
		body: impl Into<RequestBody>,
		options: RequestOptions,
	) -> ApiResponse<T>
	where
		T: DeserializeOwned,
	{
		self.send(Method::DELETE, path, body.into(), options).await
	}

	/// Issues an arbitrary call; the verb helpers delegate here.
	pub async fn send<T>(
		&self,
		method: Method,
		path: &str,
		body: RequestBody,
		options: RequestOptions,
	) -> ApiResponse<T>
	where
		T: DeserializeOwned,
	{
		let request = ApiRequest::new(method, path, body, options);
		let span = CallSpan::new(&request.method, &request.path);
		let response = span.instrument(self.dispatch(&request)).await;
		let outcome = match &response {
			ApiResponse::Success(_) => CallOutcome::Success,
			ApiResponse::Failure(failure) => CallOutcome::Failure(failure.kind),
		};

		obs::record_call_outcome(&request.method, outcome);

		response
	}

	/// Joins the refresh in flight or starts one, and waits for it to settle.
	///
	/// Calls that hit a 401 do this on their own; callers only need it to renew a session
	/// ahead of time.
	pub async fn refresh_session(&self) -> RefreshOutcome {
		let handle = self.refresh_gate.join_or_start(|| {
			let transport = Arc::clone(&self.transport);
			let metrics = Arc::clone(&self.refresh_metrics);
			let url = self.config.refresh_url();

			metrics.record_started();

			async move {
				let outcome = post_refresh(&*transport, &url).await;

				if outcome.is_renewed() {
					metrics.record_renewed();
				} else {
					metrics.record_failed();
				}

				obs::record_refresh_outcome(outcome);
				trace_event!(info, outcome = outcome.as_str(), "Session refresh settled.");

				outcome
			}
		});

		match handle.role() {
			RefreshRole::Leader => {
				trace_event!(info, "Session rejected; refreshing.");
			},
			RefreshRole::Follower => {
				self.refresh_metrics.record_joined();
				trace_event!(debug, "Joining the session refresh already in flight.");
			},
		}

		handle.outcome().await
	}

	async fn dispatch<T>(&self, request: &ApiRequest) -> ApiResponse<T>
	where
		T: DeserializeOwned,
	{
		let mut attempt = Attempt::First;

		loop {
			let outbound = match request.to_outbound(self.config.base_url()) {
				Ok(outbound) => outbound,
				Err(err) => {
					trace_event!(warn, error = %err, "Request could not be built.");

					return Failure::invalid_request().into();
				},
			};
			let response = match self.transport.execute(outbound).await {
				Ok(response) => response,
				Err(err) => {
					trace_event!(
						warn,
						error = %err,
						cause = err.as_str(),
						"Call failed before a response was received."
					);

					return Failure::connection().into();
				},
			};
			let status = response.status;
			let body = ParsedBody::parse(&response.body);

			if let ParsedBody::Unparsable { len } = &body {
				trace_event!(debug, status = status.as_u16(), len, "Discarding a non-JSON body.");
			}

			if status.is_success() {
				return match body.decode::<T>() {
					Ok(data) => ApiResponse::Success(Success { status, data }),
					Err(err) => {
						trace_event!(
							warn,
							status = status.as_u16(),
							path = %err.path(),
							error = %err.inner(),
							"Response body does not match the expected shape."
						);

						Failure::unexpected_body(status).into()
					},
				};
			}
			if status == StatusCode::UNAUTHORIZED
				&& attempt == Attempt::First
				&& self.refresh_session().await.is_renewed()
			{
				attempt = Attempt::Retry;

				continue;
			}

			return Failure::from_status(status, &body, response.retry_after()).into();
		}
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by a cookie-carrying reqwest transport.
	pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
		let transport = ReqwestTransport::new(&config)?;

		Ok(Self::with_transport(config, transport))
	}

	/// Creates a client whose base URL comes from `PUBLIC_API_URL`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::new(ClientConfig::from_env()?)
	}
}
impl<C> Clone for ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: Arc::clone(&self.transport),
			refresh_metrics: Arc::clone(&self.refresh_metrics),
			config: Arc::clone(&self.config),
			refresh_gate: self.refresh_gate.clone(),
		}
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url())
			.field("refresh_gate", &self.refresh_gate)
			.finish()
	}
}

async fn post_refresh<C>(transport: &C, url: &str) -> RefreshOutcome
where
	C: ?Sized + ApiTransport,
{
	let url = match Url::parse(url) {
		Ok(url) => url,
		Err(err) => {
			trace_event!(warn, error = %err, "Refresh URL is invalid.");

			return RefreshOutcome::Unreachable;
		},
	};
	let mut headers = HeaderMap::new();

	apply_default_headers(&mut headers, false);

	let request = OutboundRequest { method: Method::POST, url, headers, body: None };

	match transport.execute(request).await {
		Ok(response) if response.status.is_success() => RefreshOutcome::Renewed,
		Ok(response) => RefreshOutcome::Rejected { status: response.status },
		Err(err) => {
			trace_event!(warn, error = %err, "Refresh call failed before a response was received.");

			RefreshOutcome::Unreachable
		},
	}
}
