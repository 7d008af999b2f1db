//! Client-level error types for configuration, request construction, and transports.
//!
//! Verb operations on [`ApiClient`](crate::ApiClient) never return these directly; they are
//! classified into [`ApiResponse`](crate::ApiResponse) failures at each fallible boundary.
//! Constructors and transports surface them as regular `Result` values.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public constructors.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request could not be built.
	#[error(transparent)]
	Request(#[from] RequestError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration and validation failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The environment variable holding the API base URL is unset or blank.
	#[error("Environment variable `{var}` is not set.")]
	MissingBaseUrl {
		/// Name of the variable that was read.
		var: String,
	},
	/// The API base URL cannot be parsed.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Raw value that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The API base URL uses a scheme other than HTTP(S).
	#[error("Base URL `{url}` must use http or https.")]
	UnsupportedScheme {
		/// Raw value that failed validation.
		url: String,
	},
	/// The refresh endpoint path is empty or absolute.
	#[error("Refresh path `{path}` must be a non-empty relative path.")]
	InvalidRefreshPath {
		/// Rejected path.
		path: String,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
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

/// Failures raised while turning a request descriptor into an outbound request.
#[derive(Debug, ThisError)]
pub enum RequestError {
	/// The joined base URL and path do not form a valid URL.
	#[error("Request URL `{url}` is invalid.")]
	InvalidUrl {
		/// URL string that failed to parse.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The JSON body could not be serialized.
	#[error("Request body could not be serialized to JSON.")]
	Body(#[from] serde_json::Error),
}

/// Transport-level failures (network, timeout, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The attempt exceeded the configured timeout.
	#[error("The API call timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}

	/// Returns a stable label suitable for span or log fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Network { .. } => "network",
			Self::Timeout { .. } => "timeout",
			Self::Io(_) => "io",
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn transport_error_converts_into_client_error_with_source() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
		let error: Error = TransportError::from(io).into();

		assert!(matches!(error, Error::Transport(TransportError::Io(_))));

		let source = StdError::source(&error)
			.expect("Transparent transport error should expose the I/O error as its source.");

		assert_eq!(source.to_string(), "refused");
	}

	#[test]
	fn config_error_messages_name_the_offending_value() {
		let err = ConfigError::InvalidRefreshPath { path: String::new() };

		assert_eq!(err.to_string(), "Refresh path `` must be a non-empty relative path.");

		let err = ConfigError::MissingBaseUrl { var: "PUBLIC_API_URL".into() };

		assert!(err.to_string().contains("PUBLIC_API_URL"));
	}
}
