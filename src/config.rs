//! Client configuration: API origin, refresh endpoint, and per-attempt timeout.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable read by [`ClientConfig::from_env`].
pub const BASE_URL_ENV: &str = "PUBLIC_API_URL";
/// Default path of the session refresh endpoint.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";
/// Default upper bound for a single HTTP attempt.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Deployment-level settings shared by every call a client makes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	base_url: String,
	refresh_path: String,
	timeout: Option<StdDuration>,
	user_agent: Option<String>,
}
impl ClientConfig {
	/// Validates `base_url` and builds a config with default refresh path and timeout.
	///
	/// A single trailing slash is trimmed so `{base}{path}` never produces `//`.
	pub fn new(base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
		let raw = base_url.as_ref().trim();
		let parsed = Url::parse(raw)
			.map_err(|source| ConfigError::InvalidBaseUrl { url: raw.to_owned(), source })?;

		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { url: raw.to_owned() });
		}

		Ok(Self {
			base_url: raw.strip_suffix('/').unwrap_or(raw).to_owned(),
			refresh_path: DEFAULT_REFRESH_PATH.to_owned(),
			timeout: Some(DEFAULT_TIMEOUT),
			user_agent: None,
		})
	}

	/// Reads the base URL from [`BASE_URL_ENV`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_env_var(BASE_URL_ENV)
	}

	/// Reads the base URL from the named environment variable.
	pub fn from_env_var(var: &str) -> Result<Self, ConfigError> {
		match std::env::var(var) {
			Ok(value) if !value.trim().is_empty() => Self::new(value),
			_ => Err(ConfigError::MissingBaseUrl { var: var.to_owned() }),
		}
	}

	/// Overrides the session refresh endpoint path (defaults to `/auth/refresh`).
	pub fn with_refresh_path(mut self, path: impl Into<String>) -> Result<Self, ConfigError> {
		let path = path.into();
		let trimmed = path.trim();

		if trimmed.is_empty() || trimmed == "/" || trimmed.contains("://") {
			return Err(ConfigError::InvalidRefreshPath { path });
		}

		self.refresh_path =
			if trimmed.starts_with('/') { trimmed.to_owned() } else { format!("/{trimmed}") };

		Ok(self)
	}

	/// Overrides the per-attempt timeout; `None` lets attempts run until the transport gives up.
	pub fn with_timeout(mut self, timeout: Option<StdDuration>) -> Self {
		self.timeout = timeout;

		self
	}

	/// Sets a `User-Agent` header for transports built from this config.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// API origin without a trailing slash.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Refresh endpoint path, always starting with `/`.
	pub fn refresh_path(&self) -> &str {
		&self.refresh_path
	}

	/// Absolute URL of the refresh endpoint.
	pub fn refresh_url(&self) -> String {
		format!("{}{}", self.base_url, self.refresh_path)
	}

	/// Per-attempt timeout, if any.
	pub fn timeout(&self) -> Option<StdDuration> {
		self.timeout
	}

	/// Configured user agent, if any.
	pub fn user_agent(&self) -> Option<&str> {
		self.user_agent.as_deref()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn base_url_trailing_slash_is_trimmed() {
		let config = ClientConfig::new("https://api.example.com/v1/")
			.expect("Base URL with trailing slash should be accepted.");

		assert_eq!(config.base_url(), "https://api.example.com/v1");
		assert_eq!(config.refresh_url(), "https://api.example.com/v1/auth/refresh");
		assert_eq!(config.timeout(), Some(DEFAULT_TIMEOUT));
	}

	#[test]
	fn invalid_base_urls_are_rejected() {
		let err = ClientConfig::new("not a url").expect_err("Garbage base URL should fail.");

		assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

		let err = ClientConfig::new("ftp://files.example.com")
			.expect_err("Non-HTTP schemes should be rejected.");

		assert!(matches!(err, ConfigError::UnsupportedScheme { .. }));
	}

	#[test]
	fn refresh_path_is_normalized_and_validated() {
		let config = ClientConfig::new("https://api.example.com")
			.expect("Base URL fixture should be valid.")
			.with_refresh_path("session/renew")
			.expect("Relative refresh path should be accepted.");

		assert_eq!(config.refresh_path(), "/session/renew");

		let err = ClientConfig::new("https://api.example.com")
			.expect("Base URL fixture should be valid.")
			.with_refresh_path("https://elsewhere.example.com/refresh")
			.expect_err("Absolute refresh URLs should be rejected.");

		assert!(matches!(err, ConfigError::InvalidRefreshPath { .. }));
	}

	#[test]
	fn missing_env_var_reports_variable_name() {
		let err = ClientConfig::from_env_var("STOREFRONT_CLIENT_TEST_UNSET_VAR")
			.expect_err("Unset variable should fail.");

		assert!(
			matches!(err, ConfigError::MissingBaseUrl { ref var } if var == "STOREFRONT_CLIENT_TEST_UNSET_VAR")
		);
	}
}
