//! Typed storefront API client: normalized results, single-flight session refresh, admin list
//! stores, and an in-memory catalog.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod obs;
pub mod refresh;
pub mod request;
pub mod response;
pub mod server;
pub mod store;
pub mod transport;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use request::{QueryValue, RequestBody, RequestOptions};
pub use response::{ApiResponse, Failure, FailureKind, Success, ValidationError};

mod _prelude {
	pub use std::{
		collections::BTreeSet,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use bytes::Bytes;
	pub use http::{HeaderMap, HeaderValue, Method, StatusCode};
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::Result;
}

pub use http;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
