//! Request descriptors: query parameters, bodies, header overrides, and URL resolution.

// crates.io
use http::header::{CONTENT_TYPE, HeaderName};
// self
use crate::{_prelude::*, error::RequestError, transport::OutboundRequest};

/// Content type applied to every non-form request that does not set one.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A single query parameter value.
///
/// [`QueryValue::Null`] and empty strings are dropped from the final URL. Integers, booleans,
/// and ordinary floats render as a browser would stringify them (`2.0` becomes `2`, `true`
/// stays `true`); floats never use exponent notation, so `1e21` renders as
/// `1000000000000000000000` rather than `1e+21`.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
	/// Text value.
	Str(String),
	/// Signed integer value.
	Int(i64),
	/// Unsigned integer value.
	UInt(u64),
	/// Floating point value.
	Float(f64),
	/// Boolean value.
	Bool(bool),
	/// Absent value; never rendered.
	Null,
}
impl QueryValue {
	/// Returns the rendered value, or `None` when the parameter must be omitted.
	pub fn render(&self) -> Option<String> {
		match self {
			Self::Str(value) if value.is_empty() => None,
			Self::Str(value) => Some(value.clone()),
			Self::Int(value) => Some(value.to_string()),
			Self::UInt(value) => Some(value.to_string()),
			Self::Float(value) => Some(render_float(*value)),
			Self::Bool(value) => Some(value.to_string()),
			Self::Null => None,
		}
	}
}
impl From<&str> for QueryValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_owned())
	}
}
impl From<String> for QueryValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}
impl From<&String> for QueryValue {
	fn from(value: &String) -> Self {
		Self::Str(value.clone())
	}
}
impl From<bool> for QueryValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}
impl From<f32> for QueryValue {
	fn from(value: f32) -> Self {
		Self::Float(f64::from(value))
	}
}
impl From<f64> for QueryValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}
impl<T> From<Option<T>> for QueryValue
where
	T: Into<QueryValue>,
{
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

macro_rules! impl_query_int {
	($variant:ident, $target:ty; $($ty:ty),+) => {
		$(
			impl From<$ty> for QueryValue {
				fn from(value: $ty) -> Self {
					Self::$variant(<$target>::from(value))
				}
			}
		)+
	};
}
impl_query_int!(Int, i64; i8, i16, i32, i64);
impl_query_int!(UInt, u64; u8, u16, u32, u64);

impl From<usize> for QueryValue {
	fn from(value: usize) -> Self {
		Self::UInt(u64::try_from(value).unwrap_or(u64::MAX))
	}
}

/// Body attached to a mutating call.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
	/// No body is sent.
	#[default]
	Empty,
	/// Structured payload, serialized to JSON text on the wire.
	Json(Value),
	/// Pre-encoded payload (multipart, binary) passed through untouched.
	///
	/// Pair with [`RequestOptions::form_data`] and set the matching `Content-Type` header.
	Raw(Bytes),
}
impl RequestBody {
	/// Serializes `body` into a JSON payload.
	pub fn json<B>(body: &B) -> Result<Self, RequestError>
	where
		B: ?Sized + Serialize,
	{
		Ok(Self::Json(serde_json::to_value(body)?))
	}

	/// Wraps pre-encoded bytes.
	pub fn raw(bytes: impl Into<Bytes>) -> Self {
		Self::Raw(bytes.into())
	}

	/// Encodes the body for the wire. `Bytes` clones are cheap, so retries replay the same
	/// payload.
	pub(crate) fn encode(&self) -> Result<Option<Bytes>, RequestError> {
		match self {
			Self::Empty => Ok(None),
			Self::Json(value) => Ok(Some(Bytes::from(serde_json::to_vec(value)?))),
			Self::Raw(bytes) => Ok(Some(bytes.clone())),
		}
	}
}
impl From<Value> for RequestBody {
	fn from(value: Value) -> Self {
		Self::Json(value)
	}
}
impl From<Bytes> for RequestBody {
	fn from(value: Bytes) -> Self {
		Self::Raw(value)
	}
}

/// Per-call options layered on top of the client defaults.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
	/// Ordered query parameters.
	pub params: Vec<(String, QueryValue)>,
	/// Header overrides; these win over the client defaults.
	pub headers: HeaderMap,
	/// Skips the default JSON `Content-Type` when true.
	pub form_data: bool,
}
impl RequestOptions {
	/// Creates empty options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a query parameter.
	pub fn param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
		self.params.push((key.into(), value.into()));

		self
	}

	/// Appends several query parameters in iteration order.
	pub fn params<I, K, V>(mut self, params: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<QueryValue>,
	{
		self.params.extend(params.into_iter().map(|(key, value)| (key.into(), value.into())));

		self
	}

	/// Sets a header override, replacing any previous value for `name`.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Marks the body as pre-encoded form data.
	pub fn form_data(mut self) -> Self {
		self.form_data = true;

		self
	}
}

/// A complete call as issued by the client: verb, target, body, and options.
#[derive(Clone, Debug)]
pub(crate) struct ApiRequest {
	pub(crate) method: Method,
	pub(crate) path: String,
	pub(crate) body: RequestBody,
	pub(crate) options: RequestOptions,
}
impl ApiRequest {
	pub(crate) fn new(
		method: Method,
		path: impl Into<String>,
		body: RequestBody,
		options: RequestOptions,
	) -> Self {
		Self { method, path: path.into(), body, options }
	}

	/// Resolves the URL, merges headers, and encodes the body.
	pub(crate) fn to_outbound(&self, base_url: &str) -> Result<OutboundRequest, RequestError> {
		let url = resolve_url(base_url, &self.path, &self.options.params)?;
		let mut headers = self.options.headers.clone();

		apply_default_headers(&mut headers, self.options.form_data);

		Ok(OutboundRequest { method: self.method.clone(), url, headers, body: self.body.encode()? })
	}
}

/// Joins `path` onto `base_url` (or takes an absolute `http(s)://` path verbatim) and appends
/// every renderable query parameter in order.
pub fn resolve_url(
	base_url: &str,
	path: &str,
	params: &[(String, QueryValue)],
) -> Result<Url, RequestError> {
	let raw = if is_absolute(path) {
		path.to_owned()
	} else if path.starts_with('/') {
		format!("{base_url}{path}")
	} else {
		format!("{base_url}/{path}")
	};
	let mut url =
		Url::parse(&raw).map_err(|source| RequestError::InvalidUrl { url: raw.clone(), source })?;
	let mut kept =
		params.iter().filter_map(|(key, value)| value.render().map(|value| (key, value))).peekable();

	if kept.peek().is_some() {
		let mut pairs = url.query_pairs_mut();

		for (key, value) in kept {
			pairs.append_pair(key, &value);
		}
	}

	Ok(url)
}

/// Sets `Content-Type: application/json` unless the call is form data or already has one.
pub fn apply_default_headers(headers: &mut HeaderMap, form_data: bool) {
	if !form_data && !headers.contains_key(CONTENT_TYPE) {
		headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
	}
}

fn is_absolute(path: &str) -> bool {
	path.starts_with("http://") || path.starts_with("https://")
}

fn render_float(value: f64) -> String {
	if value.is_nan() {
		"NaN".into()
	} else if value.is_infinite() {
		if value.is_sign_positive() { "Infinity".into() } else { "-Infinity".into() }
	} else {
		value.to_string()
	}
}
