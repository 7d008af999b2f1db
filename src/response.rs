//! Normalized call results and the body interpretation rules behind them.
//!
//! Every client operation resolves to an [`ApiResponse`]: either a [`Success`] carrying the
//! decoded body, or a [`Failure`] carrying a user-facing message and, when the server supplied
//! them, field-level [`ValidationError`]s. Nothing in this module panics or returns `Err` to a
//! caller of the verbs; each fallible boundary is classified into a [`FailureKind`].

// self
use crate::_prelude::*;

/// Message reported when the request never reached the server or the response was lost.
pub const CONNECTION_ERROR_MESSAGE: &str = "Erro de conexão. Verifique sua internet.";
/// Message reported when a failed response carries no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Ocorreu um erro ao processar a requisição.";
/// Message reported when a successful response does not match the expected shape.
pub const UNEXPECTED_BODY_MESSAGE: &str = "Resposta inesperada do servidor.";
/// Message reported when the request could not be built locally.
pub const INVALID_REQUEST_MESSAGE: &str = "Não foi possível montar a requisição.";

/// A field-level validation entry supplied by the server.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
	/// Name of the offending request field.
	pub param: String,
	/// Human-readable description of the problem.
	pub message: String,
}
impl ValidationError {
	/// Creates a validation entry.
	pub fn new(param: impl Into<String>, message: impl Into<String>) -> Self {
		Self { param: param.into(), message: message.into() }
	}
}

/// Classification of a [`Failure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
	/// The call could not be sent or its response could not be received.
	Connection,
	/// The request could not be built (bad URL, unserializable body).
	InvalidRequest,
	/// The server answered 401 and the session could not be renewed.
	Unauthorized,
	/// The server answered with another non-success status.
	Status,
	/// The server answered successfully with a body that does not match the expected type.
	UnexpectedBody,
}
impl FailureKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FailureKind::Connection => "connection",
			FailureKind::InvalidRequest => "invalid_request",
			FailureKind::Unauthorized => "unauthorized",
			FailureKind::Status => "status",
			FailureKind::UnexpectedBody => "unexpected_body",
		}
	}
}
impl Display for FailureKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Successful outcome of a call.
#[derive(Clone, Debug, PartialEq)]
pub struct Success<T> {
	/// HTTP status of the final attempt.
	pub status: StatusCode,
	/// Decoded body; `None` when the body was empty, not JSON, or JSON `null`.
	pub data: Option<T>,
}

/// Failed outcome of a call.
#[derive(Clone, Debug, PartialEq)]
pub struct Failure {
	/// Failure classification.
	pub kind: FailureKind,
	/// Non-empty, user-facing message.
	pub message: String,
	/// Field-level validation entries.
	///
	/// `Some(vec![])` for connection failures, `Some(entries)` when the server supplied a
	/// well-formed `errors` array, `None` otherwise.
	pub errors: Option<Vec<ValidationError>>,
	/// HTTP status of the final attempt, when a response was received.
	pub status: Option<StatusCode>,
	/// `Retry-After` hint from the server, if supplied.
	pub retry_after: Option<Duration>,
}
impl Failure {
	/// Failure for a call that never produced a response.
	pub fn connection() -> Self {
		Self {
			kind: FailureKind::Connection,
			message: CONNECTION_ERROR_MESSAGE.into(),
			errors: Some(Vec::new()),
			status: None,
			retry_after: None,
		}
	}

	/// Failure for a call that could not be built.
	pub fn invalid_request() -> Self {
		Self {
			kind: FailureKind::InvalidRequest,
			message: INVALID_REQUEST_MESSAGE.into(),
			errors: None,
			status: None,
			retry_after: None,
		}
	}

	/// Failure for a successful status whose body has the wrong shape.
	pub fn unexpected_body(status: StatusCode) -> Self {
		Self {
			kind: FailureKind::UnexpectedBody,
			message: UNEXPECTED_BODY_MESSAGE.into(),
			errors: None,
			status: Some(status),
			retry_after: None,
		}
	}

	/// Interprets a non-success response body.
	///
	/// The message is the body's non-empty `message` field, else the body itself when it is a
	/// non-empty JSON string, else [`GENERIC_ERROR_MESSAGE`]; an `error` field is never used.
	/// `errors` is taken from a well-formed `errors` array.
	pub fn from_status(
		status: StatusCode,
		body: &ParsedBody,
		retry_after: Option<Duration>,
	) -> Self {
		let json = body.as_json();
		let kind = if status == StatusCode::UNAUTHORIZED {
			FailureKind::Unauthorized
		} else {
			FailureKind::Status
		};

		Self {
			kind,
			message: error_message(json).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.into()),
			errors: validation_errors(json),
			status: Some(status),
			retry_after,
		}
	}
}
impl Display for Failure {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.message)
	}
}

/// Outcome of every client operation.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiResponse<T> {
	/// The server answered with a success status.
	Success(Success<T>),
	/// Anything else.
	Failure(Failure),
}
impl<T> ApiResponse<T> {
	/// Returns `true` for [`ApiResponse::Success`].
	pub fn is_ok(&self) -> bool {
		matches!(self, Self::Success(_))
	}

	/// Returns the failure message, or `""` on success.
	pub fn message(&self) -> &str {
		match self {
			Self::Success(_) => "",
			Self::Failure(failure) => &failure.message,
		}
	}

	/// Returns the decoded body, if any.
	pub fn data(&self) -> Option<&T> {
		match self {
			Self::Success(success) => success.data.as_ref(),
			Self::Failure(_) => None,
		}
	}

	/// Returns validation entries of a failure, if any.
	pub fn errors(&self) -> Option<&[ValidationError]> {
		match self {
			Self::Success(_) => None,
			Self::Failure(failure) => failure.errors.as_deref(),
		}
	}

	/// Returns the failure, if any.
	pub fn failure(&self) -> Option<&Failure> {
		match self {
			Self::Success(_) => None,
			Self::Failure(failure) => Some(failure),
		}
	}

	/// Returns the status of the final attempt, if a response was received.
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			Self::Success(success) => Some(success.status),
			Self::Failure(failure) => failure.status,
		}
	}

	/// Converts into a standard `Result`.
	pub fn into_result(self) -> Result<Option<T>, Failure> {
		match self {
			Self::Success(success) => Ok(success.data),
			Self::Failure(failure) => Err(failure),
		}
	}

	/// Maps the decoded body.
	pub fn map<U, F>(self, f: F) -> ApiResponse<U>
	where
		F: FnOnce(T) -> U,
	{
		match self {
			Self::Success(Success { status, data }) =>
				ApiResponse::Success(Success { status, data: data.map(f) }),
			Self::Failure(failure) => ApiResponse::Failure(failure),
		}
	}
}
impl<T> From<Failure> for ApiResponse<T> {
	fn from(failure: Failure) -> Self {
		Self::Failure(failure)
	}
}

/// A response body after defensive parsing.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedBody {
	/// The body was empty.
	Empty,
	/// The body decoded as JSON.
	Json(Value),
	/// The body was non-empty but not valid JSON; treated as absent.
	Unparsable {
		/// Byte length of the discarded body.
		len: usize,
	},
}
impl ParsedBody {
	/// Reads the raw body as text and decodes it as JSON when non-empty and well-formed.
	pub fn parse(raw: &[u8]) -> Self {
		if raw.is_empty() {
			return Self::Empty;
		}

		let text = String::from_utf8_lossy(raw);

		match serde_json::from_str(&text) {
			Ok(value) => Self::Json(value),
			Err(_) => Self::Unparsable { len: raw.len() },
		}
	}

	/// Returns the decoded JSON, if any.
	pub fn as_json(&self) -> Option<&Value> {
		match self {
			Self::Json(value) => Some(value),
			_ => None,
		}
	}

	/// Decodes the body into `T`; absent bodies and JSON `null` yield `None`.
	pub fn decode<T>(self) -> Result<Option<T>, serde_path_to_error::Error<serde_json::Error>>
	where
		T: DeserializeOwned,
	{
		match self {
			Self::Json(Value::Null) | Self::Empty | Self::Unparsable { .. } => Ok(None),
			Self::Json(value) => serde_path_to_error::deserialize(value).map(Some),
		}
	}
}

fn error_message(body: Option<&Value>) -> Option<String> {
	match body? {
		Value::Object(map) => map
			.get("message")
			.and_then(Value::as_str)
			.filter(|text| !text.is_empty())
			.map(ToOwned::to_owned),
		Value::String(text) if !text.is_empty() => Some(text.clone()),
		_ => None,
	}
}

fn validation_errors(body: Option<&Value>) -> Option<Vec<ValidationError>> {
	let errors = body?.as_object()?.get("errors")?;

	if !errors.is_array() {
		return None;
	}

	serde_json::from_value(errors.clone()).ok()
}
