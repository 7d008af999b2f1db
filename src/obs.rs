//! Optional observability helpers for client calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit structured spans named `storefront_client.call`
//!   with `method` and `path` fields, plus events for refreshes and degraded outcomes.
//! - Enable `metrics` to increment the `storefront_client_call_total` counter for every settled
//!   call, labeled by `method` + `outcome`, and `storefront_client_refresh_total`, labeled by
//!   `outcome`.

mod metrics;
mod tracing;

pub use self::metrics::*;
pub use self::tracing::*;

// self
use crate::{_prelude::*, response::FailureKind};

/// Emits a `tracing` event when the feature is enabled; expands to nothing otherwise.
macro_rules! trace_event {
	($level:ident, $($arg:tt)+) => {
		#[cfg(feature = "tracing")]
		{
			::tracing::$level!($($arg)+);
		}
	};
}
pub(crate) use trace_event;

/// Outcome labels recorded for each settled call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// The call produced a success response.
	Success,
	/// The call produced a failure of the given kind.
	Failure(FailureKind),
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Success => "success",
			CallOutcome::Failure(kind) => kind.as_str(),
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
