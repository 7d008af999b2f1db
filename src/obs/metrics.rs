// self
use crate::{_prelude::*, obs::CallOutcome, refresh::RefreshOutcome};

/// Records a settled call via the global metrics recorder (when enabled).
pub fn record_call_outcome(method: &Method, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"storefront_client_call_total",
			"method" => method.as_str().to_owned(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (method, outcome);
	}
}

/// Records a settled session refresh via the global metrics recorder (when enabled).
pub fn record_refresh_outcome(outcome: RefreshOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("storefront_client_refresh_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::response::FailureKind;

	#[test]
	fn recorders_are_callable_without_a_global_recorder() {
		record_call_outcome(&Method::GET, CallOutcome::Failure(FailureKind::Connection));
		record_refresh_outcome(RefreshOutcome::Unreachable);
	}
}
