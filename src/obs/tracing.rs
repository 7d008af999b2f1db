// self
use crate::_prelude::*;

/// Future returned by [`CallSpan::instrument`] when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`CallSpan::instrument`] when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by client calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the call's method and path.
	pub fn new(method: &Method, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("storefront_client.call", method = %method, path);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, path);

			Self {}
		}
	}

	/// Runs `fut` inside this span; no guard is held across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallSpan::new(&Method::GET, "/products");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
