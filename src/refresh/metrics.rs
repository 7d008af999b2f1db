// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for session refresh activity.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	started: AtomicU64,
	joined: AtomicU64,
	renewed: AtomicU64,
	failed: AtomicU64,
}
impl RefreshMetrics {
	/// Returns the number of refresh calls actually sent.
	pub fn started(&self) -> u64 {
		self.started.load(Ordering::Relaxed)
	}

	/// Returns the number of callers that awaited a refresh already in flight.
	pub fn joined(&self) -> u64 {
		self.joined.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh calls that renewed the session.
	pub fn renewed(&self) -> u64 {
		self.renewed.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh calls that were rejected or unreachable.
	pub fn failed(&self) -> u64 {
		self.failed.load(Ordering::Relaxed)
	}

	pub(crate) fn record_started(&self) {
		self.started.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_joined(&self) {
		self.joined.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_renewed(&self) {
		self.renewed.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failed(&self) {
		self.failed.fetch_add(1, Ordering::Relaxed);
	}
}
