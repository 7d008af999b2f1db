//! Single-flight session refresh.
//!
//! A client owns one [`RefreshGate`]. The first caller that needs a refresh registers a shared
//! future in the gate's slot; every caller that arrives while it is in flight awaits that same
//! future instead of sending another refresh. The check and the registration happen under one
//! synchronous lock with no await in between, and the shared future clears the slot itself the
//! moment the refresh settles, so the next 401 starts an independent refresh.
//!
//! The slot only holds a weak reference. A refresh that every waiter abandoned is dropped with its
//! last handle, and the slot then counts as empty.

mod metrics;

pub use metrics::RefreshMetrics;

// crates.io
use futures::{
	FutureExt,
	future::{BoxFuture, Shared, WeakShared},
};
// self
use crate::_prelude::*;

type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;
type WeakRefresh = WeakShared<BoxFuture<'static, RefreshOutcome>>;

/// Settled result of a refresh call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshOutcome {
	/// The refresh endpoint answered with a success status.
	Renewed,
	/// The refresh endpoint answered with a non-success status.
	Rejected {
		/// Status returned by the refresh endpoint.
		status: StatusCode,
	},
	/// The refresh endpoint could not be reached.
	Unreachable,
}
impl RefreshOutcome {
	/// Returns `true` when the session was renewed and the original call may be retried.
	pub const fn is_renewed(self) -> bool {
		matches!(self, Self::Renewed)
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Renewed => "renewed",
			Self::Rejected { .. } => "rejected",
			Self::Unreachable => "unreachable",
		}
	}
}
impl Display for RefreshOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// How a caller got hold of a [`RefreshHandle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshRole {
	/// The caller registered a new refresh.
	Leader,
	/// The caller joined a refresh already in flight.
	Follower,
}

/// Awaitable share of an in-flight refresh.
pub struct RefreshHandle {
	role: RefreshRole,
	shared: SharedRefresh,
}
impl RefreshHandle {
	/// Whether this handle started the refresh or joined it.
	pub fn role(&self) -> RefreshRole {
		self.role
	}

	/// Waits for the refresh to settle. Every handle of the same refresh sees the same outcome.
	pub async fn outcome(self) -> RefreshOutcome {
		self.shared.await
	}
}
impl Debug for RefreshHandle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshHandle").field("role", &self.role).finish()
	}
}

/// Slot holding at most one in-flight refresh.
#[derive(Clone, Default)]
pub struct RefreshGate {
	slot: Arc<Mutex<Option<WeakRefresh>>>,
}
impl RefreshGate {
	/// Joins the refresh in flight, or registers the future produced by `start` as the new one.
	///
	/// `start` is only invoked when the slot is empty, and it runs while the slot lock is held,
	/// so it must only construct the future, never poll it.
	pub fn join_or_start<F, Fut>(&self, start: F) -> RefreshHandle
	where
		F: FnOnce() -> Fut,
		Fut: 'static + Send + Future<Output = RefreshOutcome>,
	{
		let mut slot = self.slot.lock();

		if let Some(in_flight) = slot.as_ref().and_then(WeakShared::upgrade) {
			return RefreshHandle { role: RefreshRole::Follower, shared: in_flight };
		}

		let release = Arc::clone(&self.slot);
		let refresh = start();
		let shared = async move {
			let outcome = refresh.await;

			*release.lock() = None;

			outcome
		}
		.boxed()
		.shared();

		*slot = shared.downgrade();

		RefreshHandle { role: RefreshRole::Leader, shared }
	}

	/// Returns `true` while a refresh is in flight and someone is still waiting on it.
	pub fn is_refreshing(&self) -> bool {
		self.slot.lock().as_ref().is_some_and(|in_flight| in_flight.upgrade().is_some())
	}
}
impl Debug for RefreshGate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshGate").field("refreshing", &self.is_refreshing()).finish()
	}
}
