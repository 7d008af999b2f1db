//! User-facing notifications (toasts) raised by stores when a call fails.

// self
use crate::{_prelude::*, obs::trace_event};

/// Severity of a [`Notification`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
	/// Confirmation of a completed action.
	#[default]
	Success,
	/// A failed action.
	Error,
	/// Neutral information.
	Info,
}
impl NotifyLevel {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			NotifyLevel::Success => "success",
			NotifyLevel::Error => "error",
			NotifyLevel::Info => "info",
		}
	}
}

/// A message meant for the person using the storefront.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Notification {
	/// Message text.
	pub message: String,
	/// Severity.
	#[serde(rename = "type")]
	pub level: NotifyLevel,
}
impl Notification {
	/// Creates a notification.
	pub fn new(message: impl Into<String>, level: NotifyLevel) -> Self {
		Self { message: message.into(), level }
	}
}

/// Sink for [`Notification`]s; the UI layer decides how to display them.
pub trait Notifier
where
	Self: Send + Sync,
{
	/// Delivers one notification.
	fn notify(&self, notification: Notification);

	/// Delivers a success notification.
	fn success(&self, message: &str) {
		self.notify(Notification::new(message, NotifyLevel::Success));
	}

	/// Delivers an error notification.
	fn error(&self, message: &str) {
		self.notify(Notification::new(message, NotifyLevel::Error));
	}

	/// Delivers an informational notification.
	fn info(&self, message: &str) {
		self.notify(Notification::new(message, NotifyLevel::Info));
	}
}
impl<F> Notifier for F
where
	F: Fn(Notification) + Send + Sync,
{
	fn notify(&self, notification: Notification) {
		self(notification)
	}
}

/// Notifier that only logs; used when no UI sink is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;
impl Notifier for TracingNotifier {
	fn notify(&self, notification: Notification) {
		trace_event!(
			info,
			level = notification.level.as_str(),
			message = %notification.message,
			"Notification raised."
		);

		#[cfg(not(feature = "tracing"))]
		{
			let _ = notification;
		}
	}
}
