//! Traits for the parts of the app the core hands results to.
//!
//! The UI layer implements [`DialogPresenter`] (and owns "one problem
//! dialog at a time"), the notifications manager implements
//! [`NotificationSink`], and analytics implements [`Telemetry`].

use crate::envelope::Notification;
use crate::error::Fault;

/// Localizable strings the classifier may ask the UI to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRef {
    InternalErrorApi,
    NetworkErrorNoNetworkBody,
    AuthenticationErrorTitle,
    AuthenticationErrorBody,
}

impl MessageRef {
    /// Resource key the UI resolves to a localized string.
    pub fn key(self) -> &'static str {
        match self {
            MessageRef::InternalErrorApi => "internal_error_api",
            MessageRef::NetworkErrorNoNetworkBody => "network_error_no_network_body",
            MessageRef::AuthenticationErrorTitle => "authentication_error_title",
            MessageRef::AuthenticationErrorBody => "authentication_error_body",
        }
    }
}

pub trait NotificationSink: Send + Sync {
    fn set_notifications(&self, notifications: &[Notification]);
}

pub trait DialogPresenter: Send + Sync {
    fn show_message(&self, title: MessageRef, is_user_input: bool);
    fn show_messages(&self, title: MessageRef, body: MessageRef, is_user_input: bool);
    fn show_text(&self, title: &str, body: &str, is_user_input: bool);
}

pub trait Telemetry: Send + Sync {
    fn log_error(&self, message: &str);
    fn log_exception(&self, fault: &Fault);
}

/// Telemetry that only writes `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn log_error(&self, message: &str) {
        tracing::error!(target: "habitica::telemetry", "{message}");
    }

    fn log_exception(&self, fault: &Fault) {
        tracing::error!(target: "habitica::telemetry", path = %fault.path, error = %fault.kind, "Unclassified API failure");
    }
}

/// Sink for headless callers that have nowhere to show notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNotifications;

impl NotificationSink for NoNotifications {
    fn set_notifications(&self, notifications: &[Notification]) {
        tracing::debug!(count = notifications.len(), "Dropping notifications");
    }
}
