//! Maps a [`Fault`] to exactly one user-facing outcome.
//!
//! # Decision table
//! Evaluated top to bottom, first match wins:
//!
//! | fault                          | outcome                                    |
//! |--------------------------------|--------------------------------------------|
//! | timeout                        | ignored                                    |
//! | socket / TLS                   | dialog: internal error                     |
//! | unknown host / I/O             | dialog: no network                         |
//! | HTTP, `RECEIPT_ALREADY_USED`   | ignored                                    |
//! | HTTP, path `/user/push-devices`| ignored                                    |
//! | HTTP 4xx with display message  | dialog: `""` / display message             |
//! | HTTP 401                       | dialog: authentication title / body        |
//! | other HTTP 4xx                 | ignored                                    |
//! | HTTP 5xx or any other status   | dialog: internal error                     |
//! | malformed payload              | logged                                     |
//! | anything else                  | logged as exception                        |
//!
//! Dialogs for `/groups/.../invite` carry `is_user_input = true` so the UI
//! can reset the invite form.

use std::sync::Arc;

use crate::collaborators::{DialogPresenter, MessageRef, Telemetry};
use crate::envelope::ErrorResponse;
use crate::error::{Fault, FaultKind};

/// Server error message for an in-app purchase receipt that was already redeemed.
pub const RECEIPT_ALREADY_USED: &str = "RECEIPT_ALREADY_USED";

/// Registering a push device the server already knows fails noisily.
pub const PUSH_DEVICES_PATH: &str = "/user/push-devices";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Logged(LogEntry),
    Dialog(Dialog),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Error(String),
    Exception,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub content: DialogContent,
    pub is_user_input: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogContent {
    Message(MessageRef),
    Messages { title: MessageRef, body: MessageRef },
    Text { title: String, body: String },
}

/// Whether a failing path belongs to a form the user is still filling in.
pub fn is_user_input_path(path: &str) -> bool {
    path.starts_with("/groups") && path.ends_with("invite")
}

fn json_error(path: &str, message: &str) -> String {
    format!("Json Error: {path},  {message}")
}

pub struct ErrorClassifier {
    dialogs: Arc<dyn DialogPresenter>,
    telemetry: Arc<dyn Telemetry>,
}

impl ErrorClassifier {
    pub fn new(dialogs: Arc<dyn DialogPresenter>, telemetry: Arc<dyn Telemetry>) -> Self {
        Self { dialogs, telemetry }
    }

    /// Decide what to do with `fault`. Has no side effects; an undecodable
    /// HTTP error body is only reported to telemetry by [`Self::accept`].
    pub fn classify(&self, fault: &Fault) -> Outcome {
        evaluate(fault).0
    }

    /// Classify `fault` and hand the outcome to the matching collaborator.
    pub fn accept(&self, fault: &Fault) {
        let (outcome, decode_error) = evaluate(fault);
        if let Some(line) = decode_error {
            self.telemetry.log_error(&line);
        }
        tracing::debug!(path = %fault.path, error = %fault.kind, ?outcome, "Classified API fault");
        match outcome {
            Outcome::Ignored => {}
            Outcome::Logged(LogEntry::Error(message)) => self.telemetry.log_error(&message),
            Outcome::Logged(LogEntry::Exception) => self.telemetry.log_exception(fault),
            Outcome::Dialog(Dialog {
                content,
                is_user_input,
            }) => match content {
                DialogContent::Message(title) => self.dialogs.show_message(title, is_user_input),
                DialogContent::Messages { title, body } => {
                    self.dialogs.show_messages(title, body, is_user_input)
                }
                DialogContent::Text { title, body } => {
                    self.dialogs.show_text(&title, &body, is_user_input)
                }
            },
        }
    }
}

/// The outcome, plus the telemetry line for an error body that failed to
/// decode (the empty `ErrorResponse` is used in its place).
fn evaluate(fault: &Fault) -> (Outcome, Option<String>) {
    let is_user_input = is_user_input_path(&fault.path);
    let dialog = |content| {
        Outcome::Dialog(Dialog {
            content,
            is_user_input,
        })
    };
    let mut decode_error = None;

    let outcome = match &fault.kind {
        FaultKind::Timeout => Outcome::Ignored,
        FaultKind::Socket { .. } | FaultKind::Tls { .. } => {
            dialog(DialogContent::Message(MessageRef::InternalErrorApi))
        }
        FaultKind::UnknownHost { .. } | FaultKind::Io { .. } => {
            dialog(DialogContent::Message(MessageRef::NetworkErrorNoNetworkBody))
        }
        FaultKind::Http { status, body } => {
            let res = ErrorResponse::decode(body).unwrap_or_else(|e| {
                decode_error = Some(json_error(&fault.path, &e.to_string()));
                ErrorResponse::default()
            });
            if res.message.as_deref() == Some(RECEIPT_ALREADY_USED)
                || fault.path.ends_with(PUSH_DEVICES_PATH)
            {
                Outcome::Ignored
            } else {
                match *status {
                    400..=499 => {
                        if !res.display_message().is_empty() {
                            dialog(DialogContent::Text {
                                title: String::new(),
                                body: res.display_message().to_string(),
                            })
                        } else if *status == 401 {
                            dialog(DialogContent::Messages {
                                title: MessageRef::AuthenticationErrorTitle,
                                body: MessageRef::AuthenticationErrorBody,
                            })
                        } else {
                            Outcome::Ignored
                        }
                    }
                    _ => dialog(DialogContent::Message(MessageRef::InternalErrorApi)),
                }
            }
        }
        FaultKind::Payload { message } => {
            Outcome::Logged(LogEntry::Error(json_error(&fault.path, message)))
        }
        FaultKind::Unclassified { .. } => Outcome::Logged(LogEntry::Exception),
    };
    (outcome, decode_error)
}
