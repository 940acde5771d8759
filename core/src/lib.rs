//! Async client core for the Habitica API.
//!
//! # Overview
//! Every endpoint answers with a JSON envelope (`success`, `data`,
//! `notifications`, `message`). The client executes a call, forwards any
//! notifications to the host application and returns `data`, or, when the
//! call fails, classifies the failure and shows the user at most one dialog.
//! Failures never reach the caller: they collapse into `None` or a default.
//!
//! # Design
//! - `TransportBinding` owns the current reqwest client and rebuilds it
//!   atomically when the server address or credentials change.
//! - `ResponseProcessor` is the single place faults are absorbed.
//! - `ErrorClassifier` is an ordered decision table over a closed `FaultKind`.
//! - Dialogs, notifications and telemetry are host-provided trait objects.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod call;
pub mod classifier;
pub mod client;
pub mod collaborators;
pub mod config;
mod endpoints;
pub mod envelope;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use call::ResponseProcessor;
pub use classifier::{Dialog, DialogContent, ErrorClassifier, LogEntry, Outcome};
pub use client::ApiClient;
pub use collaborators::{DialogPresenter, MessageRef, NotificationSink, Telemetry};
pub use config::{CredentialStore, HostConfig, HttpLogLevel, KeyCipher, TransportSettings};
pub use envelope::{Ack, ErrorResponse, Notification, ResponseEnvelope};
pub use error::{ConfigError, Fault, FaultKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Route};
pub use transport::{TransportBinding, TransportHandle};
