//! Uniform execution of a single network call.
//!
//! [`ResponseProcessor::process`] is the one place faults are caught. On
//! success it forwards any notifications and returns `data` untouched; on
//! failure it hands the fault to the classifier and returns `None`. Callers
//! therefore cannot tell "server sent no data" from "call failed and the user
//! has been told".

use std::future::Future;
use std::sync::Arc;

use crate::classifier::ErrorClassifier;
use crate::collaborators::{DialogPresenter, NotificationSink, Telemetry};
use crate::envelope::ResponseEnvelope;
use crate::error::Fault;

pub struct ResponseProcessor {
    notifications: Arc<dyn NotificationSink>,
    classifier: ErrorClassifier,
}

impl ResponseProcessor {
    pub fn new(
        notifications: Arc<dyn NotificationSink>,
        dialogs: Arc<dyn DialogPresenter>,
        telemetry: Arc<dyn Telemetry>,
    ) -> Self {
        Self {
            notifications,
            classifier: ErrorClassifier::new(dialogs, telemetry),
        }
    }

    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    /// Dispatch the envelope's notifications, then yield its data.
    pub fn process_response<T>(&self, envelope: ResponseEnvelope<T>) -> Option<T> {
        if let Some(notifications) = &envelope.notifications {
            self.notifications.set_notifications(notifications);
        }
        envelope.data
    }

    /// Run `call`; never propagates its fault.
    pub async fn process<T, F, Fut>(&self, call: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResponseEnvelope<T>, Fault>>,
    {
        match call().await {
            Ok(envelope) => self.process_response(envelope),
            Err(fault) => {
                self.classifier.accept(&fault);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::MessageRef;
    use crate::envelope::Notification;
    use crate::error::FaultKind;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        notifications: Mutex<Vec<Vec<Notification>>>,
        events: Mutex<Vec<String>>,
    }

    impl NotificationSink for Recorder {
        fn set_notifications(&self, notifications: &[Notification]) {
            self.notifications.lock().unwrap().push(notifications.to_vec());
            self.events.lock().unwrap().push("notifications".to_string());
        }
    }

    impl DialogPresenter for Recorder {
        fn show_message(&self, title: MessageRef, _: bool) {
            self.events.lock().unwrap().push(format!("dialog {}", title.key()));
        }
        fn show_messages(&self, title: MessageRef, _: MessageRef, _: bool) {
            self.events.lock().unwrap().push(format!("dialog {}", title.key()));
        }
        fn show_text(&self, _: &str, body: &str, _: bool) {
            self.events.lock().unwrap().push(format!("dialog {body}"));
        }
    }

    impl Telemetry for Recorder {
        fn log_error(&self, message: &str) {
            self.events.lock().unwrap().push(format!("log {message}"));
        }
        fn log_exception(&self, fault: &Fault) {
            self.events.lock().unwrap().push(format!("exception {fault}"));
        }
    }

    fn processor() -> (ResponseProcessor, Arc<Recorder>) {
        let rec = Arc::new(Recorder::default());
        (ResponseProcessor::new(rec.clone(), rec.clone(), rec.clone()), rec)
    }

    fn note(id: &str) -> Notification {
        Notification {
            id: Some(id.to_string()),
            kind: Some("NEW_STUFF".to_string()),
            ..Notification::default()
        }
    }

    #[tokio::test]
    async fn notifications_are_dispatched_once_before_return() {
        let (p, rec) = processor();
        let sent = vec![note("a"), note("b")];
        let envelope = ResponseEnvelope {
            data: Some(7),
            notifications: Some(sent.clone()),
            success: Some(true),
            message: None,
        };
        let data = p.process(move || async move { Ok(envelope) }).await;
        assert_eq!(data, Some(7));
        assert_eq!(*rec.notifications.lock().unwrap(), vec![sent]);
    }

    #[tokio::test]
    async fn notifications_are_dispatched_without_data() {
        let (p, rec) = processor();
        let envelope: ResponseEnvelope<String> = ResponseEnvelope {
            notifications: Some(vec![note("a")]),
            ..ResponseEnvelope::default()
        };
        assert_eq!(p.process(move || async move { Ok(envelope) }).await, None);
        assert_eq!(rec.notifications.lock().unwrap().len(), 1);
    }

    #[test]
    fn absent_notifications_skip_the_sink() {
        let (p, rec) = processor();
        let envelope = ResponseEnvelope {
            data: Some("x".to_string()),
            ..ResponseEnvelope::default()
        };
        assert_eq!(p.process_response(envelope).as_deref(), Some("x"));
        assert!(rec.notifications.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn faults_are_absorbed() {
        let (p, rec) = processor();
        let data: Option<u32> = p
            .process(move || async move {
                Err(Fault::new(
                    "/user",
                    FaultKind::Io {
                        message: "unreachable".to_string(),
                    },
                ))
            })
            .await;
        assert_eq!(data, None);
        assert_eq!(
            *rec.events.lock().unwrap(),
            vec!["dialog network_error_no_network_body"]
        );
    }

    #[tokio::test]
    async fn timeouts_are_absorbed_silently() {
        let (p, rec) = processor();
        let data: Option<u32> = p
            .process(move || async move { Err(Fault::new("/user", FaultKind::Timeout)) })
            .await;
        assert_eq!(data, None);
        assert!(rec.events.lock().unwrap().is_empty());
    }
}
