//! Caller-visible feedback for the current dispatch.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

/// Loading/error/success state of one dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchState {
    pub loading: bool,
    #[serde(rename = "error")]
    pub last_error: Option<String>,
    #[serde(rename = "success")]
    pub last_success_message: Option<String>,
}

/// Reactive holder of a [`DispatchState`].
///
/// Only mirrors what the orchestrator hands it. Subscribers see every
/// transition through a `watch` channel.
///
/// Dispatches sharing one holder are counted: `loading` stays true until
/// the last of them ends, and a dispatch that starts while others are in
/// flight leaves their messages alone. The latest outcome wins.
#[derive(Debug)]
pub struct FeedbackState {
    tx: watch::Sender<DispatchState>,
    // Only touched inside `send_modify`, which serializes the updates.
    in_flight: AtomicUsize,
}

/// Marks one dispatch as in flight; dropping it ends the dispatch.
///
/// Dropping covers every exit: normal return, panic, or the dispatch
/// future being dropped before completion.
#[must_use = "the dispatch ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct InFlight<'a> {
    feedback: &'a FeedbackState,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.feedback.finish();
    }
}

impl Default for FeedbackState {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(DispatchState::default());
        Self {
            tx,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// A dispatch started: loading, and previous messages cleared unless
    /// another dispatch is still running.
    pub fn begin(&self) -> InFlight<'_> {
        self.tx.send_modify(|state| {
            let others = self.in_flight.fetch_add(1, Ordering::SeqCst);
            state.loading = true;
            if others == 0 {
                state.last_error = None;
                state.last_success_message = None;
            }
        });
        InFlight { feedback: self }
    }

    pub fn succeed(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_modify(|state| {
            state.last_error = None;
            state.last_success_message = Some(message);
        });
    }

    pub fn fail(&self, error: impl Into<String>) {
        let error = error.into();
        self.tx.send_modify(|state| {
            state.last_success_message = None;
            state.last_error = Some(error);
        });
    }

    fn finish(&self) {
        self.tx.send_modify(|state| {
            let remaining = self.in_flight.load(Ordering::SeqCst).saturating_sub(1);
            self.in_flight.store(remaining, Ordering::SeqCst);
            state.loading = remaining > 0;
        });
    }

    /// Drop both messages. Idempotent; `loading` still tracks dispatches
    /// in flight.
    pub fn clear(&self) {
        self.tx.send_modify(|state| {
            state.last_error = None;
            state.last_success_message = None;
        });
    }

    pub fn snapshot(&self) -> DispatchState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DispatchState> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let feedback = FeedbackState::new();
        feedback.fail("old error");

        let in_flight = feedback.begin();
        assert_eq!(
            feedback.snapshot(),
            DispatchState {
                loading: true,
                last_error: None,
                last_success_message: None,
            }
        );

        feedback.succeed("Email sent successfully!");
        drop(in_flight);
        let state = feedback.snapshot();
        assert!(!state.loading);
        assert_eq!(state.last_success_message.as_deref(), Some("Email sent successfully!"));
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_clear_twice_equals_clear_once() {
        let feedback = FeedbackState::new();
        {
            let _in_flight = feedback.begin();
            feedback.fail("boom");
        }

        feedback.clear();
        let once = feedback.snapshot();
        feedback.clear();
        let twice = feedback.snapshot();

        assert_eq!(once, DispatchState::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_loading_until_last_dispatch_ends() {
        let feedback = FeedbackState::new();

        let first = feedback.begin();
        let second = feedback.begin();
        feedback.succeed("SMS sent successfully!");
        drop(second);

        let state = feedback.snapshot();
        assert!(state.loading);
        assert_eq!(state.last_success_message.as_deref(), Some("SMS sent successfully!"));

        let third = feedback.begin();
        assert_eq!(
            feedback.snapshot().last_success_message.as_deref(),
            Some("SMS sent successfully!")
        );

        feedback.fail("Failed to send email");
        drop(first);
        drop(third);

        let state = feedback.snapshot();
        assert!(!state.loading);
        assert_eq!(state.last_error.as_deref(), Some("Failed to send email"));
        assert!(state.last_success_message.is_none());
    }

    #[test]
    fn test_guard_ends_dispatch_on_panic() {
        let feedback = FeedbackState::new();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _in_flight = feedback.begin();
            panic!("boom");
        }));

        assert!(outcome.is_err());
        assert!(!feedback.snapshot().loading);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let feedback = FeedbackState::new();
        let mut rx = feedback.subscribe();

        let _in_flight = feedback.begin();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().loading);
    }

    #[test]
    fn test_serialized_field_names() {
        let state = DispatchState {
            loading: false,
            last_error: Some("x".to_string()),
            last_success_message: None,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, serde_json::json!({"loading": false, "error": "x", "success": null}));
    }
}
