//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};

use nested_routes::routing::{Continuation, PostMiddleware};

/// Ordered, shareable event log.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Post middleware that logs `label` and forwards the payload unchanged.
#[allow(dead_code)]
pub fn logging_post<T>(log: &EventLog, label: &'static str) -> PostMiddleware<T>
where
    T: Send + 'static,
{
    let log = log.clone();
    PostMiddleware::named(label, move |payload: T, next: Continuation<T>| {
        log.push(label);
        next.call(payload);
    })
}
