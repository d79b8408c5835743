//! Post-action middleware chains.
//!
//! # Responsibilities
//! - Wrap an action so it receives the entry point of its post chain
//! - Run post middleware one at a time, each deferred through the scheduler
//!
//! # Design Decisions
//! - A chain is an immutable step list plus a scheduler; a `Continuation` is a
//!   cursor into it, so a chain instance carries no per-request state
//! - Step `i + 1` is only deferred from inside step `i`, when it calls its continuation
//! - The entry point handed to a running action is gated: a call made while the
//!   action is still running is held and only reaches the scheduler once the
//!   action returns (or its future resolves)
//! - A middleware that drops its continuation ends the chain; nothing reports it
//! - The continuation past the last step is a no-op

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::lifecycle::{Job, Scheduler};

type PostFn<T> = dyn Fn(T, Continuation<T>) + Send + Sync;

/// A middleware run after the action, handed the payload and the next continuation.
pub struct PostMiddleware<T> {
    name: Option<Arc<str>>,
    f: Arc<PostFn<T>>,
}

impl<T> PostMiddleware<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(T, Continuation<T>) + Send + Sync + 'static,
    {
        Self { name: None, f: Arc::new(f) }
    }

    /// A middleware with a display name for logs and inspection.
    pub fn named<F>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(T, Continuation<T>) + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }

    pub fn call(&self, payload: T, next: Continuation<T>) {
        (self.f)(payload, next)
    }
}

impl<T> Clone for PostMiddleware<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for PostMiddleware<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PostMiddleware").field(&self.name()).finish()
    }
}

struct ChainInner<T> {
    steps: Vec<PostMiddleware<T>>,
    scheduler: Arc<dyn Scheduler>,
}

/// Ordered post middleware bound to a scheduler.
pub struct PostChain<T> {
    inner: Arc<ChainInner<T>>,
}

impl<T> PostChain<T> {
    pub fn new(steps: Vec<PostMiddleware<T>>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            inner: Arc::new(ChainInner { steps, scheduler }),
        }
    }

    /// The continuation that starts the chain.
    ///
    /// For an empty chain this is already terminal.
    pub fn entry(&self) -> Continuation<T> {
        Continuation {
            chain: Arc::clone(&self.inner),
            position: 0,
            gate: None,
        }
    }

    /// An entry point whose first step is held until the guard is released.
    ///
    /// Dropping the guard releases it too.
    pub fn held_entry(&self) -> (Continuation<T>, EntryGuard) {
        let gate = Arc::new(Gate::holding());
        let entry = Continuation {
            chain: Arc::clone(&self.inner),
            position: 0,
            gate: Some(Arc::clone(&gate)),
        };
        let guard = EntryGuard {
            gate,
            scheduler: Arc::clone(&self.inner.scheduler),
        };
        (entry, guard)
    }

    pub fn len(&self) -> usize {
        self.inner.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.steps.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.steps.iter().map(PostMiddleware::name)
    }
}

impl<T> Clone for PostChain<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for PostChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Jobs held back while an action runs. `None` once released.
struct Gate {
    held: Mutex<Option<Vec<Job>>>,
}

impl Gate {
    fn holding() -> Self {
        Self {
            held: Mutex::new(Some(Vec::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Vec<Job>>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Keep `job` while holding; hand it back once released.
    fn hold(&self, job: Job) -> Option<Job> {
        match self.lock().as_mut() {
            Some(held) => {
                held.push(job);
                None
            }
            None => Some(job),
        }
    }
}

/// Releases a held entry point to the scheduler when dropped.
pub struct EntryGuard {
    gate: Arc<Gate>,
    scheduler: Arc<dyn Scheduler>,
}

impl EntryGuard {
    /// Hand held calls to the scheduler; later calls go straight through.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for EntryGuard {
    fn drop(&mut self) {
        let held = self.gate.lock().take().unwrap_or_default();
        for job in held {
            self.scheduler.defer(job);
        }
    }
}

impl fmt::Debug for EntryGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let held = self.gate.lock().as_ref().map_or(0, Vec::len);
        f.debug_struct("EntryGuard").field("held", &held).finish()
    }
}

/// Handle that triggers the next post middleware.
pub struct Continuation<T> {
    chain: Arc<ChainInner<T>>,
    position: usize,
    gate: Option<Arc<Gate>>,
}

impl<T: Send + 'static> Continuation<T> {
    /// Defer the next middleware with `payload`, or do nothing past the last one.
    pub fn call(&self, payload: T) {
        let Some(step) = self.chain.steps.get(self.position).cloned() else {
            return;
        };
        let next = Continuation {
            chain: Arc::clone(&self.chain),
            position: self.position + 1,
            gate: None,
        };

        tracing::trace!(
            middleware = step.name(),
            position = self.position,
            "Deferring post middleware"
        );
        let job: Job = Box::new(move || step.call(payload, next));
        let job = match &self.gate {
            Some(gate) => gate.hold(job),
            None => Some(job),
        };
        if let Some(job) = job {
            self.chain.scheduler.defer(job);
        }
    }
}

impl<T> Continuation<T> {
    /// True when calling this continuation does nothing.
    pub fn is_terminal(&self) -> bool {
        self.position >= self.chain.steps.len()
    }

    /// Index of the middleware this continuation triggers.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.chain.steps.len().saturating_sub(self.position)
    }
}

impl<T> Clone for Continuation<T> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
            position: self.position,
            gate: self.gate.clone(),
        }
    }
}

impl<T> fmt::Debug for Continuation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Continuation")
            .field("position", &self.position)
            .field("len", &self.chain.steps.len())
            .finish()
    }
}

/// An action callable with a request and the post-chain entry point.
pub trait Action<Req, T>: Send + Sync {
    type Output;

    fn call(&self, req: Req, post: Continuation<T>) -> Self::Output;
}

impl<F, Req, T, O> Action<Req, T> for F
where
    F: Fn(Req, Continuation<T>) -> O + Send + Sync,
{
    type Output = O;

    fn call(&self, req: Req, post: Continuation<T>) -> O {
        self(req, post)
    }
}

/// A route action paired with its post chain.
pub struct WrappedAction<A, T> {
    action: A,
    chain: PostChain<T>,
}

impl<A, T> WrappedAction<A, T> {
    pub fn new(action: A, chain: PostChain<T>) -> Self {
        Self { action, chain }
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn post_chain(&self) -> &PostChain<T> {
        &self.chain
    }

    /// Entry point handed to the action as its trailing argument.
    ///
    /// Ungated; use [`WrappedAction::run`] or [`PostChain::held_entry`] when
    /// the scheduler may run jobs while the action is still executing.
    pub fn post_action(&self) -> Continuation<T> {
        self.chain.entry()
    }

    /// Run `f` with the action and a held entry point, releasing it when `f` returns.
    pub fn run<R>(&self, f: impl FnOnce(&A, Continuation<T>) -> R) -> R {
        let (entry, guard) = self.chain.held_entry();
        let output = f(&self.action, entry);
        guard.release();
        output
    }

    /// Invoke the action with `req` and the post-chain entry point.
    pub fn call<Req>(&self, req: Req) -> A::Output
    where
        A: Action<Req, T>,
    {
        self.run(|action, entry| action.call(req, entry))
    }
}

impl<A: Clone, T> Clone for WrappedAction<A, T> {
    fn clone(&self) -> Self {
        Self {
            action: self.action.clone(),
            chain: self.chain.clone(),
        }
    }
}

impl<A: fmt::Debug, T> fmt::Debug for WrappedAction<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedAction")
            .field("action", &self.action)
            .field("post", &self.chain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::QueueScheduler;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recorder(log: &Log, label: &'static str, forward: bool) -> PostMiddleware<u32> {
        let log = log.clone();
        PostMiddleware::named(label, move |n: u32, next: Continuation<u32>| {
            log.lock().unwrap().push(format!("{label}:{n}"));
            if forward {
                next.call(n + 1);
            }
        })
    }

    fn chain(steps: Vec<PostMiddleware<u32>>) -> (Arc<QueueScheduler>, PostChain<u32>) {
        let scheduler = Arc::new(QueueScheduler::new());
        let chain = PostChain::new(steps, scheduler.clone());
        (scheduler, chain)
    }

    #[test]
    fn test_chain_runs_in_order_one_turn_each() {
        let log: Log = Arc::default();
        let (scheduler, chain) = chain(vec![
            recorder(&log, "m1", true),
            recorder(&log, "m2", true),
        ]);

        chain.entry().call(0);
        // Nothing runs inside the caller's turn.
        assert!(log.lock().unwrap().is_empty());

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["m1:0"]);

        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["m1:0", "m2:1"]);

        // The last continuation is a no-op.
        assert_eq!(scheduler.run_pending(), 0);
    }

    #[test]
    fn test_chain_stalls_when_continuation_dropped() {
        let log: Log = Arc::default();
        let reached = Arc::new(AtomicBool::new(false));
        let flag = reached.clone();
        let (scheduler, chain) = chain(vec![
            recorder(&log, "m1", false),
            PostMiddleware::new(move |_: u32, _| flag.store(true, Ordering::SeqCst)),
        ]);

        chain.entry().call(7);
        assert_eq!(scheduler.run_until_idle(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["m1:7"]);
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[test]
    fn test_empty_chain_entry_is_noop() {
        let (scheduler, chain) = chain(Vec::new());
        let entry = chain.entry();

        assert!(entry.is_terminal());
        entry.call(1);
        entry.call(2);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_continuation_cursor() {
        let log: Log = Arc::default();
        let (_, chain) = chain(vec![recorder(&log, "m1", true), recorder(&log, "m2", true)]);
        let entry = chain.entry();

        assert_eq!(entry.position(), 0);
        assert_eq!(entry.remaining(), 2);
        assert!(!entry.is_terminal());
        assert_eq!(chain.names().collect::<Vec<_>>(), vec!["m1", "m2"]);
    }

    #[test]
    fn test_wrapped_action_passes_entry_point() {
        let log: Log = Arc::default();
        let (scheduler, chain) = chain(vec![recorder(&log, "audit", true)]);
        let wrapped = WrappedAction::new(
            |req: &str, post: Continuation<u32>| {
                post.call(req.len() as u32);
                format!("handled {req}")
            },
            chain,
        );

        assert_eq!(wrapped.call("ping"), "handled ping");
        assert!(log.lock().unwrap().is_empty());

        scheduler.run_until_idle();
        assert_eq!(*log.lock().unwrap(), vec!["audit:4"]);
    }

    #[test]
    fn test_held_entry_waits_for_release() {
        let log: Log = Arc::default();
        let (scheduler, chain) = chain(vec![recorder(&log, "m1", true)]);
        let (entry, guard) = chain.held_entry();

        entry.call(1);
        assert_eq!(scheduler.pending(), 0);

        guard.release();
        assert_eq!(scheduler.pending(), 1);

        // Released entry points defer directly.
        entry.call(2);
        assert_eq!(scheduler.pending(), 2);

        scheduler.run_until_idle();
        assert_eq!(*log.lock().unwrap(), vec!["m1:1", "m1:2"]);
    }

    #[test]
    fn test_dropped_guard_releases() {
        let log: Log = Arc::default();
        let (scheduler, chain) = chain(vec![recorder(&log, "m1", true)]);
        let (entry, guard) = chain.held_entry();

        entry.call(5);
        drop(guard);
        assert_eq!(scheduler.run_until_idle(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["m1:5"]);
    }

    #[test]
    fn test_action_may_skip_post_chain() {
        let log: Log = Arc::default();
        let (scheduler, chain) = chain(vec![recorder(&log, "m1", true)]);
        let wrapped = WrappedAction::new(|_: (), _: Continuation<u32>| (), chain);

        wrapped.call(());
        assert_eq!(scheduler.run_until_idle(), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_independent_invocations_do_not_share_state() {
        let log: Log = Arc::default();
        let (scheduler, chain) = chain(vec![
            recorder(&log, "m1", true),
            recorder(&log, "m2", true),
        ]);

        chain.entry().call(100);
        chain.entry().call(200);
        scheduler.run_until_idle();

        let mut entries = log.lock().unwrap().clone();
        entries.sort();
        assert_eq!(entries, vec!["m1:100", "m1:200", "m2:101", "m2:201"]);
    }
}
