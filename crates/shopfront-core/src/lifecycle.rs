// ── Request lifecycle ──
//
// Per-slot last-request-wins bookkeeping. Each fetch site ("reservations
// list", "reservation 42") is a slot; beginning a request supersedes the
// slot's previous one, and only the current token may apply its result.
// Cancellation of the underlying transport is advisory: the generation
// check in `settle` is what keeps stale results out.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle for one in-flight request.
///
/// Not `Clone`: a token is settled exactly once, by value.
#[derive(Debug)]
pub struct RequestToken {
    slot: String,
    generation: u64,
    cancel: CancellationToken,
}

impl RequestToken {
    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Signal fired when this request is superseded, cancelled or the
    /// controller shuts down. Hand it to the transport.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Result of settling a token that carried a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<R> {
    /// The request was still current; the caller should apply `R`.
    Current(R),
    /// A newer request for the same slot began; the value was dropped.
    Superseded,
}

impl<R> Outcome<R> {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }

    pub fn into_current(self) -> Option<R> {
        match self {
            Self::Current(r) => Some(r),
            Self::Superseded => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Outcome<U> {
        match self {
            Self::Current(r) => Outcome::Current(f(r)),
            Self::Superseded => Outcome::Superseded,
        }
    }
}

/// Whether `complete` invoked a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Superseded,
}

#[derive(Debug)]
struct SlotEntry {
    generation: u64,
    cancel: CancellationToken,
}

/// Owns the "current token per slot" map for one independent surface.
///
/// Dropping the controller (or calling [`shutdown`](Self::shutdown))
/// cancels every outstanding token and releases the map.
#[derive(Debug)]
pub struct RequestController {
    slots: DashMap<String, SlotEntry>,
    generation: AtomicU64,
    root: CancellationToken,
}

impl Default for RequestController {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestController {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            generation: AtomicU64::new(0),
            root: CancellationToken::new(),
        }
    }

    /// Start a request for `slot`, superseding whatever was current there.
    pub fn begin(&self, slot: impl Into<String>) -> RequestToken {
        let slot = slot.into();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = self.root.child_token();

        if self.root.is_cancelled() {
            debug!(slot = slot.as_str(), generation, "controller shut down, request will never be current");
            return RequestToken {
                slot,
                generation,
                cancel,
            };
        }

        let entry = SlotEntry {
            generation,
            cancel: cancel.clone(),
        };
        if let Some(previous) = self.slots.insert(slot.clone(), entry) {
            previous.cancel.cancel();
            debug!(
                slot = slot.as_str(),
                superseded = previous.generation,
                generation,
                "request superseded"
            );
        }

        RequestToken {
            slot,
            generation,
            cancel,
        }
    }

    /// Whether `token` is still the newest request for its slot.
    pub fn is_current(&self, token: &RequestToken) -> bool {
        !self.root.is_cancelled()
            && self
                .slots
                .get(&token.slot)
                .is_some_and(|entry| entry.generation == token.generation)
    }

    /// Drop the slot's current request, if any. Its later result is discarded.
    pub fn cancel(&self, slot: &str) {
        if let Some((_, entry)) = self.slots.remove(slot) {
            entry.cancel.cancel();
            debug!(slot, generation = entry.generation, "request cancelled");
        }
    }

    /// Settle a token with its result, releasing the slot if it was current.
    pub fn settle<R>(&self, token: RequestToken, result: R) -> Outcome<R> {
        let released = !self.root.is_cancelled()
            && self
                .slots
                .remove_if(&token.slot, |_, entry| entry.generation == token.generation)
                .is_some();

        if released {
            Outcome::Current(result)
        } else {
            debug!(
                slot = token.slot.as_str(),
                generation = token.generation,
                "discarding superseded result"
            );
            Outcome::Superseded
        }
    }

    /// Settle a fallible result, invoking exactly one handler if still current.
    ///
    /// Failures on a superseded token are swallowed like successes.
    pub fn complete<T, E>(
        &self,
        token: RequestToken,
        result: Result<T, E>,
        on_ok: impl FnOnce(T),
        on_err: impl FnOnce(E),
    ) -> Completion {
        match self.settle(token, result) {
            Outcome::Current(Ok(value)) => {
                on_ok(value);
                Completion::Applied
            }
            Outcome::Current(Err(err)) => {
                on_err(err);
                Completion::Applied
            }
            Outcome::Superseded => Completion::Superseded,
        }
    }

    /// Begin a request, await `fetch` with the token's cancellation signal,
    /// then settle.
    pub async fn run<F, Fut, R>(&self, slot: impl Into<String>, fetch: F) -> Outcome<R>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = R>,
    {
        let token = self.begin(slot);
        let result = fetch(token.cancellation().clone()).await;
        self.settle(token, result)
    }

    /// Cancel everything and release the slot map. Tokens issued afterwards
    /// are never current.
    pub fn shutdown(&self) {
        self.root.cancel();
        self.slots.clear();
        debug!("request controller shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Number of slots with a request in flight.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl Drop for RequestController {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::time::Duration;

    use super::*;

    #[test]
    fn stale_completion_is_not_applied() {
        let controller = RequestController::new();
        let a = controller.begin("list");
        let b = controller.begin("list");

        let calls = Cell::new(0);
        let first = controller.complete(
            a,
            Ok::<_, ()>("a"),
            |_| calls.set(calls.get() + 1),
            |()| calls.set(calls.get() + 100),
        );
        assert_eq!(first, Completion::Superseded);
        assert_eq!(calls.get(), 0);

        let mut applied = None;
        let second = controller.complete(b, Ok::<_, ()>("b"), |v| applied = Some(v), |()| {});
        assert_eq!(second, Completion::Applied);
        assert_eq!(applied, Some("b"));
    }

    #[test]
    fn newer_request_wins_regardless_of_arrival_order() {
        let controller = RequestController::new();
        let state = RefCell::new("initial");

        let a = controller.begin("detail");
        let b = controller.begin("detail");

        // B resolves first, A arrives late.
        controller.complete(b, Ok::<_, ()>("from b"), |v| *state.borrow_mut() = v, |()| {});
        controller.complete(a, Ok::<_, ()>("from a"), |v| *state.borrow_mut() = v, |()| {});

        assert_eq!(*state.borrow(), "from b");
    }

    #[test]
    fn failure_on_superseded_token_is_swallowed() {
        let controller = RequestController::new();
        let a = controller.begin("list");
        let _b = controller.begin("list");

        let mut errors = Vec::new();
        let completion = controller.complete(
            a,
            Err::<(), _>("timeout"),
            |()| {},
            |e| errors.push(e),
        );
        assert_eq!(completion, Completion::Superseded);
        assert!(errors.is_empty());
    }

    #[test]
    fn failure_on_current_token_reaches_error_handler() {
        let controller = RequestController::new();
        let token = controller.begin("list");
        let mut errors = Vec::new();
        controller.complete(token, Err::<(), _>("boom"), |()| {}, |e| errors.push(e));
        assert_eq!(errors, vec!["boom"]);
    }

    #[test]
    fn begin_cancels_previous_token_signal() {
        let controller = RequestController::new();
        let a = controller.begin("list");
        assert!(!a.cancellation().is_cancelled());
        let b = controller.begin("list");
        assert!(a.cancellation().is_cancelled());
        assert!(!b.cancellation().is_cancelled());
        assert!(!controller.is_current(&a));
        assert!(controller.is_current(&b));
    }

    #[test]
    fn slots_are_independent() {
        let controller = RequestController::new();
        let list = controller.begin("list");
        let detail = controller.begin("reservation:42");
        assert!(controller.is_current(&list));
        assert!(controller.is_current(&detail));
        assert_eq!(controller.slot_count(), 2);
    }

    #[test]
    fn cancel_discards_the_slot() {
        let controller = RequestController::new();
        let token = controller.begin("list");
        controller.cancel("list");
        assert!(token.cancellation().is_cancelled());
        assert!(controller.settle(token, 1).is_superseded());
        assert_eq!(controller.slot_count(), 0);

        // Unknown slot is a no-op.
        controller.cancel("nothing");
    }

    #[test]
    fn settling_releases_the_slot() {
        let controller = RequestController::new();
        let token = controller.begin("list");
        assert_eq!(controller.settle(token, 7), Outcome::Current(7));
        assert_eq!(controller.slot_count(), 0);
    }

    #[test]
    fn shutdown_supersedes_everything() {
        let controller = RequestController::new();
        let token = controller.begin("list");
        controller.shutdown();

        assert!(controller.is_shut_down());
        assert!(token.cancellation().is_cancelled());
        assert!(!controller.is_current(&token));
        assert!(controller.settle(token, ()).is_superseded());

        let late = controller.begin("list");
        assert!(late.cancellation().is_cancelled());
        assert!(controller.settle(late, ()).is_superseded());
        assert_eq!(controller.slot_count(), 0);
    }

    #[test]
    fn drop_cancels_outstanding_tokens() {
        let controller = RequestController::new();
        let token = controller.begin("list");
        let signal = token.cancellation().clone();
        drop(controller);
        assert!(signal.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_older_request_loses_race() {
        let controller = RequestController::new();

        let slow = controller.run("list", |_cancel| async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            "a"
        });
        let fast = controller.run("list", |_cancel| async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            "b"
        });

        let (a, b) = tokio::join!(slow, fast);
        assert_eq!(a, Outcome::Superseded);
        assert_eq!(b, Outcome::Current("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_fetch_sees_cancellation() {
        let controller = RequestController::new();

        let first = controller.run("list", |cancel| async move {
            tokio::select! {
                () = cancel.cancelled() => "cancelled",
                () = tokio::time::sleep(Duration::from_secs(5)) => "finished",
            }
        });
        let second = controller.run("list", |_cancel| async { "fresh" });

        let (a, b) = tokio::join!(first, second);
        assert_eq!(a, Outcome::Superseded);
        assert_eq!(b.into_current(), Some("fresh"));
    }
}
