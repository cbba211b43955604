//! Single Flight Module
//!
//! Collapses concurrent identical requests into one upstream call.
//!
//! The first caller for a key becomes the runner and executes the work; all
//! callers whose windows overlap that execution wait on a shared barrier and
//! receive a clone of the runner's result. The record is removed before the
//! result is published, so a later call for the same key runs the work
//! again: this is a miss coalescer, not a memoiser.

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::watch;

/// Role assigned to a caller during election.
enum Role<T> {
    /// Executes the work and publishes the result.
    Runner(watch::Sender<Option<T>>),
    /// Waits for the runner's published result.
    Waiter(watch::Receiver<Option<T>>),
}

// == Single Flight ==
/// Per-key duplicate-call suppressor.
///
/// The coordinator map is locked only to elect a runner and to retire a
/// finished record; the work itself always runs outside the lock so slow
/// keys never block unrelated ones.
pub struct SingleFlight<T> {
    calls: Mutex<HashMap<String, watch::Receiver<Option<T>>>>,
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    // == Run ==
    /// Executes `work` for `key`, suppressing duplicates.
    ///
    /// If a call for `key` is already in flight, waits for it and returns a
    /// clone of its result. Otherwise runs `work` and publishes the result
    /// to every waiter. If a runner is dropped before publishing (its caller
    /// was cancelled), the next caller to observe the stale record is
    /// elected in its place.
    pub async fn run<F, Fut>(&self, key: &str, mut work: F) -> T
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = T>,
    {
        loop {
            let role = {
                let mut calls = self.calls.lock();
                match calls.get(key) {
                    // `has_changed` errs once the sender is gone; a record
                    // in that state belongs to a dropped runner.
                    Some(rx) if rx.has_changed().is_ok() => Role::Waiter(rx.clone()),
                    _ => {
                        let (tx, rx) = watch::channel(None);
                        calls.insert(key.to_owned(), rx);
                        Role::Runner(tx)
                    }
                }
            };

            match role {
                Role::Waiter(mut rx) => {
                    if let Some(result) = wait_for_result(&mut rx).await {
                        return result;
                    }
                    // The runner vanished without publishing; re-elect.
                }
                Role::Runner(tx) => {
                    let result = work().await;
                    // Retire the record first: callers arriving after this
                    // point start a fresh flight.
                    self.calls.lock().remove(key);
                    let _ = tx.send(Some(result.clone()));
                    return result;
                }
            }
        }
    }

    /// Number of calls currently in flight.
    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits until the runner publishes, returning `None` if the runner was
/// dropped without publishing.
async fn wait_for_result<T: Clone>(rx: &mut watch::Receiver<Option<T>>) -> Option<T> {
    loop {
        if let Some(result) = rx.borrow_and_update().as_ref() {
            return Some(result.clone());
        }
        if rx.changed().await.is_err() {
            // Sender dropped; one final look in case the result landed
            // just before the drop.
            return rx.borrow().as_ref().cloned();
        }
    }
}
