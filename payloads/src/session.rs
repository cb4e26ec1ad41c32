//! Coordination of access-token refreshes.
//!
//! Any number of in-flight requests may hit a 401 at the same moment. Only
//! one of them performs `auth/refresh/`; the others wait on the same lock and
//! then reuse its outcome rather than issuing refreshes of their own.

use futures::lock::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Valid,
    Expired,
}

#[derive(Debug)]
pub struct RefreshGate {
    last: Mutex<RefreshOutcome>,
    /// Bumped after every completed refresh attempt.
    generation: AtomicU64,
    attempts: AtomicU64,
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshGate {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(RefreshOutcome::Valid),
            generation: AtomicU64::new(0),
            attempts: AtomicU64::new(0),
        }
    }

    /// Read before sending a request, and passed back to [`Self::refresh`]
    /// if that request is rejected.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Number of refresh attempts actually performed.
    pub fn refresh_count(&self) -> u64 {
        self.attempts.load(Ordering::Acquire)
    }

    /// Refresh the session unless someone already did so after `observed`.
    ///
    /// Returns `true` when the session is usable again.
    pub async fn refresh<F, Fut>(&self, observed: u64, run: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut last = self.last.lock().await;
        if self.generation() != observed {
            // Another caller refreshed while this request was in flight.
            return *last == RefreshOutcome::Valid;
        }

        self.attempts.fetch_add(1, Ordering::AcqRel);
        let outcome = if run().await {
            tracing::info!("session refreshed");
            RefreshOutcome::Valid
        } else {
            tracing::info!("session refresh rejected");
            RefreshOutcome::Expired
        };
        *last = outcome;
        self.generation.fetch_add(1, Ordering::AcqRel);
        outcome == RefreshOutcome::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let gate = Arc::new(RefreshGate::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let observed = gate.generation();

        let tasks = (0..8).map(|_| {
            let gate = gate.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                gate.refresh(observed, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    true
                })
                .await
            })
        });
        for result in futures::future::join_all(tasks).await {
            assert!(result.unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(gate.refresh_count(), 1);
        assert_eq!(gate.generation(), observed + 1);
    }

    #[tokio::test]
    async fn waiters_see_a_failed_refresh() {
        let gate = RefreshGate::new();
        let observed = gate.generation();
        assert!(!gate.refresh(observed, || async { false }).await);
        // A late caller from the same generation reuses the failure.
        assert!(!gate.refresh(observed, || async { true }).await);
        assert_eq!(gate.refresh_count(), 1);
    }

    #[tokio::test]
    async fn later_generations_refresh_again() {
        let gate = RefreshGate::new();
        assert!(gate.refresh(gate.generation(), || async { true }).await);
        assert!(gate.refresh(gate.generation(), || async { true }).await);
        assert_eq!(gate.refresh_count(), 2);
    }
}
