//! Pending Call Store - the async-to-sync bridge.
//!
//! Maps correlation ids to callers waiting for a reply envelope.

use dashmap::DashMap;
use shared_types::{ChannelName, CorrelationId, Envelope};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// A pending call waiting for its reply.
struct PendingCall {
    /// Single-assignment completion slot.
    sender: oneshot::Sender<Envelope>,
    /// When the call was registered.
    created_at: Instant,
    /// Request channel (for logging).
    channel: ChannelName,
    /// Deadline for this call.
    timeout: Duration,
}

/// Counters for the pending call store.
#[derive(Debug, Default)]
pub struct PendingStats {
    /// Total calls registered.
    pub total_registered: AtomicU64,
    /// Total calls resolved by a reply.
    pub total_resolved: AtomicU64,
    /// Total calls removed by deadline expiry.
    pub total_expired: AtomicU64,
    /// Total calls cancelled (caller gave up).
    pub total_cancelled: AtomicU64,
}

/// Concurrency-safe registry of in-flight calls.
///
/// Flow:
/// 1. The gateway calls `register()` and gets a fresh correlation id plus a
///    oneshot receiver.
/// 2. The gateway publishes the request carrying that id.
/// 3. The reply router receives the reply and calls `resolve()`.
/// 4. The gateway awaits the receiver under its deadline.
///
/// A call is resolved exactly once: whichever of reply and expiry removes
/// the entry first wins, and the loser is a no-op. Replies bearing unknown
/// or already-resolved ids are discarded without effect.
pub struct PendingCallStore {
    /// Map of correlation id to pending call.
    pending: DashMap<CorrelationId, PendingCall>,
    /// Default deadline.
    default_timeout: Duration,
    /// Counters.
    stats: Arc<PendingStats>,
}

impl PendingCallStore {
    /// Create a new pending call store.
    pub fn new(default_timeout: Duration) -> Self {
        Self {
            pending: DashMap::new(),
            default_timeout,
            stats: Arc::new(PendingStats::default()),
        }
    }

    /// Register a pending call and get a receiver for the reply.
    ///
    /// Returns the fresh correlation id and the receiver that will complete
    /// with the reply envelope.
    pub fn register(
        &self,
        channel: &ChannelName,
        timeout: Option<Duration>,
    ) -> (CorrelationId, oneshot::Receiver<Envelope>) {
        let correlation_id = CorrelationId::new();
        let (tx, rx) = oneshot::channel();

        let call = PendingCall {
            sender: tx,
            created_at: Instant::now(),
            channel: channel.clone(),
            timeout: timeout.unwrap_or(self.default_timeout),
        };

        self.pending.insert(correlation_id, call);
        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);

        debug!(
            correlation_id = %correlation_id,
            channel = %channel,
            "Registered pending call"
        );

        (correlation_id, rx)
    }

    /// Resolve a pending call with a reply envelope.
    ///
    /// Returns true if the call was found and completed, false if the id is
    /// unknown or the call was already resolved - the no-op path for late
    /// and duplicate replies.
    pub fn resolve(&self, correlation_id: CorrelationId, envelope: Envelope) -> bool {
        if let Some((_, call)) = self.pending.remove(&correlation_id) {
            let elapsed = call.created_at.elapsed();

            match call.sender.send(envelope) {
                Ok(()) => {
                    self.stats.total_resolved.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        correlation_id = %correlation_id,
                        channel = %call.channel,
                        elapsed_ms = elapsed.as_millis(),
                        "Resolved pending call"
                    );
                    true
                }
                Err(_) => {
                    // Receiver was dropped (caller gave up)
                    self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        correlation_id = %correlation_id,
                        channel = %call.channel,
                        "Pending call receiver dropped"
                    );
                    false
                }
            }
        } else {
            warn!(
                correlation_id = %correlation_id,
                "Reply for unknown or expired correlation id"
            );
            false
        }
    }

    /// Remove a pending call without completing it.
    ///
    /// Returns true if an entry existed. Used by the gateway when its
    /// deadline fires first.
    pub fn cancel(&self, correlation_id: &CorrelationId) -> bool {
        if self.pending.remove(correlation_id).is_some() {
            self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Remove calls whose deadline has passed.
    ///
    /// Returns the number of calls removed. Dropping the sender wakes the
    /// waiting caller with a closed-slot error, which the gateway converts
    /// into a failure envelope.
    pub fn remove_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;

        self.pending.retain(|id, call| {
            let elapsed = now.duration_since(call.created_at);
            if elapsed > call.timeout {
                warn!(
                    correlation_id = %id,
                    channel = %call.channel,
                    elapsed_ms = elapsed.as_millis(),
                    timeout_ms = call.timeout.as_millis(),
                    "Removing expired pending call"
                );
                self.stats.total_expired.fetch_add(1, Ordering::Relaxed);
                removed += 1;
                false // Remove
            } else {
                true // Keep
            }
        });

        removed
    }

    /// Number of calls currently in flight.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check whether a correlation id is in flight.
    pub fn is_pending(&self, correlation_id: &CorrelationId) -> bool {
        self.pending.contains_key(correlation_id)
    }

    /// Get counters.
    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }
}

/// Background task that sweeps out expired calls.
///
/// The gateway's own deadline is the primary expiry path; the sweep is the
/// backstop for entries whose caller disappeared without cancelling.
pub async fn expiry_sweep(store: Arc<PendingCallStore>, interval: Duration) {
    let mut sweep_interval = tokio::time::interval(interval);
    sweep_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        sweep_interval.tick().await;
        let removed = store.remove_expired();
        if removed > 0 {
            debug!(removed = removed, "Swept expired pending calls");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn channel() -> ChannelName {
        ChannelName::new("get-product-request")
    }

    #[tokio::test]
    async fn test_register_and_resolve() {
        let store = PendingCallStore::new(Duration::from_secs(30));

        let (correlation_id, rx) = store.register(&channel(), None);
        assert!(store.is_pending(&correlation_id));
        assert_eq!(store.pending_count(), 1);

        let envelope = Envelope::ok_empty("done");
        assert!(store.resolve(correlation_id, envelope.clone()));

        let received = rx.await.unwrap();
        assert_eq!(received, envelope);
        assert_eq!(store.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_unknown_id() {
        let store = PendingCallStore::new(Duration::from_secs(30));
        let unknown = CorrelationId::new();

        assert!(!store.resolve(unknown, Envelope::ok_empty("late")));
    }

    #[tokio::test]
    async fn test_duplicate_resolve_is_noop() {
        let store = PendingCallStore::new(Duration::from_secs(30));

        let (correlation_id, rx) = store.register(&channel(), None);
        assert!(store.resolve(correlation_id, Envelope::ok_empty("first")));

        // Second reply with the same id must not alter the delivered result.
        assert!(!store.resolve(correlation_id, Envelope::bad_request("second")));

        let received = rx.await.unwrap();
        assert_eq!(received.message, "first");
        assert_eq!(
            store.stats().total_resolved.load(Ordering::Relaxed),
            1
        );
    }

    #[tokio::test]
    async fn test_remove_expired() {
        let store = PendingCallStore::new(Duration::from_millis(10));

        let (id1, _rx1) = store.register(&channel(), None);
        let (id2, _rx2) = store.register(&channel(), None);

        assert_eq!(store.pending_count(), 2);

        tokio::time::sleep(Duration::from_millis(50)).await;

        let removed = store.remove_expired();
        assert_eq!(removed, 2);
        assert_eq!(store.pending_count(), 0);
        assert!(!store.is_pending(&id1));
        assert!(!store.is_pending(&id2));
    }

    #[tokio::test]
    async fn test_expiry_wakes_waiting_caller() {
        let store = PendingCallStore::new(Duration::from_millis(10));

        let (_id, rx) = store.register(&channel(), None);
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.remove_expired();

        // The dropped sender surfaces as a closed-slot error.
        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn test_cancel() {
        let store = PendingCallStore::new(Duration::from_secs(30));

        let (correlation_id, _rx) = store.register(&channel(), None);
        assert!(store.cancel(&correlation_id));
        assert!(!store.is_pending(&correlation_id));

        // Cancel again should return false
        assert!(!store.cancel(&correlation_id));
    }

    #[tokio::test]
    async fn test_custom_timeout() {
        let store = PendingCallStore::new(Duration::from_secs(30));

        let (_id, _rx) = store.register(&channel(), Some(Duration::from_millis(5)));
        assert_eq!(store.pending_count(), 1);

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(store.remove_expired(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_register_unique_ids() {
        let store = Arc::new(PendingCallStore::new(Duration::from_secs(30)));
        let mut handles = Vec::new();

        for _ in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let (id, _rx) = store.register(&ChannelName::new("probe"), None);
                id
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            assert!(seen.insert(handle.await.unwrap()));
        }
        assert_eq!(seen.len(), 64);
    }

    proptest! {
        #[test]
        fn prop_registered_ids_are_pairwise_distinct(count in 1usize..128) {
            let store = PendingCallStore::new(Duration::from_secs(30));
            let mut seen = HashSet::new();
            let mut receivers = Vec::new();

            for _ in 0..count {
                let (id, rx) = store.register(&ChannelName::new("probe"), None);
                prop_assert!(seen.insert(id));
                receivers.push(rx);
            }

            prop_assert_eq!(store.pending_count(), count);
        }
    }
}
