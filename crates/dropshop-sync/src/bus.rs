//! Same-origin fan-out of [`SyncEvent`] values between open contexts.
//!
//! Every context (one open instance of the application) attaches to the
//! shared [`SyncBus`] and gets a [`BusHandle`]: the receiving end of its own
//! unbounded queue plus the ability to publish. Publishing enqueues a clone
//! of the event to every *other* attached context and returns immediately —
//! fire-and-forget, no acknowledgment, no replay for contexts that attach
//! later.
//!
//! Delivery is asynchronous relative to the publish call: events sit in the
//! receiver's queue until it polls them. Per-publisher order is preserved by
//! the underlying channels; no ordering is guaranteed across publishers
//! racing from different contexts.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, trace};

use dropshop_shared::SyncEvent;

struct Peer {
    id: u64,
    tx: mpsc::UnboundedSender<SyncEvent>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    peers: Vec<Peer>,
}

impl Registry {
    /// Send a clone of `event` to every peer except the originating context.
    /// Peers whose receiving side is gone are pruned on the way.
    fn fan_out(&mut self, origin: u64, event: &SyncEvent) {
        self.peers
            .retain(|peer| peer.id == origin || peer.tx.send(event.clone()).is_ok());
    }
}

/// The shared broadcast registry. Cheap to clone; all clones refer to the
/// same set of attached contexts.
#[derive(Clone, Default)]
pub struct SyncBus {
    registry: Arc<Mutex<Registry>>,
}

impl SyncBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new context. The returned handle is that context's single
    /// point of contact with the bus; dropping it detaches the context and
    /// no further events reach it.
    pub fn attach(&self) -> BusHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let id = registry.next_id;
        registry.next_id += 1;
        registry.peers.push(Peer { id, tx });
        debug!(context = id, "context attached to sync bus");
        BusHandle {
            id,
            registry: Arc::clone(&self.registry),
            rx,
        }
    }
}

/// One context's connection to the bus: publisher and subscriber in one.
pub struct BusHandle {
    id: u64,
    registry: Arc<Mutex<Registry>>,
    rx: mpsc::UnboundedReceiver<SyncEvent>,
}

impl BusHandle {
    /// Broadcast `event` to every other attached context. Never delivered
    /// back to this context, even through a [`Publisher`] clone.
    pub fn publish(&self, event: SyncEvent) {
        trace!(context = self.id, ?event, "publishing sync event");
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry.fan_out(self.id, &event);
    }

    /// Wait for the next event addressed to this context.
    pub async fn recv(&mut self) -> Option<SyncEvent> {
        self.rx.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv); `None` when the queue
    /// is currently empty.
    pub fn try_recv(&mut self) -> Option<SyncEvent> {
        self.rx.try_recv().ok()
    }

    /// A clonable, send-only view sharing this handle's origin, for callers
    /// (like the store's product-message append) that publish on behalf of
    /// this context.
    pub fn publisher(&self) -> Publisher {
        Publisher {
            id: self.id,
            registry: Arc::clone(&self.registry),
        }
    }
}

impl Drop for BusHandle {
    fn drop(&mut self) {
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry.peers.retain(|peer| peer.id != self.id);
        debug!(context = self.id, "context detached from sync bus");
    }
}

/// Send-only view of a [`BusHandle`]. Events published here carry the parent
/// handle's origin and are therefore never echoed back to it.
#[derive(Clone)]
pub struct Publisher {
    id: u64,
    registry: Arc<Mutex<Registry>>,
}

impl Publisher {
    pub fn publish(&self, event: SyncEvent) {
        trace!(context = self.id, ?event, "publishing sync event");
        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        registry.fan_out(self.id, &event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use dropshop_shared::{ProductId, Report, ReportId, UserId};

    fn report_event(reason: &str) -> SyncEvent {
        SyncEvent::NewReport(Report {
            id: ReportId::new(),
            target_id: ProductId::new().to_string(),
            reporter_id: UserId::new(),
            reason: reason.to_string(),
            details: String::new(),
            evidence: None,
            timestamp: Utc::now(),
        })
    }

    #[test]
    fn publish_reaches_other_contexts_but_not_self() {
        let bus = SyncBus::new();
        let mut a = bus.attach();
        let mut b = bus.attach();
        let mut c = bus.attach();

        a.publish(report_event("spam"));

        assert!(a.try_recv().is_none());
        assert!(b.try_recv().is_some());
        assert!(c.try_recv().is_some());
    }

    #[test]
    fn publisher_clone_shares_origin() {
        let bus = SyncBus::new();
        let mut a = bus.attach();
        let mut b = bus.attach();

        let publisher = a.publisher().clone();
        publisher.publish(report_event("fraud"));

        assert!(a.try_recv().is_none(), "own publishes must not echo back");
        assert!(b.try_recv().is_some());
    }

    #[test]
    fn events_arrive_in_publish_order_per_publisher() {
        let bus = SyncBus::new();
        let a = bus.attach();
        let mut b = bus.attach();

        let first = ProductId::new();
        let second = ProductId::new();
        a.publish(SyncEvent::DeleteProduct(first));
        a.publish(SyncEvent::DeleteProduct(second));

        assert_eq!(b.try_recv(), Some(SyncEvent::DeleteProduct(first)));
        assert_eq!(b.try_recv(), Some(SyncEvent::DeleteProduct(second)));
    }

    #[test]
    fn dropped_handle_stops_receiving_and_is_pruned() {
        let bus = SyncBus::new();
        let a = bus.attach();
        let b = bus.attach();
        drop(b);

        // No receiver left besides `a` itself; fan-out must not fail.
        a.publish(report_event("spam"));

        let mut c = bus.attach();
        a.publish(report_event("other"));
        // Only the event published after attach is delivered; no backlog.
        assert!(c.try_recv().is_some());
        assert!(c.try_recv().is_none());
    }

    #[tokio::test]
    async fn recv_waits_for_delivery() {
        let bus = SyncBus::new();
        let a = bus.attach();
        let mut b = bus.attach();

        let wanted = ProductId::new();
        tokio::spawn(async move {
            a.publish(SyncEvent::DeleteProduct(wanted));
            // Keep `a` alive until the event is on the wire.
        });

        assert_eq!(b.recv().await, Some(SyncEvent::DeleteProduct(wanted)));
    }
}
