//! Post-commit stale-view signals.
//!
//! After a posting commits, the engine tells the presentation layer which
//! logical views are now stale. Publication is fire-and-forget and happens
//! outside the transaction: a lost signal means a stale cache entry, never a
//! lost posting. Delivery is best-effort fan-out; subscribers must tolerate
//! duplicates and reordering.

use std::sync::{Mutex, mpsc};

use serde::{Deserialize, Serialize};

use stockbook_core::TenantId;

/// Logical view paths the posting engine invalidates.
pub mod views {
    pub const PURCHASE_ORDERS: &str = "purchase-orders";
    pub const SALES_ORDERS: &str = "sales-orders";
    pub const POS: &str = "pos";
    pub const STOCK: &str = "stock";
    pub const DASHBOARD: &str = "dashboard";
}

/// Notification that a logical view is stale for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleView {
    pub tenant_id: TenantId,
    pub path: String,
}

impl StaleView {
    pub fn new(tenant_id: TenantId, path: impl Into<String>) -> Self {
        Self {
            tenant_id,
            path: path.into(),
        }
    }
}

/// A subscription to stale-view signals.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::Receiver<StaleView>,
}

impl Subscription {
    /// Block until the next signal arrives.
    pub fn recv(&self) -> Result<StaleView, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a signal without blocking.
    pub fn try_recv(&self) -> Result<StaleView, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain everything currently queued.
    pub fn drain(&self) -> Vec<StaleView> {
        let mut out = Vec::new();
        while let Ok(signal) = self.receiver.try_recv() {
            out.push(signal);
        }
        out
    }
}

/// Publish/subscribe seam for stale-view signals.
pub trait SignalBus: Send + Sync {
    /// Best-effort publish; never blocks the caller on a slow subscriber.
    fn publish(&self, signal: StaleView);

    fn subscribe(&self) -> Subscription;
}

/// In-memory fan-out bus.
#[derive(Debug, Default)]
pub struct InMemorySignalBus {
    subscribers: Mutex<Vec<mpsc::Sender<StaleView>>>,
}

impl InMemorySignalBus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignalBus for InMemorySignalBus {
    fn publish(&self, signal: StaleView) {
        let Ok(mut subs) = self.subscribers.lock() else {
            return;
        };
        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(signal.clone()).is_ok());
    }

    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }
        Subscription { receiver: rx }
    }
}

impl<B: SignalBus + ?Sized> SignalBus for std::sync::Arc<B> {
    fn publish(&self, signal: StaleView) {
        (**self).publish(signal)
    }

    fn subscribe(&self) -> Subscription {
        (**self).subscribe()
    }
}
