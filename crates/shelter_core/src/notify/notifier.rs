//! Scope-keyed change notifier.
//!
//! # Invariants
//! - A collection-scoped subscriber sees every publish.
//! - An item-scoped subscriber sees publishes for that item and for the
//!   collection, never for other items.
//! - `publish` only enqueues; it never blocks on a subscriber.
//! - Dropping a `Subscription` unregisters it; senders whose receiver is gone
//!   are also pruned during publish.

use crate::model::pet::PetId;
use crate::resource::router::Route;
use crate::resource::uri::ResourceUri;
use log::debug;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Level at which a change is announced or observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NotifyScope {
    Collection,
    Item(PetId),
}

impl NotifyScope {
    /// Scope for a routed identifier; `None` for unmatched identifiers.
    pub fn from_route(route: Route) -> Option<Self> {
        match route {
            Route::Collection => Some(Self::Collection),
            Route::Item(id) => Some(Self::Item(id)),
            Route::Unmatched => None,
        }
    }

    fn observes(self, published: NotifyScope) -> bool {
        match (self, published) {
            (Self::Collection, _) | (_, Self::Collection) => true,
            (Self::Item(watched), Self::Item(changed)) => watched == changed,
        }
    }
}

/// "Something changed at `uri`". Observers re-read to learn the new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotification {
    pub uri: ResourceUri,
    pub scope: NotifyScope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Bucket = BTreeMap<SubscriptionId, Sender<ChangeNotification>>;
type Registry = RwLock<BTreeMap<NotifyScope, Bucket>>;

/// Receiving end of one subscription. Dropping it unregisters the subscriber.
pub struct Subscription {
    id: SubscriptionId,
    scope: NotifyScope,
    receiver: Receiver<ChangeNotification>,
    registry: Weak<Registry>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .finish()
    }
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn scope(&self) -> NotifyScope {
        self.scope
    }

    /// Blocks until a notification arrives or the notifier is gone.
    pub fn recv(&self) -> Option<ChangeNotification> {
        self.receiver.recv().ok()
    }

    pub fn try_recv(&self) -> Option<ChangeNotification> {
        match self.receiver.try_recv() {
            Ok(notification) => Some(notification),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ChangeNotification> {
        match self.receiver.recv_timeout(timeout) {
            Ok(notification) => Some(notification),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Takes every notification already queued.
    pub fn drain(&self) -> Vec<ChangeNotification> {
        self.receiver.try_iter().collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            remove_from_bucket(&mut registry.write(), self.scope, self.id);
        }
    }
}

/// Registry of subscribers keyed by the scope they observe.
pub struct ChangeNotifier {
    next_id: AtomicU64,
    registry: Arc<Registry>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            registry: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub fn subscribe(&self, scope: NotifyScope) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel();
        self.registry.write().entry(scope).or_default().insert(id, tx);
        debug!("event=subscribe module=notify status=ok subscription={} scope={scope:?}", id.0);

        Subscription {
            id,
            scope,
            receiver: rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Removes a subscription. Returns `false` when it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.write();
        let mut removed = false;
        registry.retain(|_, bucket| {
            removed |= bucket.remove(&id).is_some();
            !bucket.is_empty()
        });
        removed
    }

    /// Announces a change at `uri` to every observer of `scope`.
    ///
    /// Returns the number of subscribers the notification was queued for.
    pub fn publish(&self, uri: &ResourceUri, scope: NotifyScope) -> usize {
        let notification = ChangeNotification {
            uri: uri.clone(),
            scope,
        };
        let mut delivered = 0;
        let mut registry = self.registry.write();
        registry.retain(|watched, bucket| {
            if watched.observes(scope) {
                bucket.retain(|_, tx| {
                    let sent = tx.send(notification.clone()).is_ok();
                    delivered += usize::from(sent);
                    sent
                });
            }
            !bucket.is_empty()
        });
        debug!("event=publish module=notify status=ok scope={scope:?} delivered={delivered}");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.read().values().map(BTreeMap::len).sum()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_from_bucket(
    registry: &mut BTreeMap<NotifyScope, Bucket>,
    scope: NotifyScope,
    id: SubscriptionId,
) {
    if let Some(bucket) = registry.get_mut(&scope) {
        bucket.remove(&id);
        if bucket.is_empty() {
            registry.remove(&scope);
        }
    }
}
