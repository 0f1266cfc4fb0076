//! Typed event routing along the object tree.
//!
//! Components announce state changes by dispatching a typed event at their own
//! node. The [`EventRouter`] delivers it to listeners registered on that node
//! and, for bubbling events, on each ancestor in turn. Non-composed events do
//! not cross a shadow-root boundary (see [`ObjectTree::set_shadow_root`]).
//!
//! Listeners are keyed by the event's [`RoutedEvent::Kind`], a plain tag enum,
//! so matching is exhaustive and never string based.
//!
//! # Dispatch Order
//!
//! 1. Listeners on the target, in registration order.
//! 2. If the event bubbles, listeners on the parent, then its parent, and so
//!    on up to the root or the first shadow boundary for non-composed events.
//! 3. A handler may call [`EventContext::stop_propagation`]; remaining
//!    listeners on the current node still run, ancestors do not.

use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;
use crate::object::{ObjectId, ObjectResult, ObjectTree};

new_key_type! {
    /// Identifier of a registered event listener.
    pub struct ListenerId;
}

/// Propagation flags of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventInit {
    /// Whether the event propagates to ancestors.
    pub bubbles: bool,
    /// Whether the event crosses shadow-root boundaries.
    pub composed: bool,
}

impl EventInit {
    /// Bubbling and composed, the flags every Chatkit component event uses.
    pub const BUBBLES_COMPOSED: Self = Self {
        bubbles: true,
        composed: true,
    };
}

/// An event that can be routed by an [`EventRouter`].
pub trait RoutedEvent: Send + Sync + 'static {
    /// Tag used to match listeners.
    type Kind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    /// The tag of this event.
    fn kind(&self) -> Self::Kind;

    /// Propagation flags.
    fn init(&self) -> EventInit;
}

/// Per-dispatch state visible to handlers.
#[derive(Debug)]
pub struct EventContext {
    target: ObjectId,
    current_target: ObjectId,
    propagation_stopped: bool,
}

impl EventContext {
    /// The node the event was dispatched at.
    pub fn target(&self) -> ObjectId {
        self.target
    }

    /// The node whose listener is running.
    pub fn current_target(&self) -> ObjectId {
        self.current_target
    }

    /// Stop the event from reaching further ancestors.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Outcome of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Number of handlers invoked.
    pub delivered: usize,
    /// Whether a handler stopped propagation.
    pub stopped: bool,
}

type Handler<E> = Arc<dyn Fn(&E, &mut EventContext) + Send + Sync>;

struct Listener<E: RoutedEvent> {
    node: ObjectId,
    kind: E::Kind,
    seq: u64,
    handler: Handler<E>,
}

/// Routes typed events along an [`ObjectTree`].
pub struct EventRouter<E: RoutedEvent> {
    tree: ObjectTree,
    listeners: Mutex<SlotMap<ListenerId, Listener<E>>>,
    next_seq: AtomicU64,
}

impl<E: RoutedEvent> EventRouter<E> {
    /// Create a router with an empty tree.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            tree: ObjectTree::new(),
            listeners: Mutex::new(SlotMap::with_key()),
            next_seq: AtomicU64::new(0),
        })
    }

    /// The object tree events are routed along.
    pub fn tree(&self) -> &ObjectTree {
        &self.tree
    }

    /// Register a handler for events of `kind` reaching `node`.
    pub fn add_listener<F>(&self, node: ObjectId, kind: E::Kind, handler: F) -> ListenerId
    where
        F: Fn(&E, &mut EventContext) + Send + Sync + 'static,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let id = self.listeners.lock().insert(Listener {
            node,
            kind,
            seq,
            handler: Arc::new(handler),
        });
        tracing::debug!(target: targets::EVENT, %node, ?kind, "listener attached");
        id
    }

    /// Register a handler that is removed when the returned guard drops.
    pub fn add_listener_scoped<F>(self: &Arc<Self>, node: ObjectId, kind: E::Kind, handler: F) -> ListenerGuard<E>
    where
        F: Fn(&E, &mut EventContext) + Send + Sync + 'static,
    {
        let id = self.add_listener(node, kind, handler);
        ListenerGuard {
            router: Arc::downgrade(self),
            id,
        }
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.listeners.lock().remove(id);
        if let Some(listener) = &removed {
            tracing::debug!(target: targets::EVENT, node = %listener.node, kind = ?listener.kind, "listener detached");
        }
        removed.is_some()
    }

    /// Total number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Number of listeners registered on `node`.
    pub fn listener_count_on(&self, node: ObjectId) -> usize {
        self.listeners
            .lock()
            .values()
            .filter(|listener| listener.node == node)
            .count()
    }

    /// Remove a node's subtree from the tree along with its listeners.
    pub fn remove_node(&self, node: ObjectId) -> ObjectResult<()> {
        let removed = self.tree.remove(node)?;
        self.listeners
            .lock()
            .retain(|_, listener| !removed.contains(&listener.node));
        Ok(())
    }

    /// Dispatch `event` at `target`.
    ///
    /// Handlers run after the listener table lock is released, so they may
    /// register or remove listeners and dispatch further events.
    #[tracing::instrument(skip_all, target = "chatkit_core::event", level = "trace", fields(node = %target))]
    pub fn dispatch(&self, target: ObjectId, event: &E) -> ObjectResult<DispatchResult> {
        let kind = event.kind();
        let init = event.init();
        let path = self.propagation_path(target, init)?;

        let mut ctx = EventContext {
            target,
            current_target: target,
            propagation_stopped: false,
        };
        let mut result = DispatchResult::default();

        for node in path {
            let handlers = self.handlers_for(node, kind);
            ctx.current_target = node;
            for handler in handlers {
                handler(event, &mut ctx);
                result.delivered += 1;
            }
            if ctx.propagation_stopped {
                result.stopped = true;
                break;
            }
        }

        tracing::trace!(target: targets::EVENT, ?kind, delivered = result.delivered, "event dispatched");
        Ok(result)
    }

    fn propagation_path(&self, target: ObjectId, init: EventInit) -> ObjectResult<Vec<ObjectId>> {
        let ancestry = self.tree.ancestry(target)?;
        if !init.bubbles {
            return Ok(vec![target]);
        }
        if init.composed {
            return Ok(ancestry);
        }

        let mut path = vec![target];
        for &node in &ancestry[1..] {
            if self.tree.is_shadow_root(node)? {
                break;
            }
            path.push(node);
        }
        Ok(path)
    }

    fn handlers_for(&self, node: ObjectId, kind: E::Kind) -> Vec<Handler<E>> {
        let listeners = self.listeners.lock();
        let mut matching: Vec<(u64, Handler<E>)> = listeners
            .values()
            .filter(|listener| listener.node == node && listener.kind == kind)
            .map(|listener| (listener.seq, listener.handler.clone()))
            .collect();
        matching.sort_by_key(|(seq, _)| *seq);
        matching.into_iter().map(|(_, handler)| handler).collect()
    }
}

impl<E: RoutedEvent> fmt::Debug for EventRouter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRouter")
            .field("tree", &self.tree)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Removes its listener from the router when dropped.
pub struct ListenerGuard<E: RoutedEvent> {
    router: Weak<EventRouter<E>>,
    id: ListenerId,
}

impl<E: RoutedEvent> ListenerGuard<E> {
    /// The guarded listener.
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl<E: RoutedEvent> Drop for ListenerGuard<E> {
    fn drop(&mut self) {
        if let Some(router) = self.router.upgrade() {
            router.remove_listener(self.id);
        }
    }
}

impl<E: RoutedEvent> fmt::Debug for ListenerGuard<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum PingKind {
        Ping,
        Pong,
    }

    struct Ping {
        kind: PingKind,
        init: EventInit,
    }

    impl Ping {
        fn bubbling() -> Self {
            Self {
                kind: PingKind::Ping,
                init: EventInit::BUBBLES_COMPOSED,
            }
        }
    }

    impl RoutedEvent for Ping {
        type Kind = PingKind;

        fn kind(&self) -> PingKind {
            self.kind
        }

        fn init(&self) -> EventInit {
            self.init
        }
    }

    fn recorder(
        router: &EventRouter<Ping>,
        node: ObjectId,
        log: &Arc<Mutex<Vec<ObjectId>>>,
    ) -> ListenerId {
        let log = log.clone();
        router.add_listener(node, PingKind::Ping, move |_, ctx| {
            log.lock().push(ctx.current_target());
        })
    }

    #[test]
    fn test_bubbles_to_ancestors() {
        let router = EventRouter::<Ping>::new();
        let root = router.tree().insert("root", None).unwrap();
        let child = router.tree().insert("child", Some(root)).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&router, root, &log);
        recorder(&router, child, &log);

        let result = router.dispatch(child, &Ping::bubbling()).unwrap();
        assert_eq!(result.delivered, 2);
        assert_eq!(*log.lock(), vec![child, root]);
    }

    #[test]
    fn test_non_bubbling_stays_at_target() {
        let router = EventRouter::<Ping>::new();
        let root = router.tree().insert("root", None).unwrap();
        let child = router.tree().insert("child", Some(root)).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&router, root, &log);

        let event = Ping {
            kind: PingKind::Ping,
            init: EventInit::default(),
        };
        assert_eq!(router.dispatch(child, &event).unwrap().delivered, 0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_non_composed_stops_at_shadow_root() {
        let router = EventRouter::<Ping>::new();
        let outer = router.tree().insert("outer", None).unwrap();
        let host = router.tree().insert("host", Some(outer)).unwrap();
        let inner = router.tree().insert("inner", Some(host)).unwrap();
        router.tree().set_shadow_root(host, true).unwrap();

        let log = Arc::new(Mutex::new(Vec::new()));
        recorder(&router, host, &log);
        recorder(&router, outer, &log);

        let contained = Ping {
            kind: PingKind::Ping,
            init: EventInit {
                bubbles: true,
                composed: false,
            },
        };
        assert_eq!(router.dispatch(inner, &contained).unwrap().delivered, 0);

        assert_eq!(router.dispatch(inner, &Ping::bubbling()).unwrap().delivered, 2);
        assert_eq!(*log.lock(), vec![host, outer]);
    }

    #[test]
    fn test_kind_filtering() {
        let router = EventRouter::<Ping>::new();
        let node = router.tree().insert("node", None).unwrap();
        router.add_listener(node, PingKind::Pong, |_, _| panic!("wrong kind"));

        assert_eq!(router.dispatch(node, &Ping::bubbling()).unwrap().delivered, 0);
    }

    #[test]
    fn test_stop_propagation() {
        let router = EventRouter::<Ping>::new();
        let root = router.tree().insert("root", None).unwrap();
        let child = router.tree().insert("child", Some(root)).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        router.add_listener(child, PingKind::Ping, |_, ctx| ctx.stop_propagation());
        recorder(&router, root, &log);

        let result = router.dispatch(child, &Ping::bubbling()).unwrap();
        assert!(result.stopped);
        assert_eq!(result.delivered, 1);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_guard_detaches() {
        let router = EventRouter::<Ping>::new();
        let node = router.tree().insert("node", None).unwrap();
        {
            let _guard = router.add_listener_scoped(node, PingKind::Ping, |_, _| {});
            assert_eq!(router.listener_count_on(node), 1);
        }
        assert_eq!(router.listener_count(), 0);
    }

    #[test]
    fn test_remove_node_drops_listeners() {
        let router = EventRouter::<Ping>::new();
        let root = router.tree().insert("root", None).unwrap();
        let child = router.tree().insert("child", Some(root)).unwrap();
        router.add_listener(child, PingKind::Ping, |_, _| {});
        router.add_listener(root, PingKind::Ping, |_, _| {});

        router.remove_node(child).unwrap();
        assert_eq!(router.listener_count(), 1);
        assert!(router.dispatch(child, &Ping::bubbling()).is_err());
    }

    #[test]
    fn test_handler_may_remove_listener() {
        let router = EventRouter::<Ping>::new();
        let node = router.tree().insert("node", None).unwrap();
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&router);
        let slot_clone = slot.clone();
        let id = router.add_listener(node, PingKind::Ping, move |_, _| {
            if let (Some(router), Some(id)) = (weak.upgrade(), *slot_clone.lock()) {
                router.remove_listener(id);
            }
        });
        *slot.lock() = Some(id);

        assert_eq!(router.dispatch(node, &Ping::bubbling()).unwrap().delivered, 1);
        assert_eq!(router.dispatch(node, &Ping::bubbling()).unwrap().delivered, 0);
    }
}
