//! Synchronous notifications inside a component.
//!
//! A [`Signal`] notifies every connected slot, in connection order, on the
//! emitting thread. Components use signals for notifications that never leave
//! the component, such as a disclosure telling its header that it was
//! toggled; anything other components may observe goes through the
//! [`EventRouter`](crate::EventRouter) instead.
//!
//! ```
//! use chatkit_core::Signal;
//!
//! let toggled = Signal::<bool>::new();
//! let id = toggled.connect(|open| println!("open: {open}"));
//!
//! assert_eq!(toggled.emit(true), 1);
//! toggled.disconnect(id);
//! assert_eq!(toggled.emit(false), 0);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::error::SignalError;
use crate::logging::targets;

new_key_type! {
    /// Handle of one connected slot.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

struct Connection<Args> {
    seq: u64,
    slot: Slot<Args>,
}

/// A notification with typed arguments.
///
/// Slots receive `&Args`; signals without a payload use `()`.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    next_seq: AtomicU64,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create an unconnected signal.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Connect `slot`. It runs on every emit until disconnected.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.connections.lock().insert(Connection {
            seq,
            slot: Arc::new(slot),
        })
    }

    /// Remove one slot. Returns `false` if `id` was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Invoke every slot with `args`, oldest connection first, and return
    /// how many ran.
    ///
    /// Slots run against a snapshot of the connections taken before the first
    /// one is called; connecting or disconnecting from inside a slot affects
    /// the next emit only.
    #[tracing::instrument(skip_all, target = "chatkit_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) -> usize {
        let slots = self.snapshot();
        tracing::trace!(target: targets::SIGNAL, slots = slots.len(), "emit");

        for slot in &slots {
            slot(&args);
        }
        slots.len()
    }

    fn snapshot(&self) -> Vec<Slot<Args>> {
        let connections = self.connections.lock();
        let mut ordered: Vec<(u64, Slot<Args>)> = connections
            .values()
            .map(|connection| (connection.seq, connection.slot.clone()))
            .collect();
        ordered.sort_by_key(|(seq, _)| *seq);
        ordered.into_iter().map(|(_, slot)| slot).collect()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Connect a slot that is disconnected when the returned guard is dropped.
    ///
    /// The guard only holds a weak reference, so it never keeps the signal
    /// alive. Dropping the guard after the signal is gone is a no-op.
    pub fn connect_scoped<F>(self: &Arc<Self>, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            signal: Arc::downgrade(self),
            id: Some(id),
        }
    }
}

/// Keeps a slot connected for as long as it lives.
///
/// Returned by [`Signal::connect_scoped`]. Components store the guard next to
/// the state the slot touches and drop it on teardown.
///
/// ```
/// use std::sync::Arc;
/// use chatkit_core::Signal;
///
/// let toggled = Arc::new(Signal::<bool>::new());
/// let guard = toggled.connect_scoped(|_| {});
/// assert_eq!(toggled.connection_count(), 1);
///
/// drop(guard);
/// assert_eq!(toggled.connection_count(), 0);
/// ```
pub struct ConnectionGuard<Args: 'static> {
    signal: Weak<Signal<Args>>,
    id: Option<ConnectionId>,
}

impl<Args: 'static> ConnectionGuard<Args> {
    /// The guarded connection, if it has not been released yet.
    pub fn id(&self) -> Option<ConnectionId> {
        self.id
    }

    /// Disconnect now and report what happened.
    pub fn disconnect(mut self) -> Result<(), SignalError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), SignalError> {
        let id = self.id.take().ok_or(SignalError::InvalidConnection)?;
        let signal = self.signal.upgrade().ok_or(SignalError::SignalDropped)?;
        if signal.disconnect(id) {
            Ok(())
        } else {
            Err(SignalError::InvalidConnection)
        }
    }
}

impl<Args: 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if self.id.is_some() {
            if let Err(err) = self.release() {
                tracing::trace!(target: targets::SIGNAL, %err, "scoped connection already gone");
            }
        }
    }
}

impl<Args: 'static> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .finish()
    }
}

impl<Args: 'static> fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionGuard").field("id", &self.id).finish()
    }
}

static_assertions::assert_impl_all!(Signal<bool>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard<bool>: Send, Sync);
