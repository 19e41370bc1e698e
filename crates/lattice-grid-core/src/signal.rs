//! Signal/slot system for Lattice Grid.
//!
//! This module provides a type-safe, Qt-inspired signal/slot mechanism for
//! notifications between the list providers, the list adapter and the grid.
//! Signals are emitted when state changes, and connected slots (callbacks)
//! are invoked in response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Re-entrancy
//!
//! Emission is synchronous: every slot runs to completion before
//! [`Signal::emit`] returns. The connection table is snapshotted before any
//! slot runs and no lock is held while slots execute, so a slot may connect,
//! disconnect, or emit again on the very signal that invoked it. Slots
//! connected during an emission are first invoked by the next emission;
//! slots disconnected during an emission are skipped if they have not run
//! yet.
//!
//! # Example
//!
//! ```
//! use lattice_grid_core::Signal;
//!
//! // Create a signal that passes a row index
//! let row_added = Signal::<usize>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = row_added.connect(|row| {
//!     println!("Row added at: {}", row);
//! });
//!
//! // Emit the signal
//! row_added.emit(3);
//!
//! // Disconnect when done
//! row_added.disconnect(conn_id);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A type-safe signal that can have multiple connected slots.
///
/// When a signal is emitted, all connected slots are invoked in connection
/// order with a reference to the provided arguments.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(usize, usize)` for multiple arguments.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync`. Slots are always invoked on the emitting
/// thread.
pub struct Signal<Args> {
    /// All active connections, plus the order they were made in.
    connections: Mutex<Connections<Args>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

struct Connections<Args> {
    slots: SlotMap<ConnectionId, Slot<Args>>,
    order: Vec<ConnectionId>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(Connections {
                slots: SlotMap::with_key(),
                order: Vec::new(),
            }),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use lattice_grid_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let mut connections = self.connections.lock();
        let id = connections.slots.insert(Arc::new(slot));
        connections.order.push(id);
        id
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock();
        if connections.slots.remove(id).is_some() {
            connections.order.retain(|other| *other != id);
            true
        } else {
            false
        }
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        let mut connections = self.connections.lock();
        connections.slots.clear();
        connections.order.clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().slots.len()
    }

    /// Returns `true` if the given connection is still live.
    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.connections.lock().slots.contains_key(id)
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` will do nothing. This is useful
    /// during batch updates to prevent cascading notifications.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots synchronously.
    ///
    /// If the signal is blocked, this does nothing.
    #[tracing::instrument(skip_all, target = "lattice_grid_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let snapshot: Vec<(ConnectionId, Slot<Args>)> = {
            let connections = self.connections.lock();
            connections
                .order
                .iter()
                .filter_map(|id| connections.slots.get(*id).map(|slot| (*id, slot.clone())))
                .collect()
        };
        tracing::trace!(target: targets::SIGNAL, connection_count = snapshot.len(), "emitting signal");

        for (id, slot) in snapshot {
            // A slot that ran earlier in this emission may have disconnected it.
            if !self.is_connected(id) {
                continue;
            }
            slot(&args);
        }
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// Unlike a bare [`ConnectionId`], the guard keeps the signal alive through an
/// `Arc`, so it can never outlive the signal it refers to.
///
/// # Example
///
/// ```
/// use lattice_grid_core::Signal;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let signal = Arc::new(Signal::<usize>::new());
/// let counter = Arc::new(AtomicUsize::new(0));
/// {
///     let counter_clone = counter.clone();
///     let _guard = Signal::connect_scoped(&signal, move |&n| {
///         counter_clone.fetch_add(n, Ordering::SeqCst);
///     });
///     signal.emit(42);
/// }
/// signal.emit(43);  // Nothing happens - connection was dropped
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// ```
pub struct ConnectionGuard<Args: 'static> {
    signal: Arc<Signal<Args>>,
    id: ConnectionId,
}

impl<Args: 'static> Signal<Args> {
    /// Connect a slot that is disconnected when the returned guard is dropped.
    pub fn connect_scoped<F>(signal: &Arc<Self>, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = signal.connect(slot);
        ConnectionGuard {
            signal: signal.clone(),
            id,
        }
    }
}

impl<Args: 'static> ConnectionGuard<Args> {
    /// The ID of the guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args: 'static> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        self.signal.disconnect(self.id);
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(Signal<(usize, usize)>: Send, Sync);
