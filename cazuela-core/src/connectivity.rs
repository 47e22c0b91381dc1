//! Connectivity monitor seam.
//!
//! The platform layer (React-to-native bridge, NetworkManager, whatever the
//! host provides) implements [`ConnectivityMonitor`]; the workflow only ever
//! does a synchronous read of the latest known state. [`SharedMonitor`] is
//! the shipped implementation: the UI layer pushes platform callbacks into
//! it and subscribes for change notifications.

use std::sync::{Mutex, RwLock};

use crate::types::ConnectivityState;

/// Read access to the current network state.
///
/// `current` is a non-suspending read of cached state, not a probe; the
/// submission router calls it exactly once per attempt.
pub trait ConnectivityMonitor: Send + Sync {
    fn current(&self) -> ConnectivityState;
}

/// Callback invoked when the connectivity state changes.
pub type ConnectivityCallback = Box<dyn Fn(ConnectivityState) + Send + Sync>;

/// Connectivity state holder fed by the platform layer.
pub struct SharedMonitor {
    state: RwLock<ConnectivityState>,
    subscribers: Mutex<Vec<ConnectivityCallback>>,
}

impl SharedMonitor {
    pub fn new(initial: ConnectivityState) -> Self {
        Self {
            state: RwLock::new(initial),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Record a new state and notify subscribers. No-op notifications are
    /// suppressed so UI callbacks don't fire on duplicate platform events.
    pub fn set_state(&self, state: ConnectivityState) {
        {
            let mut current = self.state.write().unwrap();
            if *current == state {
                return;
            }
            *current = state;
        }
        tracing::debug!(reachable = state.reachable, transport = ?state.transport, "connectivity changed");
        for callback in self.subscribers.lock().unwrap().iter() {
            callback(state);
        }
    }

    /// Register a callback for state changes.
    pub fn subscribe(&self, callback: ConnectivityCallback) {
        self.subscribers.lock().unwrap().push(callback);
    }
}

impl ConnectivityMonitor for SharedMonitor {
    fn current(&self) -> ConnectivityState {
        *self.state.read().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::types::Transport;

    #[test]
    fn current_reflects_latest_state() {
        let monitor = SharedMonitor::new(ConnectivityState::offline());
        assert!(!monitor.current().reachable);

        monitor.set_state(ConnectivityState::wifi());
        assert_eq!(monitor.current().transport, Transport::Wifi);
    }

    #[test]
    fn subscribers_fire_on_change_only() {
        let monitor = SharedMonitor::new(ConnectivityState::offline());
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = fired.clone();
        monitor.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        monitor.set_state(ConnectivityState::offline()); // duplicate
        monitor.set_state(ConnectivityState::cellular());
        monitor.set_state(ConnectivityState::cellular()); // duplicate
        monitor.set_state(ConnectivityState::wifi());

        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }
}
