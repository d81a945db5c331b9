//! Listener registry: which listeners want which message kinds.
//!
//! The coordinator keeps one registry per channel and asks it, for every
//! drained message, who to deliver to and in what order.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

/// Maps a kind to the ordered listeners subscribed to it.
///
/// Registration order is delivery order. Registering a listener that is
/// already subscribed to a kind is a no-op, so re-registering a whole subtree
/// after adopting new regions never produces duplicate deliveries.
#[derive(Debug, Clone)]
pub struct ListenerRegistry<K, L> {
    listeners: HashMap<K, Vec<L>>,
}

impl<K, L> Default for ListenerRegistry<K, L> {
    fn default() -> Self {
        Self { listeners: HashMap::new() }
    }
}

impl<K, L> ListenerRegistry<K, L>
where
    K: Copy + Eq + Hash + Debug,
    L: Copy + Eq + Debug,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `listener` to `kind`. Returns `false` if it already was.
    pub fn register(&mut self, kind: K, listener: L) -> bool {
        let entry = self.listeners.entry(kind).or_default();
        if entry.contains(&listener) {
            debug!(?kind, ?listener, "listener already registered");
            return false;
        }
        entry.push(listener);
        true
    }

    /// Subscribe `listener` to every kind in `kinds`.
    pub fn register_all(&mut self, kinds: impl IntoIterator<Item = K>, listener: L) {
        for kind in kinds {
            self.register(kind, listener);
        }
    }

    /// Listeners for `kind` in registration order; empty if none registered.
    #[must_use]
    pub fn subscribers_for(&self, kind: K) -> &[L] {
        self.listeners.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn has_subscribers(&self, kind: K) -> bool {
        !self.subscribers_for(kind).is_empty()
    }

    /// Every kind with at least one subscriber, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = K> + '_ {
        self.listeners.iter().filter(|(_, ls)| !ls.is_empty()).map(|(k, _)| *k)
    }
}
