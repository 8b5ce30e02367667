use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::{Rc, Weak};

/// Keyed store of server-derived data.
///
/// One slot per key, holding the last written value, a staleness flag, and
/// two epoch counters: the fetch epoch guards in-flight reads against
/// cancellation, the write epoch identifies the latest writer so a rollback
/// can tell whether its optimistic insert is still the newest mutation.
///
/// Handles are cheap clones of one shared store. All mutation goes through
/// the methods here; slots are never removed, so epoch counters survive a
/// restore back to "absent".
pub struct QueryCache<K, V> {
    slots: Rc<RefCell<HashMap<K, Slot<V>>>>,
    listeners: ListenerList,
    next_listener_id: Rc<Cell<u64>>,
}

type ListenerList = Rc<RefCell<Vec<(u64, Box<dyn Fn()>)>>>;

impl<K, V> Clone for QueryCache<K, V> {
    fn clone(&self) -> Self {
        QueryCache {
            slots: self.slots.clone(),
            listeners: self.listeners.clone(),
            next_listener_id: self.next_listener_id.clone(),
        }
    }
}

struct Slot<V> {
    value: Option<V>,
    stale: bool,
    fetch_epoch: u64,
    write_epoch: u64,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Slot {
            value: None,
            stale: false,
            fetch_epoch: 0,
            write_epoch: 0,
        }
    }
}

/// Identifies a `set` so a later `restore` can check it is still the
/// key's latest write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteToken(u64);

/// Issued by `begin_fetch`; a fetch result is dropped unless the token is
/// still current when the fetch settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

/// Removes its listener from the cache when dropped. Listener closures
/// typically capture a cache handle, so keeping them registered forever
/// would leak the store through the reference cycle; holding the
/// listener list weakly here keeps the guard itself out of that cycle.
#[must_use = "the listener is removed as soon as this is dropped"]
pub struct Subscription {
    listeners: Weak<RefCell<Vec<(u64, Box<dyn Fn()>)>>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

/// The captured value of a key before a mutation, possibly absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<V>(Option<V>);

impl<V> Snapshot<V> {
    pub fn value(&self) -> Option<&V> {
        self.0.as_ref()
    }
}

impl<K: Eq + Hash + Clone, V: Clone> QueryCache<K, V> {
    pub fn new() -> Self {
        QueryCache {
            slots: Rc::new(RefCell::new(HashMap::new())),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener_id: Rc::new(Cell::new(0)),
        }
    }

    /// Register a listener invoked after every mutation. The listener
    /// stays registered only while the returned guard is alive.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Box::new(listener)));
        Subscription {
            listeners: Rc::downgrade(&self.listeners),
            id,
        }
    }

    fn notify(&self) {
        // Borrow of the slot map must be released before this runs;
        // listeners read the cache.
        for (_, listener) in self.listeners.borrow().iter() {
            listener();
        }
    }

    /// Clone of the cached value, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        self.slots
            .borrow()
            .get(key)
            .and_then(|slot| slot.value.clone())
    }

    /// Whether the next read must go to the server: no value, or the value
    /// was invalidated.
    pub fn needs_fetch(&self, key: &K) -> bool {
        match self.slots.borrow().get(key) {
            Some(slot) => slot.value.is_none() || slot.stale,
            None => true,
        }
    }

    /// Overwrite the value for `key`. Clears staleness and becomes the
    /// key's latest write.
    pub fn set(&self, key: K, value: V) -> WriteToken {
        let token = {
            let mut slots = self.slots.borrow_mut();
            let slot = slots.entry(key).or_default();
            slot.value = Some(value);
            slot.stale = false;
            slot.write_epoch += 1;
            WriteToken(slot.write_epoch)
        };
        self.notify();
        token
    }

    /// Capture the current value of `key` for a later `restore`.
    pub fn snapshot(&self, key: &K) -> Snapshot<V> {
        Snapshot(self.get(key))
    }

    /// Overwrite `key` back to `snapshot` (a full replacement, not a
    /// merge) provided the write identified by `token` is still the
    /// key's latest. Returns whether the restore applied; when it does
    /// not, a later writer owns the entry and the settle-time
    /// invalidation re-synchronizes instead.
    pub fn restore(&self, key: &K, snapshot: Snapshot<V>, token: WriteToken) -> bool {
        let applied = {
            let mut slots = self.slots.borrow_mut();
            match slots.get_mut(key) {
                Some(slot) if slot.write_epoch == token.0 => {
                    slot.value = snapshot.0;
                    slot.write_epoch += 1;
                    true
                }
                _ => false,
            }
        };
        if applied {
            self.notify();
        }
        applied
    }

    /// Mark `key` stale so the next read re-fetches. Idempotent: a second
    /// invalidation observes nothing left to do.
    pub fn invalidate(&self, key: &K) {
        let changed = {
            let mut slots = self.slots.borrow_mut();
            match slots.get_mut(key) {
                Some(slot) if !slot.stale => {
                    slot.stale = true;
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Start a read for `key`. The returned token must be presented to
    /// `settle_fetch`; a `cancel_fetches` or a newer `begin_fetch` in
    /// between voids it, so of several overlapping reads only the most
    /// recently started one may write.
    pub fn begin_fetch(&self, key: &K) -> FetchToken {
        let mut slots = self.slots.borrow_mut();
        let slot = slots.entry(key.clone()).or_default();
        slot.fetch_epoch += 1;
        FetchToken(slot.fetch_epoch)
    }

    /// Store a fetch result unless the fetch was cancelled meanwhile.
    /// Returns whether the value was written.
    pub fn settle_fetch(&self, key: K, token: FetchToken, value: V) -> bool {
        let written = {
            let mut slots = self.slots.borrow_mut();
            let slot = slots.entry(key).or_default();
            if slot.fetch_epoch == token.0 {
                slot.value = Some(value);
                slot.stale = false;
                slot.write_epoch += 1;
                true
            } else {
                false
            }
        };
        if written {
            self.notify();
        }
        written
    }

    /// Void every outstanding fetch token for `key`. Best effort by
    /// design: the network call keeps running, but its result can no
    /// longer overwrite the cache entry.
    pub fn cancel_fetches(&self, key: &K) {
        let mut slots = self.slots.borrow_mut();
        slots.entry(key.clone()).or_default().fetch_epoch += 1;
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
