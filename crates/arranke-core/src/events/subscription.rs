//! Listener registration shared by every push capability
//!
//! A [`Subscription`] releases its listener when `unsubscribe` is called or
//! when it is dropped, whichever comes first. Release is idempotent.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Release = Box<dyn FnOnce() + Send + Sync>;

/// Handle to a registered listener
pub struct Subscription {
    release: Option<Release>,
}

impl Subscription {
    /// Create a handle that runs `release` exactly once
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle that holds nothing (e.g. the source was already gone)
    pub fn detached() -> Self {
        Self { release: None }
    }

    /// Release the listener now
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<u64, Listener<T>>>,
}

/// An ordered set of callbacks for one event source
pub struct ListenerSet<T> {
    inner: Arc<Inner<T>>,
}

impl<T: 'static> ListenerSet<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(1),
                listeners: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    /// Register a listener; it stays registered while the handle lives
    pub fn add(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().insert(id, Arc::new(listener));

        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.lock().remove(&id);
            }
        })
    }

    /// Invoke every listener with `value`
    ///
    /// Listeners are snapshotted first so a callback may subscribe or
    /// unsubscribe without deadlocking.
    pub fn emit(&self, value: &T) -> usize {
        let snapshot: Vec<Listener<T>> = self.inner.listeners.lock().values().cloned().collect();
        for listener in &snapshot {
            listener(value);
        }
        snapshot.len()
    }

    pub fn len(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: 'static> Default for ListenerSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ListenerSet<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ListenerSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.inner.listeners.lock().len())
            .finish()
    }
}
