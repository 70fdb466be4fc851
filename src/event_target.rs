//! Single-argument event dispatch.
//!
//! [`EventTarget`] is the primitive the [`EventEmitter`](crate::EventEmitter)
//! is built on: every listener receives exactly one [`Event`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Callback stored by an [`EventTarget`].
pub type EventCallback = Arc<dyn Fn(&Event) + Send + Sync + 'static>;

/// Identity of a registered listener, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Options applied when registering a listener.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerOptions {
    /// Remove the listener as part of the first dispatch that reaches it.
    pub once: bool,
}

/// An event delivered to listeners.
#[derive(Clone)]
pub struct Event {
    name: Arc<str>,
    detail: Option<Arc<dyn Any + Send + Sync>>,
    cancelable: bool,
    default_prevented: Arc<AtomicBool>,
}

impl Event {
    /// A plain event with no detail.
    pub fn new(name: &str) -> Self {
        Event {
            name: Arc::from(name),
            detail: None,
            cancelable: false,
            default_prevented: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach a detail value carried to every listener.
    pub fn with_detail<D: Any + Send + Sync>(mut self, detail: D) -> Self {
        self.detail = Some(Arc::new(detail));
        self
    }

    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_detail(&self) -> bool {
        self.detail.is_some()
    }

    /// The detail, if present and of type `D`.
    pub fn detail<D: Any>(&self) -> Option<&D> {
        self.detail.as_deref().and_then(|d| d.downcast_ref::<D>())
    }

    /// Marks a cancelable event as cancelled. Ignored otherwise.
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.store(true, Ordering::SeqCst);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("has_detail", &self.detail.is_some())
            .field("cancelable", &self.cancelable)
            .field("default_prevented", &self.default_prevented())
            .finish()
    }
}

struct Registration {
    id: ListenerId,
    once: bool,
    removed: Arc<AtomicBool>,
    callback: EventCallback,
}

/// A registry of named listeners that dispatches events synchronously.
#[derive(Default)]
pub struct EventTarget {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<String, Vec<Registration>>>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<F>(&self, name: &str, callback: F) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.add_listener_with(name, callback, ListenerOptions::default())
    }

    pub fn add_listener_with<F>(
        &self,
        name: &str,
        callback: F,
        options: ListenerOptions,
    ) -> ListenerId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registry()
            .entry(name.to_string())
            .or_default()
            .push(Registration {
                id,
                once: options.once,
                removed: Arc::new(AtomicBool::new(false)),
                callback: Arc::new(callback),
            });
        id
    }

    /// Returns `false` if no such listener was registered for `name`.
    pub fn remove_listener(&self, name: &str, id: ListenerId) -> bool {
        let mut registry = self.registry();
        let Some(list) = registry.get_mut(name) else {
            return false;
        };

        let before = list.len();
        list.retain(|reg| {
            if reg.id != id {
                return true;
            }
            reg.removed.store(true, Ordering::SeqCst);
            false
        });
        let removed = list.len() != before;
        if list.is_empty() {
            registry.remove(name);
        }
        removed
    }

    pub fn remove_all_listeners(&self, name: &str) {
        if let Some(list) = self.registry().remove(name) {
            for reg in list {
                reg.removed.store(true, Ordering::SeqCst);
            }
        }
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.registry().get(name).map_or(0, Vec::len)
    }

    /// Deliver `event` to the listeners registered for its name, in
    /// registration order.
    ///
    /// Returns `false` if the event was cancelable and a listener called
    /// [`Event::prevent_default`].
    pub fn dispatch(&self, event: &Event) -> bool {
        let callbacks: Vec<(Arc<AtomicBool>, EventCallback)> = {
            let mut registry = self.registry();
            match registry.get_mut(event.name()) {
                Some(list) => {
                    let callbacks = list
                        .iter()
                        .map(|reg| (Arc::clone(&reg.removed), Arc::clone(&reg.callback)))
                        .collect();
                    list.retain(|reg| !reg.once);
                    if list.is_empty() {
                        registry.remove(event.name());
                    }
                    callbacks
                }
                None => Vec::new(),
            }
        };

        // Lock released: listeners may register, remove or emit. Listeners
        // removed by an earlier callback of this dispatch are skipped.
        for (removed, callback) in callbacks {
            if !removed.load(Ordering::SeqCst) {
                callback(event);
            }
        }

        !event.default_prevented()
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<String, Vec<Registration>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry();
        let mut counts: Vec<(&str, usize)> =
            registry.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        counts.sort_unstable();
        f.debug_struct("EventTarget").field("listeners", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_dispatch_in_registration_order() {
        let target = EventTarget::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let order = Arc::clone(&order);
            target.add_listener("tick", move |_| order.lock().unwrap().push(i));
        }

        assert!(target.dispatch(&Event::new("tick")));
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_dispatch_other_name_is_ignored() {
        let target = EventTarget::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        target.add_listener("a", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        target.dispatch(&Event::new("b"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_once_option() {
        let target = EventTarget::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        target.add_listener_with(
            "a",
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            ListenerOptions { once: true },
        );

        target.dispatch(&Event::new("a"));
        target.dispatch(&Event::new("a"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(target.listener_count("a"), 0);
    }

    #[test]
    fn test_remove_unknown_listener_is_noop() {
        let target = EventTarget::new();
        let id = target.add_listener("a", |_| {});
        assert!(!target.remove_listener("b", id));
        assert!(target.remove_listener("a", id));
        assert!(!target.remove_listener("a", id));
    }

    #[test]
    fn test_listener_can_remove_itself_during_dispatch() {
        let target = Arc::new(EventTarget::new());
        let slot = Arc::new(Mutex::new(None));

        let inner_target = Arc::clone(&target);
        let inner_slot = Arc::clone(&slot);
        let id = target.add_listener("a", move |event| {
            if let Some(id) = *inner_slot.lock().unwrap() {
                inner_target.remove_listener(event.name(), id);
            }
        });
        *slot.lock().unwrap() = Some(id);

        target.dispatch(&Event::new("a"));
        assert_eq!(target.listener_count("a"), 0);
    }

    #[test]
    fn test_listener_removed_mid_dispatch_is_skipped() {
        let target = Arc::new(EventTarget::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let slot = Arc::new(Mutex::new(None));

        let inner_target = Arc::clone(&target);
        let inner_slot = Arc::clone(&slot);
        target.add_listener("a", move |event| {
            if let Some(id) = *inner_slot.lock().unwrap() {
                inner_target.remove_listener(event.name(), id);
            }
        });
        let counter = Arc::clone(&hits);
        let second = target.add_listener("a", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        *slot.lock().unwrap() = Some(second);

        target.dispatch(&Event::new("a"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(target.listener_count("a"), 1);
    }

    #[test]
    fn test_remove_all_mid_dispatch_skips_the_rest() {
        let target = Arc::new(EventTarget::new());
        let hits = Arc::new(AtomicUsize::new(0));

        let inner_target = Arc::clone(&target);
        target.add_listener("a", move |event| inner_target.remove_all_listeners(event.name()));
        for _ in 0..2 {
            let counter = Arc::clone(&hits);
            target.add_listener("a", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        target.dispatch(&Event::new("a"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(target.listener_count("a"), 0);
    }

    #[test]
    fn test_prevent_default() {
        let target = EventTarget::new();
        target.add_listener("a", |event| event.prevent_default());

        assert!(target.dispatch(&Event::new("a")));
        assert!(!target.dispatch(&Event::new("a").cancelable(true)));
    }

    #[test]
    fn test_detail_downcast() {
        let event = Event::new("a").with_detail(42u32);
        assert_eq!(event.detail::<u32>(), Some(&42));
        assert!(event.detail::<String>().is_none());
        assert!(!Event::new("a").has_detail());
    }
}
