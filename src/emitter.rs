//! Multi-argument event emitter.
//!
//! [`EventEmitter`] sits on top of an [`EventTarget`], whose listeners only
//! ever see a single [`Event`]. Arguments passed to [`EventEmitter::emit`] are
//! boxed into an envelope carried as the event's detail, and unpacked again
//! for each listener so that it is called with its arguments spread out.
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use wled_rs::EventEmitter;
//!
//! let emitter = EventEmitter::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! let id = emitter.on("segment", move |index: u8, name: String| {
//!     sink.lock().unwrap().push(format!("{index}:{name}"));
//! });
//!
//! emitter.emit("segment", (0u8, String::from("strip")));
//! emitter.off("segment", id);
//! emitter.emit("segment", (1u8, String::from("ring")));
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["0:strip"]);
//! ```

use std::any::Any;

use log::debug;

use crate::event_target::{Event, EventTarget, ListenerId, ListenerOptions};

/// Values that can be emitted as a listener's positional arguments.
///
/// Implemented for tuples of zero to four cloneable, thread-safe values,
/// matching the arities a [`Listener`] accepts. A bare value is rejected, so a
/// single argument is passed as a one-element tuple:
///
/// ```compile_fail
/// use wled_rs::EventEmitter;
///
/// let emitter = EventEmitter::new();
/// emitter.emit("value", 3u32);
/// ```
///
/// ```
/// use wled_rs::EventEmitter;
///
/// let emitter = EventEmitter::new();
/// emitter.emit("value", (3u32,));
/// ```
pub trait EventArgs: sealed::Sealed + Clone + Send + Sync + 'static {}

mod sealed {
    pub trait Sealed {}
}

macro_rules! impl_event_args {
    ($($arg:ident),*) => {
        impl<$($arg,)*> sealed::Sealed for ($($arg,)*)
        where
            $($arg: Clone + Send + Sync + 'static,)*
        {
        }

        impl<$($arg,)*> EventArgs for ($($arg,)*)
        where
            $($arg: Clone + Send + Sync + 'static,)*
        {
        }
    };
}

impl_event_args!();
impl_event_args!(A);
impl_event_args!(A, B);
impl_event_args!(A, B, C);
impl_event_args!(A, B, C, D);

/// A callback invoked with the positional arguments of an emitted event.
///
/// Implemented for closures taking zero to four arguments, where `Args` is the
/// tuple of their parameter types. A listener taking a single [`Event`] also
/// receives events dispatched directly on the underlying [`EventTarget`].
pub trait Listener<Args>: Send + Sync + 'static {
    fn call(&self, args: Args);
}

macro_rules! impl_listener {
    ($($arg:ident),*) => {
        impl<F, $($arg,)*> Listener<($($arg,)*)> for F
        where
            F: Fn($($arg),*) + Send + Sync + 'static,
        {
            #[allow(non_snake_case)]
            fn call(&self, ($($arg,)*): ($($arg,)*)) {
                self($($arg),*)
            }
        }
    };
}

impl_listener!();
impl_listener!(A);
impl_listener!(A, B);
impl_listener!(A, B, C);
impl_listener!(A, B, C, D);

/// Carries one `emit` call's arguments through the event target.
struct Envelope {
    args: Box<dyn Any + Send + Sync>,
}

/// Event emitter whose listeners receive positional arguments.
#[derive(Debug, Default)]
pub struct EventEmitter {
    target: EventTarget,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `name`.
    ///
    /// The returned id is the only handle that removes the listener again.
    pub fn on<A, L>(&self, name: &str, listener: L) -> ListenerId
    where
        A: EventArgs,
        L: Listener<A>,
    {
        self.target
            .add_listener_with(name, adapt(listener), ListenerOptions::default())
    }

    /// Registers `listener` for the next `name` event only.
    ///
    /// The listener is dropped from the registry by the same dispatch that
    /// delivers to it, so it runs at most once even if events are emitted
    /// concurrently.
    pub fn once<A, L>(&self, name: &str, listener: L) -> ListenerId
    where
        A: EventArgs,
        L: Listener<A>,
    {
        self.target
            .add_listener_with(name, adapt(listener), ListenerOptions { once: true })
    }

    /// Removes a listener registered with [`on`](Self::on) or
    /// [`once`](Self::once). Unknown ids are ignored.
    pub fn off(&self, name: &str, id: ListenerId) -> bool {
        self.target.remove_listener(name, id)
    }

    pub fn remove_all_listeners(&self, name: &str) {
        self.target.remove_all_listeners(name)
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.target.listener_count(name)
    }

    /// Calls every listener of `name` with `args`, in registration order.
    ///
    /// Returns `true` unless the event was cancelled, which emitted events
    /// never are.
    pub fn emit<A: EventArgs>(&self, name: &str, args: A) -> bool {
        let event = Event::new(name).with_detail(Envelope {
            args: Box::new(args),
        });
        self.target.dispatch(&event)
    }

    /// The underlying single-argument dispatcher.
    pub fn target(&self) -> &EventTarget {
        &self.target
    }
}

fn adapt<A, L>(listener: L) -> impl Fn(&Event) + Send + Sync + 'static
where
    A: EventArgs,
    L: Listener<A>,
{
    move |event: &Event| match unpack::<A>(event) {
        Some(args) => listener.call(args),
        None => debug!(
            "skipping {:?} listener: arguments do not match its signature",
            event.name()
        ),
    }
}

fn unpack<A: EventArgs>(event: &Event) -> Option<A> {
    if let Some(envelope) = event.detail::<Envelope>() {
        return envelope.args.downcast_ref::<A>().cloned();
    }

    // Not emitted through an EventEmitter: hand over the raw event.
    let raw: Box<dyn Any> = Box::new((event.clone(),));
    raw.downcast::<A>().ok().map(|args| *args)
}
