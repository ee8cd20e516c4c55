//! Defines the frameflow event manager system.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

type CallbackMap = RefCell<HashMap<String, Vec<CallbackWrapper>>>;
pub type EventHandler = usize;

/// A single-threaded event manager.
///
/// Animations run cooperatively on the thread that drives their scheduler, so callbacks are
/// plain synchronous closures. Callbacks are stored behind shared handles: cloning an
/// `EventManager` gives another handle to the same callbacks, while [`EventManager::duplicate()`]
/// copies them into an independent manager.
#[derive(Clone, Default)]
pub struct EventManager {
    callbacks: Rc<CallbackMap>,
    next_id: Rc<Cell<usize>>,
}

#[derive(Clone)]
struct CallbackWrapper {
    id: EventHandler,
    /// Optional owner tag: allows an owner to strip all the callbacks it registered at once.
    tag: Option<usize>,
    callback: Rc<dyn Fn(Rc<dyn Any>)>,
}

impl EventManager {
    /// Register event handler for a specific event name.
    ///
    /// # Parameters
    /// * `event` - The event name (any type that matches an Into<String>)
    /// * `callback` - A callback that accepts a single parameter as an argument.
    ///                The argument can be anything `'static + Clone`.
    ///                You can trick multiple parameters by turning them in a single tuple.
    ///
    /// # Return
    /// Returns an EventHandler that can be used by the `unregister()` method.
    ///
    /// # Errors
    /// If the event handler does not match the expected emitted event exactly it will fail silently.
    /// That means if the type given in the callback parameter does not exactly match the emitted
    /// one, the handler is skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use frameflow::utils::EventManager;
    ///
    /// let events: EventManager = Default::default();
    ///
    /// events.on("ready", |name: String| println!("Hello {}", name));
    /// events.on("ready", |(name, age): (&'static str, u8)| {
    ///     println!("Event handler with parameters: {} {}.", name, age);
    /// });
    ///
    /// // Invoke handlers for "ready" event: only the tuple one matches.
    /// events.emit("ready", ("foo", 69u8));
    /// ```
    pub fn on<S, F, T>(&self, event: S, callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Clone,
        F: Fn(T) + 'static,
    {
        self.register(event.into(), None, callback)
    }

    /// Same as [`EventManager::on()`] with an owner `tag` attached to the handler.
    ///
    /// Tagged handlers can be removed all at once with [`EventManager::unregister_tagged()`].
    pub fn on_tagged<S, F, T>(&self, event: S, tag: usize, callback: F) -> EventHandler
    where
        S: Into<String>,
        T: 'static + Clone,
        F: Fn(T) + 'static,
    {
        self.register(event.into(), Some(tag), callback)
    }

    fn register<F, T>(&self, event_name: String, tag: Option<usize>, callback: F) -> EventHandler
    where
        T: 'static + Clone,
        F: Fn(T) + 'static,
    {
        let callback_event = event_name.clone();
        // Generate a unique ID.
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        // Wraps the callback and downcast its parameter.
        let wrapped = Rc::new(move |arg: Rc<dyn Any>| match arg.downcast_ref::<T>() {
            Some(arg) => callback(arg.clone()),
            None => log::warn!(
                "The callback for event '{}' could not be called because parameter does not match",
                callback_event
            ),
        });

        self.callbacks
            .borrow_mut()
            .entry(event_name)
            .or_default()
            .push(CallbackWrapper {
                id,
                tag,
                callback: wrapped,
            });

        id
    }

    /// Invoke all event handlers registered for a specific event name.
    /// Only the callbacks whose parameter type matches the payload will be called. All others
    /// will be silently skipped.
    ///
    /// The list of handlers is snapshotted before any callback runs: a callback may freely
    /// register or unregister handlers (including itself) on this manager.
    ///
    /// # Example
    ///
    /// ```
    /// use frameflow::utils::EventManager;
    ///
    /// let events: EventManager = Default::default();
    /// events.on("ready", |_: &'static str| println!("Callback 1"));
    /// events.on("ready", |_: u8| println!("Callback 2"));
    ///
    /// events.emit("ready", "foo");
    /// events.emit("ready", 42u8);
    /// // No event registered for "nothing" event.
    /// events.emit("nothing", ());
    /// ```
    pub fn emit<S, T>(&self, event: S, payload: T)
    where
        S: Into<String>,
        T: 'static,
    {
        let event: String = event.into();
        let snapshot: Vec<Rc<dyn Fn(Rc<dyn Any>)>> = match self.callbacks.borrow().get(&event) {
            None => return,
            Some(callbacks) => callbacks.iter().map(|w| w.callback.clone()).collect(),
        };
        let payload: Rc<dyn Any> = Rc::new(payload);
        for callback in snapshot {
            callback(payload.clone());
        }
    }

    /// Unregister a given handler if found.
    pub fn unregister(&self, handler: EventHandler) {
        self.callbacks
            .borrow_mut()
            .values_mut()
            .for_each(|v| v.retain(|cb| cb.id != handler));
    }

    /// Unregister all handlers registered with the given tag.
    pub fn unregister_tagged(&self, tag: usize) {
        self.callbacks
            .borrow_mut()
            .values_mut()
            .for_each(|v| v.retain(|cb| cb.tag != Some(tag)));
    }

    /// Unregister all handlers of the given event.
    pub fn unregister_event<S: Into<String>>(&self, event: S) {
        self.callbacks.borrow_mut().remove(&event.into());
    }

    /// Unregister all handlers.
    pub fn clear(&self) {
        self.callbacks.borrow_mut().clear();
    }

    /// Returns the number of handlers registered for the given event.
    pub fn count<S: Into<String>>(&self, event: S) -> usize {
        self.callbacks
            .borrow()
            .get(&event.into())
            .map_or(0, |callbacks| callbacks.len())
    }

    /// Copies all registered handlers in a new independent manager.
    ///
    /// The callbacks themselves are shared (they are immutable closures); registering or
    /// unregistering handlers on the copy never affects this manager.
    pub fn duplicate(&self) -> Self {
        Self {
            callbacks: Rc::new(RefCell::new(self.callbacks.borrow().clone())),
            next_id: Rc::new(Cell::new(self.next_id.get())),
        }
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let callbacks = self.callbacks.borrow();
        let count: usize = callbacks.values().map(|v| v.len()).sum();
        write!(f, "EventManager [handlers={}]", count)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_register_and_emit_event() {
        let events: EventManager = Default::default();
        let flag = Rc::new(Cell::new(false));

        events.on("register", |flag: Rc<Cell<bool>>| flag.set(true));
        events.emit("register", flag.clone());

        assert!(flag.get(), "The flag have been set by the triggered event.");
    }

    #[test]
    fn test_unregister_event_handler() {
        let events: EventManager = Default::default();
        let flag = Rc::new(Cell::new(false));

        let handler = events.on("unregister", |flag: Rc<Cell<bool>>| flag.set(true));
        events.unregister(handler);
        events.emit("unregister", flag.clone());

        assert!(
            !flag.get(),
            "The event was unregistered: the flag have not been set."
        );
    }

    #[test]
    fn test_multiple_handlers() {
        let events: EventManager = Default::default();
        let counter = Rc::new(Cell::new(0));

        events.on("multiple", |counter: Rc<Cell<i32>>| counter.set(counter.get() + 1));
        events.on("multiple", |counter: Rc<Cell<i32>>| counter.set(counter.get() + 1));
        events.on("multiple", |(_, counter): (u8, Rc<Cell<i32>>)| {
            counter.set(counter.get() + 1)
        });

        events.emit("multiple", counter.clone());
        assert_eq!(counter.get(), 2, "The counter have been increased by 2.");
    }

    #[test]
    fn test_event_with_complex_payload() {
        let events: EventManager = Default::default();
        let container = Rc::new(Cell::new(0u8));

        events.on(
            "payload",
            |(number1, number2, container): (u8, u8, Rc<Cell<u8>>)| {
                container.set(number1 + number2)
            },
        );
        events.emit("payload", (42u8, 69u8, container.clone()));

        assert_eq!(container.get(), 111, "The complex payload has been properly received.");
    }

    #[test]
    fn test_no_handlers_for_event() {
        let events: EventManager = Default::default();
        events.emit("no_event", ());
        assert_eq!(events.count("no_event"), 0, "Nothing to do.");
    }

    #[test]
    fn test_handler_unregisters_itself_while_emitting() {
        let events: EventManager = Default::default();
        let counter = Rc::new(Cell::new(0));
        let slot: Rc<Cell<Option<EventHandler>>> = Default::default();

        let handler = events.on("once", {
            let events = events.clone();
            let slot = slot.clone();
            move |counter: Rc<Cell<i32>>| {
                counter.set(counter.get() + 1);
                if let Some(handler) = slot.get() {
                    events.unregister(handler);
                }
            }
        });
        slot.set(Some(handler));
        events.on("once", |counter: Rc<Cell<i32>>| counter.set(counter.get() + 10));

        events.emit("once", counter.clone());
        assert_eq!(counter.get(), 11, "Both handlers ran during the first emission.");
        assert_eq!(events.count("once"), 1, "The self-removing handler is gone.");

        events.emit("once", counter.clone());
        assert_eq!(counter.get(), 21, "Only the remaining handler ran afterwards.");
    }

    #[test]
    fn test_handler_registers_while_emitting() {
        let events: EventManager = Default::default();
        let counter = Rc::new(Cell::new(0));

        events.on("grow", {
            let events = events.clone();
            move |counter: Rc<Cell<i32>>| {
                counter.set(counter.get() + 1);
                events.on("grow", |counter: Rc<Cell<i32>>| counter.set(counter.get() + 100));
            }
        });

        events.emit("grow", counter.clone());
        assert_eq!(counter.get(), 1, "Handlers added while emitting wait for the next emission.");
        assert_eq!(events.count("grow"), 2);
    }

    #[test]
    fn test_tagged_handlers() {
        let events: EventManager = Default::default();
        events.on_tagged("tagged", 7, |_: ()| {});
        events.on_tagged("other", 7, |_: ()| {});
        events.on("tagged", |_: ()| {});

        events.unregister_tagged(7);
        assert_eq!(events.count("tagged"), 1);
        assert_eq!(events.count("other"), 0);
    }

    #[test]
    fn test_duplicate_is_independent() {
        let events: EventManager = Default::default();
        let counter = Rc::new(Cell::new(0));
        events.on("dup", |counter: Rc<Cell<i32>>| counter.set(counter.get() + 1));

        let copy = events.duplicate();
        copy.on("dup", |counter: Rc<Cell<i32>>| counter.set(counter.get() + 1));

        events.emit("dup", counter.clone());
        assert_eq!(counter.get(), 1);
        copy.emit("dup", counter.clone());
        assert_eq!(counter.get(), 3, "The copy kept the original handler and added its own.");

        events.clear();
        assert_eq!(events.count("dup"), 0);
        assert_eq!(copy.count("dup"), 2);
    }
}
