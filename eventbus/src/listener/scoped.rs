use std::collections::HashMap;

use crate::bus::EventBus;
use crate::error::BusError;
use crate::event::{Callback, Channel, EventId, ListenerId, UiPayload};

/// Remembers which ids an owner subscribed to so it can tear them all down at once.
///
/// Only the most recent callback per id is tracked, and bulk removal clears each
/// tracked id outright, including listeners other owners added to it.
#[derive(Debug)]
pub struct ScopedSubscriptions<C: Channel> {
    bus: EventBus<C>,
    handlers: HashMap<EventId, ListenerId>,
}

impl<C: Channel> ScopedSubscriptions<C> {
    pub fn new(bus: EventBus<C>) -> Self {
        Self {
            bus,
            handlers: HashMap::new(),
        }
    }

    pub fn add_listener<P: UiPayload>(&mut self, event_id: EventId, callback: Callback<P>) -> Result<(), BusError> {
        let id = callback.id();
        self.bus.add_listener(event_id, callback)?;
        self.handlers.insert(event_id, id);
        Ok(())
    }

    /// Stops tracking `event_id` whether or not `callback` was found on the bus.
    pub fn remove_listener<P: UiPayload>(&mut self, event_id: EventId, callback: &Callback<P>) -> bool {
        let removed = self.bus.remove_listener(event_id, callback);
        self.handlers.remove(&event_id);
        removed
    }

    pub fn remove_all_listeners(&mut self) {
        for event_id in self.handlers.keys() {
            self.bus.remove_all_listeners(*event_id);
        }

        log!(VERBOSE, "ScopedSubscriptions: released {} event id(s)", self.handlers.len());
        self.handlers.clear();
    }

    /// The callback most recently added for `event_id` through this scope.
    pub fn tracked(&self, event_id: EventId) -> Option<ListenerId> {
        self.handlers.get(&event_id).copied()
    }

    pub fn tracked_ids(&self) -> Vec<EventId> {
        let mut ids: Vec<EventId> = self.handlers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::{Channel, UiPayload};

    use super::*;

    #[derive(Channel)]
    struct Menus;

    #[derive(Clone, Debug, PartialEq, UiPayload)]
    struct ButtonPressed {
        button: u8,
    }

    #[derive(UiPayload)]
    struct Opened;

    fn pressed_log() -> (Arc<Mutex<Vec<u8>>>, Callback<ButtonPressed>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let callback = {
            let log = log.clone();
            Callback::new(move |event: &ButtonPressed| log.lock().unwrap().push(event.button))
        };
        (log, callback)
    }

    #[test]
    fn tracks_last_callback_per_id() {
        let bus = EventBus::<Menus>::new();
        let mut scope = ScopedSubscriptions::new(bus.clone());
        let (_, first) = pressed_log();
        let (_, second) = pressed_log();

        scope.add_listener(1, first.clone()).unwrap();
        scope.add_listener(1, second.clone()).unwrap();
        scope.add_listener(2, Callback::new(|_: &Opened| { })).unwrap();

        assert_eq!(scope.tracked(1), Some(second.id()));
        assert_eq!(scope.tracked_ids(), vec![1, 2]);
        assert_eq!(bus.listener_count(1), 2);
    }

    #[test]
    fn remove_listener_detaches_and_forgets() {
        let bus = EventBus::<Menus>::new();
        let mut scope = ScopedSubscriptions::new(bus.clone());
        let (log, pressed) = pressed_log();

        scope.add_listener(1, pressed.clone()).unwrap();
        bus.post_event(1, ButtonPressed { button: 4 }).unwrap();

        assert!(scope.remove_listener(1, &pressed));
        assert!(scope.tracked_ids().is_empty());
        bus.post_event(1, ButtonPressed { button: 5 }).unwrap();

        assert_eq!(*log.lock().unwrap(), vec![4]);
    }

    #[test]
    fn bulk_removal_clears_every_tracked_id() {
        let bus = EventBus::<Menus>::new();
        let mut scope = ScopedSubscriptions::new(bus.clone());
        let (log, pressed) = pressed_log();

        scope.add_listener(1, pressed).unwrap();
        scope.add_listener(2, Callback::new(|_: &Opened| { })).unwrap();
        bus.add_listener(3, Callback::new(|_: &Opened| { })).unwrap();

        scope.remove_all_listeners();

        assert!(scope.tracked_ids().is_empty());
        assert_eq!(bus.table().event_ids(), vec![3]);
        bus.post_event(1, ButtonPressed { button: 9 }).unwrap();
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn rejected_registration_is_not_tracked() {
        let bus = EventBus::<Menus>::new();
        bus.add_listener(1, Callback::new(|_: &Opened| { })).unwrap();

        let mut scope = ScopedSubscriptions::new(bus);
        let (_, pressed) = pressed_log();
        assert!(scope.add_listener(1, pressed).is_err());
        assert_eq!(scope.tracked(1), None);
    }
}
