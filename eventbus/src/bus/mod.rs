use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;

use crate::config::BusConfig;
use crate::dispatch::{DispatchTable, ListenerFailure};
use crate::error::BusError;
use crate::event::{Callback, Channel, EventId};
use crate::util::lock;

lazy_static! {
    static ref GLOBAL_TABLES: Mutex<HashMap<TypeId, Arc<DispatchTable>>> = Mutex::new(HashMap::new());
}

/// Handle to the dispatch table of channel `C`. Clones share the table.
pub struct EventBus<C> {
    table: Arc<DispatchTable>,
    channel: PhantomData<fn() -> C>,
}

impl<C: Channel> EventBus<C> {
    /// A private bus, independent of the channel's global one.
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        Self::from_table(Arc::new(DispatchTable::with_config(config)))
    }

    fn from_table(table: Arc<DispatchTable>) -> Self {
        Self {
            table,
            channel: PhantomData,
        }
    }

    /// The process-wide bus for `C`, created with the default config on first use.
    pub fn global() -> Self {
        let mut tables = lock(&GLOBAL_TABLES);
        let table = tables.entry(TypeId::of::<C>()).or_insert_with(|| {
            log!(VERBOSE, "Creating global event table for channel {}", type_name::<C>());
            Arc::new(DispatchTable::new())
        });

        Self::from_table(table.clone())
    }

    /// Installs a fresh global table for `C` built from `config`. A table that was
    /// already installed is cleared first.
    pub fn init_global(config: BusConfig) -> Self {
        let table = Arc::new(DispatchTable::with_config(config));

        let previous = lock(&GLOBAL_TABLES).insert(TypeId::of::<C>(), table.clone());
        if let Some(previous) = previous {
            log!(INFO, "Replacing global event table for channel {}", type_name::<C>());
            previous.clear_all();
        }

        Self::from_table(table)
    }

    /// Clears and forgets the global table for `C`. The next `global()` starts empty.
    /// Handles obtained earlier keep pointing at the cleared table.
    pub fn shutdown_global() {
        let table = lock(&GLOBAL_TABLES).remove(&TypeId::of::<C>());
        if let Some(table) = table {
            log!(INFO, "Shutting down global event table for channel {}", type_name::<C>());
            table.clear_all();
        }
    }

    pub fn add_listener<P: 'static>(&self, event_id: EventId, callback: Callback<P>) -> Result<(), BusError> {
        self.table.add_listener(event_id, callback)
    }

    pub fn post_event<P: 'static>(&self, event_id: EventId, payload: P) -> Result<(), BusError> {
        self.table.post_event(event_id, payload)
    }

    pub fn post_default<P: Default + 'static>(&self, event_id: EventId) -> Result<(), BusError> {
        self.table.post_default::<P>(event_id)
    }

    pub fn remove_listener<P: 'static>(&self, event_id: EventId, callback: &Callback<P>) -> bool {
        self.table.remove_listener(event_id, callback)
    }

    pub fn remove_all_listeners(&self, event_id: EventId) {
        self.table.remove_all_listeners(event_id)
    }

    pub fn clear_all(&self) {
        self.table.clear_all()
    }

    pub fn listener_count(&self, event_id: EventId) -> usize {
        self.table.listener_count(event_id)
    }

    pub fn set_failure_hook<F>(&self, hook: F)
    where
        F: Fn(&ListenerFailure) + Send + Sync + 'static,
    {
        self.table.set_failure_hook(hook)
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    pub fn shares_table_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
    }
}

impl<C: Channel> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for EventBus<C> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            channel: PhantomData,
        }
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("channel", &type_name::<C>())
            .field("table", &self.table)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI32, Ordering};

    use crate::config::TypeCheck;
    use crate::Channel;

    use super::*;

    #[derive(Channel)]
    struct Gameplay;

    #[derive(Channel)]
    struct Interface;

    #[derive(Channel)]
    struct Restarted;

    #[derive(Channel)]
    struct Configured;

    fn summing(total: &Arc<AtomicI32>) -> Callback<i32> {
        let total = total.clone();
        Callback::new(move |value: &i32| { total.fetch_add(*value, Ordering::SeqCst); })
    }

    #[test]
    fn channels_have_separate_tables() {
        let gameplay = EventBus::<Gameplay>::new();
        let interface = EventBus::<Interface>::new();
        let total = Arc::new(AtomicI32::new(0));

        gameplay.add_listener(1, summing(&total)).unwrap();
        interface.post_event(1, 100).unwrap();
        assert_eq!(total.load(Ordering::SeqCst), 0);

        gameplay.post_event(1, 3).unwrap();
        assert_eq!(total.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn clones_share_a_table_but_new_buses_do_not() {
        let bus = EventBus::<Gameplay>::new();
        let total = Arc::new(AtomicI32::new(0));
        bus.clone().add_listener(1, summing(&total)).unwrap();

        assert_eq!(bus.listener_count(1), 1);
        assert!(bus.shares_table_with(&bus.clone()));
        assert!(!bus.shares_table_with(&EventBus::new()));
    }

    #[test]
    fn global_bus_lives_until_shutdown() {
        let total = Arc::new(AtomicI32::new(0));
        let first = EventBus::<Restarted>::global();
        first.add_listener(4, summing(&total)).unwrap();

        assert!(EventBus::<Restarted>::global().shares_table_with(&first));
        EventBus::<Restarted>::global().post_event(4, 2).unwrap();
        assert_eq!(total.load(Ordering::SeqCst), 2);

        EventBus::<Restarted>::shutdown_global();
        first.post_event(4, 5).unwrap();
        assert_eq!(total.load(Ordering::SeqCst), 2);

        let second = EventBus::<Restarted>::global();
        assert!(!second.shares_table_with(&first));
        assert_eq!(second.listener_count(4), 0);

        EventBus::<Restarted>::shutdown_global();
    }

    #[test]
    fn init_global_replaces_the_table() {
        let total = Arc::new(AtomicI32::new(0));
        let old = EventBus::<Configured>::global();
        old.add_listener(1, summing(&total)).unwrap();

        let new = EventBus::<Configured>::init_global(BusConfig::default().type_check(TypeCheck::Lenient));
        assert_eq!(old.listener_count(1), 0);
        assert!(EventBus::<Configured>::global().shares_table_with(&new));
        assert_eq!(new.table().config().type_check, TypeCheck::Lenient);

        EventBus::<Configured>::shutdown_global();
    }
}
