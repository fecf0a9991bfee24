//! The dispatch table: event id to listener chain, with snapshot dispatch.
//!
//! Locking discipline: the table lock is taken for mutation and for copying a chain
//! at the start of a post, and released before any listener runs. Listeners are free
//! to add, remove or post against the same table.

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, RwLock};

use crate::config::{BusConfig, TypeCheck};
use crate::error::BusError;
use crate::event::{Callback, EventId};
use crate::util::{lock, read, write};

use self::chain::Entry;
pub use self::failure::{FailureKind, ListenerFailure};

mod chain;
mod failure;

type FailureHook = Arc<dyn Fn(&ListenerFailure) + Send + Sync>;

fn log_failure(failure: &ListenerFailure) {
    log!(ERROR, "{}", failure);
}

pub struct DispatchTable {
    config: BusConfig,
    listeners: Mutex<HashMap<EventId, Entry>>,
    failure_hook: RwLock<FailureHook>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        Self {
            config,
            listeners: Mutex::new(HashMap::new()),
            failure_hook: RwLock::new(Arc::new(log_failure)),
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Appends `callback` to the chain for `event_id`, creating the chain if needed.
    ///
    /// Adding the same callback twice makes it run twice per post. Fails only when the
    /// id already has listeners for a different payload type.
    pub fn add_listener<P: 'static>(&self, event_id: EventId, callback: Callback<P>) -> Result<(), BusError> {
        let mut listeners = lock(&self.listeners);
        let entry = listeners.entry(event_id).or_insert_with(Entry::new::<P>);
        let registered = entry.payload_type();

        match entry.downcast_mut::<P>() {
            Some(chain) => {
                chain.push(callback);
                Ok(())
            },
            None => Err(BusError::TypeMismatch {
                event_id,
                registered,
                posted: type_name::<P>(),
            }),
        }
    }

    /// Runs every listener registered for `event_id` at the moment of the call, in
    /// registration order.
    ///
    /// A listener that returns an error or panics is reported to the failure hook and
    /// the remaining listeners still run. The only error is a payload type mismatch
    /// under [`TypeCheck::Strict`].
    pub fn post_event<P: 'static>(&self, event_id: EventId, payload: P) -> Result<(), BusError> {
        let snapshot = {
            let listeners = lock(&self.listeners);

            let entry = match listeners.get(&event_id) {
                Some(entry) => entry,
                None => return Ok(()),
            };

            let snapshot = match entry.downcast_ref::<P>() {
                Some(chain) => chain.snapshot(),
                None => {
                    let error = BusError::TypeMismatch {
                        event_id,
                        registered: entry.payload_type(),
                        posted: type_name::<P>(),
                    };
                    return match self.config.type_check {
                        TypeCheck::Strict => Err(error),
                        TypeCheck::Lenient => {
                            log!(INFO, "{}; post ignored", error);
                            Ok(())
                        },
                    };
                },
            };

            snapshot
        };

        let hook = read(&self.failure_hook).clone();

        for callback in snapshot.iter() {
            let (kind, message) = match panic::catch_unwind(AssertUnwindSafe(|| callback.call(&payload))) {
                Ok(Ok(())) => continue,
                Ok(Err(error)) => (FailureKind::Returned, error.to_string()),
                Err(panic) => (FailureKind::Panicked, failure::panic_message(&*panic)),
            };

            let report = ListenerFailure {
                event_id,
                listener: callback.id(),
                name: callback.name().map(str::to_string),
                payload_type: type_name::<P>(),
                kind,
                message,
            };

            if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| hook(&report))) {
                log!(ERROR, "Failure hook panicked ({}) while reporting: {}", failure::panic_message(&*panic), report);
            }
        }

        Ok(())
    }

    /// Posts `P::default()`.
    pub fn post_default<P: Default + 'static>(&self, event_id: EventId) -> Result<(), BusError> {
        self.post_event(event_id, P::default())
    }

    /// Detaches `callback` from `event_id` according to the configured removal policy.
    /// The entry is dropped once its chain is empty. Returns whether anything was removed.
    pub fn remove_listener<P: 'static>(&self, event_id: EventId, callback: &Callback<P>) -> bool {
        let mut listeners = lock(&self.listeners);

        let (removed, emptied) = match listeners.get_mut(&event_id).and_then(Entry::downcast_mut::<P>) {
            Some(chain) => {
                let removed = chain.remove(callback, self.config.removal);
                (removed > 0, chain.is_empty())
            },
            None => return false,
        };

        if emptied {
            listeners.remove(&event_id);
        }

        removed
    }

    /// Drops the whole chain for `event_id`. The chain is dropped after the lock is
    /// released, so listener captures may call back into the table from their destructors.
    pub fn remove_all_listeners(&self, event_id: EventId) {
        let removed = lock(&self.listeners).remove(&event_id);
        drop(removed);
    }

    /// Drops every chain, outside the lock like `remove_all_listeners`.
    pub fn clear_all(&self) {
        let removed = mem::take(&mut *lock(&self.listeners));
        drop(removed);
    }

    pub fn listener_count(&self, event_id: EventId) -> usize {
        lock(&self.listeners).get(&event_id).map_or(0, Entry::len)
    }

    pub fn contains(&self, event_id: EventId) -> bool {
        lock(&self.listeners).contains_key(&event_id)
    }

    /// Ids with at least one listener, in ascending order.
    pub fn event_ids(&self) -> Vec<EventId> {
        let mut ids: Vec<EventId> = lock(&self.listeners).keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.listeners).is_empty()
    }

    /// Replaces the hook that receives contained listener failures. The default logs them.
    pub fn set_failure_hook<F>(&self, hook: F)
    where
        F: Fn(&ListenerFailure) + Send + Sync + 'static,
    {
        *write(&self.failure_hook) = Arc::new(hook);
    }

    pub fn reset_failure_hook(&self) {
        *write(&self.failure_hook) = Arc::new(log_failure);
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let listeners = lock(&self.listeners);
        let mut counts: Vec<(EventId, usize)> = listeners.iter().map(|(id, entry)| (*id, entry.len())).collect();
        counts.sort_unstable();

        f.debug_struct("DispatchTable")
            .field("config", &self.config)
            .field("listeners", &counts)
            .finish()
    }
}
