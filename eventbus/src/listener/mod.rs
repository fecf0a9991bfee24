use crate::bus::EventBus;
use crate::error::BusError;
use crate::event::Channel;

pub use self::scoped::ScopedSubscriptions;

mod scoped;

/// An owner that subscribes while it is active.
pub trait EventListener<C: Channel> {
    fn register_events(&mut self, bus: &EventBus<C>) -> Result<(), BusError>;
    fn unregister_events(&mut self, bus: &EventBus<C>);
}

/// Drives an [`EventListener`] through enable/disable transitions.
///
/// Each transition runs at most once per change of state, and dropping an enabled
/// lifecycle unregisters, so no listener outlives its owner.
pub struct Lifecycle<C: Channel, L: EventListener<C>> {
    bus: EventBus<C>,
    listener: L,
    enabled: bool,
}

impl<C: Channel, L: EventListener<C>> Lifecycle<C, L> {
    /// Starts disabled.
    pub fn new(bus: EventBus<C>, listener: L) -> Self {
        Self {
            bus,
            listener,
            enabled: false,
        }
    }

    /// If registration fails, whatever was registered is unregistered again and the
    /// lifecycle stays disabled.
    pub fn enable(&mut self) -> Result<(), BusError> {
        if self.enabled {
            return Ok(());
        }

        if let Err(error) = self.listener.register_events(&self.bus) {
            log!(ERROR, "Lifecycle::enable: {}", error);
            self.listener.unregister_events(&self.bus);
            return Err(error);
        }

        self.enabled = true;
        Ok(())
    }

    pub fn disable(&mut self) {
        if self.enabled {
            self.listener.unregister_events(&self.bus);
            self.enabled = false;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn bus(&self) -> &EventBus<C> {
        &self.bus
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }
}

impl<C: Channel, L: EventListener<C>> Drop for Lifecycle<C, L> {
    fn drop(&mut self) {
        self.disable();
    }
}
