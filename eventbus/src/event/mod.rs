pub use self::callback::{Callback, ListenerId, ListenerResult};

mod callback;

/// Caller-defined event identifier. Unique per dispatch table; the bus attaches no
/// meaning to it beyond equality.
pub type EventId = i32;

/// Marker for a bus channel. Every channel type owns a separate dispatch table.
pub trait Channel: 'static { }

/// Marker for payloads that may be subscribed to through [`ScopedSubscriptions`].
///
/// [`ScopedSubscriptions`]: crate::listener::ScopedSubscriptions
pub trait UiPayload: Send + Sync + 'static { }
