//! In-process publish/subscribe for engine components.
//!
//! Listeners are registered against an integer [`EventId`](event::EventId) and a payload
//! type, and every post synchronously runs the listeners present when the post began.

extern crate self as eventbus;

#[macro_use]
pub mod log;

pub mod bus;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod listener;
mod util;

pub use eventbus_derive::{Channel, UiPayload};

pub use self::bus::EventBus;
pub use self::config::{BusConfig, RemovalPolicy, TypeCheck};
pub use self::dispatch::{DispatchTable, FailureKind, ListenerFailure};
pub use self::error::BusError;
pub use self::event::{Callback, Channel, EventId, ListenerId, ListenerResult, UiPayload};
pub use self::listener::{EventListener, Lifecycle, ScopedSubscriptions};
