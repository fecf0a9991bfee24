use thiserror::Error;

use crate::event::EventId;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum BusError {
    /// The payload type used for an operation differs from the type the event id's
    /// listeners were registered with.
    #[error("event {event_id}: payload type {posted} does not match registered listener type {registered}")]
    TypeMismatch {
        event_id: EventId,
        registered: &'static str,
        posted: &'static str,
    },
}
