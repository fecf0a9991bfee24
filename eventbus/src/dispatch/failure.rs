use std::any::Any;
use std::fmt;

use crate::event::{EventId, ListenerId};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FailureKind {
    /// The listener returned an `Err`.
    Returned,
    /// The listener panicked.
    Panicked,
}

/// A contained listener failure, handed to the table's failure hook.
#[derive(Clone, Debug)]
pub struct ListenerFailure {
    pub event_id: EventId,
    pub listener: ListenerId,
    pub name: Option<String>,
    pub payload_type: &'static str,
    pub kind: FailureKind,
    pub message: String,
}

impl fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "event {}: listener {}", self.event_id, self.listener)?;
        if let Some(name) = &self.name {
            write!(f, " ({:?})", name)?;
        }
        let verb = match self.kind {
            FailureKind::Returned => "failed",
            FailureKind::Panicked => "panicked",
        };
        write!(f, " {} handling {}: {}", verb, self.payload_type, self.message)
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::panic;

    use super::*;

    #[test]
    fn panic_messages() {
        let panic = panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(panic_message(&*panic), "static message");

        let panic = panic::catch_unwind(|| panic!("formatted {}", 7)).unwrap_err();
        assert_eq!(panic_message(&*panic), "formatted 7");

        let panic = panic::catch_unwind(|| panic::panic_any(7u8)).unwrap_err();
        assert_eq!(panic_message(&*panic), "non-string panic payload");
    }
}
