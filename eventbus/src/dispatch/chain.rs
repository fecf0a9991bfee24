use std::any::type_name;

use crate::config::RemovalPolicy;
use crate::event::Callback;
use crate::util::AsAny;

/// Type-erased view of a `ListenerChain<P>` as stored in the table.
pub(crate) trait ErasedChain: AsAny + Send + Sync {
    fn len(&self) -> usize;
    fn payload_type(&self) -> &'static str;
}

pub(crate) struct ListenerChain<P> {
    listeners: Vec<Callback<P>>,
}

impl<P: 'static> ListenerChain<P> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn push(&mut self, callback: Callback<P>) {
        self.listeners.push(callback);
    }

    /// Returns the number of occurrences removed.
    pub fn remove(&mut self, callback: &Callback<P>, policy: RemovalPolicy) -> usize {
        let index = match policy {
            RemovalPolicy::FirstOccurrence => self.listeners.iter().position(|c| c == callback),
            RemovalPolicy::LastOccurrence => self.listeners.iter().rposition(|c| c == callback),
            RemovalPolicy::AllOccurrences => {
                let before = self.listeners.len();
                self.listeners.retain(|c| c != callback);
                return before - self.listeners.len();
            },
        };

        match index {
            Some(index) => {
                self.listeners.remove(index);
                1
            },
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Callback<P>> {
        self.listeners.clone()
    }
}

impl<P: 'static> ErasedChain for ListenerChain<P> {
    fn len(&self) -> usize {
        self.listeners.len()
    }

    fn payload_type(&self) -> &'static str {
        type_name::<P>()
    }
}

/// One table slot: the chain for an event id, tagged with its payload type.
pub(crate) struct Entry {
    chain: Box<dyn ErasedChain>,
}

impl Entry {
    pub fn new<P: 'static>() -> Self {
        Self {
            chain: Box::new(ListenerChain::<P>::new()),
        }
    }

    // Deref to the trait object before calling `as_any`, otherwise the blanket impl
    // resolves against the `Box` itself and every downcast fails.
    pub fn downcast_ref<P: 'static>(&self) -> Option<&ListenerChain<P>> {
        (*self.chain).as_any().downcast_ref()
    }

    pub fn downcast_mut<P: 'static>(&mut self) -> Option<&mut ListenerChain<P>> {
        (*self.chain).as_any_mut().downcast_mut()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn payload_type(&self) -> &'static str {
        self.chain.payload_type()
    }
}
