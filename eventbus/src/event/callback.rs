use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome of a single listener invocation. An `Err` is reported as a listener
/// failure and never reaches the poster.
pub type ListenerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Process-unique identity of a callback. Clones of a [`Callback`] share it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ListenerId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A listener for payloads of type `P`.
///
/// Keep a clone of the handle to detach it later: removal matches on identity, so two
/// separately constructed callbacks are never equal even if they wrap the same function.
pub struct Callback<P> {
    id: ListenerId,
    name: Option<Arc<str>>,
    function: Arc<dyn Fn(&P) -> ListenerResult + Send + Sync>,
}

impl<P: 'static> Callback<P> {
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        Self::fallible(move |payload: &P| {
            function(payload);
            Ok(())
        })
    }

    pub fn fallible<F>(function: F) -> Self
    where
        F: Fn(&P) -> ListenerResult + Send + Sync + 'static,
    {
        Self {
            id: ListenerId::next(),
            name: None,
            function: Arc::new(function),
        }
    }
}

impl<P> Callback<P> {
    /// Attaches a name that shows up in failure diagnostics.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(Arc::from(name));
        self
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn call(&self, payload: &P) -> ListenerResult {
        (self.function)(payload)
    }
}

impl<P> Clone for Callback<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            function: self.function.clone(),
        }
    }
}

impl<P> PartialEq for Callback<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P> Eq for Callback<P> { }

impl<P> fmt::Debug for Callback<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Callback")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}
