pub use self::as_any::AsAny;
pub use self::lock::{lock, read, write};

mod as_any;
mod lock;
