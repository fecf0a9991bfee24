//! Logging macros. Records go through the `log` facade under the `eventbus` target,
//! so the host picks the backend.

#[macro_export]
macro_rules! log {
    (ERROR, $($arg:tt)*) => { $crate::log::log_error(&format!($($arg)*)) };
    (INFO, $($arg:tt)*) => { $crate::log::log_info(&format!($($arg)*)) };
    (VERBOSE, $($arg:tt)*) => { $crate::log::log_verbose(&format!($($arg)*)) };
    ($($arg:tt)*) => { $crate::log::log_verbose(&format!($($arg)*)) };
}

#[macro_export]
macro_rules! log_level {
    ($l:ident) => { $crate::log::set_log_level($crate::log::LogLevel::$l) };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LogLevel {
    NONE,
    ERROR,
    INFO,
    VERBOSE,
}

impl LogLevel {
    pub fn filter(&self) -> ::log::LevelFilter {
        match *self {
            LogLevel::NONE => ::log::LevelFilter::Off,
            LogLevel::ERROR => ::log::LevelFilter::Error,
            LogLevel::INFO => ::log::LevelFilter::Info,
            LogLevel::VERBOSE => ::log::LevelFilter::Trace,
        }
    }
}

const TAG: &str = "eventbus";

/// Caps the global `log` level. Applies to every crate logging through the facade.
pub fn set_log_level(level: LogLevel) {
    ::log::set_max_level(level.filter());
}

pub fn log_error(string: &str) {
    ::log::error!(target: TAG, "{}", string);
}

pub fn log_info(string: &str) {
    ::log::info!(target: TAG, "{}", string);
}

pub fn log_verbose(string: &str) {
    ::log::trace!(target: TAG, "{}", string);
}
