//! Caller-contract enforcement.
//!
//! A broken contract (reading an argument that is not there, handing a list a
//! handle it does not own, overflowing the argument ceiling) is a programmer
//! error. Debug builds stop on the spot; release builds log the violation and
//! the caller takes its documented fallback so a running session survives.

/// Reports a contract violation.
///
/// Always logs through `tracing::error!`. Panics with the same message when
/// `debug_assertions` are enabled; otherwise returns so the call site can
/// degrade.
macro_rules! contract_violation {
    ($($arg:tt)+) => {{
        ::tracing::error!($($arg)+);
        if cfg!(debug_assertions) {
            panic!($($arg)+);
        }
    }};
}

pub(crate) use contract_violation;
