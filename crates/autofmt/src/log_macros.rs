//! Call-site logging macros.
//!
//! Two families, one macro per level:
//!
//! - `stm_*!` render every argument with a plain `{}` placeholder
//!   (uniform template, `Display` of each value as is).
//! - `fmt_*!` render with the type-aware template of the argument list,
//!   so floats get two decimals and types deriving `Leaf` get their
//!   fragment.
//!
//! Both accept an optional leading `sep = 'c'` and check
//! `tracing::enabled!` before rendering anything. Templates are associated
//! consts, so more than `MAX_ARGS` arguments is a build error.
//!
//! ```ignore
//! use autofmt::{fmt_info, stm_warn};
//!
//! stm_warn!("disk", used, total);
//! fmt_info!(sep = ',', temperature, reading);
//! ```
//!
//! One argument past the limit:
//!
//! ```compile_fail
//! use autofmt::stm_info;
//!
//! fn main() {
//!     stm_info!(1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21);
//! }
//! ```

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

#[doc(hidden)]
#[macro_export]
macro_rules! __af_unit {
    ($_arg:expr) => {
        ()
    };
}

/// Number of comma separated expressions, usable in a const.
#[doc(hidden)]
#[macro_export]
macro_rules! __af_count {
    ($($arg:expr),* $(,)?) => {
        <[()]>::len(&[$($crate::__af_unit!($arg)),*])
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __af_emit {
    ($level:expr, $rendered:expr) => {
        match $rendered {
            ::core::result::Result::Ok(message) => {
                $crate::__tracing::event!($level, "{}", message)
            }
            ::core::result::Result::Err(error) => $crate::__tracing::event!(
                $crate::__tracing::Level::ERROR,
                error = %error,
                "log message rendering failed"
            ),
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __af_stm {
    ($level:expr, $sep:literal $(, $arg:expr)*) => {{
        if $crate::__tracing::enabled!($level) {
            const __AF_N: usize = $crate::__af_count!($($arg),*);
            $crate::__af_emit!(
                $level,
                $crate::dispatch::render_ready(
                    &<$crate::Uniform<__AF_N, $sep>>::TEMPLATE,
                    &[$($crate::LeafRef::display(&$arg)),*],
                )
            );
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __af_fmt {
    ($level:expr, $sep:literal $(, $arg:expr)*) => {{
        if $crate::__tracing::enabled!($level) {
            $crate::__af_emit!(
                $level,
                $crate::dispatch::render_typed::<_, $sep>(&($(&$arg,)*))
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Uniform template macros
// ---------------------------------------------------------------------------

/// Log the arguments at TRACE level with a uniform template.
#[macro_export]
macro_rules! stm_trace {
    (sep = $sep:literal $(, $arg:expr)* $(,)?) => {
        $crate::__af_stm!($crate::__tracing::Level::TRACE, $sep $(, $arg)*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__af_stm!($crate::__tracing::Level::TRACE, ' ' $(, $arg)*)
    };
}

/// Log the arguments at DEBUG level with a uniform template.
#[macro_export]
macro_rules! stm_debug {
    (sep = $sep:literal $(, $arg:expr)* $(,)?) => {
        $crate::__af_stm!($crate::__tracing::Level::DEBUG, $sep $(, $arg)*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__af_stm!($crate::__tracing::Level::DEBUG, ' ' $(, $arg)*)
    };
}

/// Log the arguments at INFO level with a uniform template.
///
/// ```ignore
/// stm_info!("connected", peer, latency_ms);
/// stm_info!(sep = '|', "a", 1, 2.5);
/// ```
#[macro_export]
macro_rules! stm_info {
    (sep = $sep:literal $(, $arg:expr)* $(,)?) => {
        $crate::__af_stm!($crate::__tracing::Level::INFO, $sep $(, $arg)*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__af_stm!($crate::__tracing::Level::INFO, ' ' $(, $arg)*)
    };
}

/// Log the arguments at WARN level with a uniform template.
#[macro_export]
macro_rules! stm_warn {
    (sep = $sep:literal $(, $arg:expr)* $(,)?) => {
        $crate::__af_stm!($crate::__tracing::Level::WARN, $sep $(, $arg)*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__af_stm!($crate::__tracing::Level::WARN, ' ' $(, $arg)*)
    };
}

/// Log the arguments at ERROR level with a uniform template.
#[macro_export]
macro_rules! stm_error {
    (sep = $sep:literal $(, $arg:expr)* $(,)?) => {
        $crate::__af_stm!($crate::__tracing::Level::ERROR, $sep $(, $arg)*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__af_stm!($crate::__tracing::Level::ERROR, ' ' $(, $arg)*)
    };
}

// ---------------------------------------------------------------------------
// Type-aware template macros
// ---------------------------------------------------------------------------

/// Log the arguments at TRACE level with their type-aware template.
#[macro_export]
macro_rules! fmt_trace {
    (sep = $sep:literal $(, $arg:expr)* $(,)?) => {
        $crate::__af_fmt!($crate::__tracing::Level::TRACE, $sep $(, $arg)*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__af_fmt!($crate::__tracing::Level::TRACE, ' ' $(, $arg)*)
    };
}

/// Log the arguments at DEBUG level with their type-aware template.
#[macro_export]
macro_rules! fmt_debug {
    (sep = $sep:literal $(, $arg:expr)* $(,)?) => {
        $crate::__af_fmt!($crate::__tracing::Level::DEBUG, $sep $(, $arg)*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__af_fmt!($crate::__tracing::Level::DEBUG, ' ' $(, $arg)*)
    };
}

/// Log the arguments at INFO level with their type-aware template.
///
/// ```ignore
/// fmt_info!(reading.celsius, reading.count); // "21.50 3"
/// ```
#[macro_export]
macro_rules! fmt_info {
    (sep = $sep:literal $(, $arg:expr)* $(,)?) => {
        $crate::__af_fmt!($crate::__tracing::Level::INFO, $sep $(, $arg)*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__af_fmt!($crate::__tracing::Level::INFO, ' ' $(, $arg)*)
    };
}

/// Log the arguments at WARN level with their type-aware template.
#[macro_export]
macro_rules! fmt_warn {
    (sep = $sep:literal $(, $arg:expr)* $(,)?) => {
        $crate::__af_fmt!($crate::__tracing::Level::WARN, $sep $(, $arg)*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__af_fmt!($crate::__tracing::Level::WARN, ' ' $(, $arg)*)
    };
}

/// Log the arguments at ERROR level with their type-aware template.
#[macro_export]
macro_rules! fmt_error {
    (sep = $sep:literal $(, $arg:expr)* $(,)?) => {
        $crate::__af_fmt!($crate::__tracing::Level::ERROR, $sep $(, $arg)*)
    };
    ($($arg:expr),* $(,)?) => {
        $crate::__af_fmt!($crate::__tracing::Level::ERROR, ' ' $(, $arg)*)
    };
}
