// Copyright 2025 The Pigweed Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

//! `pw_log_dispatch` is a logging facade for firmware: call sites are
//! filtered at compile time and at run time, then handed to whichever
//! backend registered its callbacks.
//!
//! ```
//! use pw_log_dispatch::prelude::*;
//!
//! log_category!("net.tcp");
//! log!(LogLevel::INFO, "connected to {}:{}", "10.0.0.2", 8080);
//! logf!(LogLevel::WARN, "retry %d of %d", 2, 5);
//! log_dump!(LogLevel::TRACE, [0x00u8, 0xff, 0x1a]);
//! if log_enabled!(LogLevel::TRACE) {
//!     log_print!(LogLevel::TRACE, "expensive trace\r\n");
//! }
//! ```
//!
//! Every module that logs must glob import [`prelude`]: it carries the
//! fallbacks the category macros resolve against.  A child module that
//! already does `use super::*;` inherits them (and its parent's source
//! category) and must not import the prelude a second time.
//!
//! # Pipeline
//!
//! 1. The call site's level is compared against the compile-time floor in an
//!    inline `const` block.  Below the floor the call compiles to nothing.
//!    See [`filter`] and [`config`].
//! 2. The category is resolved at compile time from the scope, source and
//!    module tiers.  See [`category`].
//! 3. The backend's enabled callback is asked; without one everything
//!    passes.
//! 4. Attributes are captured ([`attributes`]) and the message is rendered
//!    into a bounded buffer ([`writer`]) or hex encoded ([`hex`]).
//! 5. The matching callback from the [`registry`] receives the output.  A
//!    missing callback makes the call a no-op.
//!
//! Backends depend on `pw_log_dispatch_api` for the callback signatures and
//! register a [`Callbacks`] at startup.
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

pub use pw_log_dispatch_api::{
    Context, EnabledCallback, LogAttributes, LogLevel, MessageCallback, WriteCallback, level_name,
};

pub mod attributes;
#[cfg(feature = "std")]
pub mod capture;
pub mod category;
pub mod config;
pub mod error;
pub mod fatal;
pub mod filter;
pub mod hex;
pub mod registry;
pub mod writer;

pub use error::{Error, Result, StatusCode};
pub use hex::DumpFlags;
pub use registry::{Callbacks, clear_callbacks, set_callbacks};

/// Glob import this in every module that logs.
pub mod prelude {
    pub use crate::{DumpFlags, LogLevel};
    pub use crate::{
        log, log_category, log_debug, log_debug_dump, log_debug_print, log_debug_printf,
        log_debug_write, log_dump, log_enabled, log_panic, log_panicf, log_print, log_printf,
        log_source_category, log_write, logf, logf_debug, this_category,
    };

    // Lowest priority tiers of the category chain, shadowed by
    // `log_category!` and `log_source_category!`.
    #[doc(hidden)]
    pub const __PW_LOG_SCOPE_CATEGORY: Option<&'static str> = None;
    #[doc(hidden)]
    pub const __PW_LOG_SOURCE_CATEGORY: Option<&'static str> = None;
}

// Re-export dependences of the macros to be accessed via `$crate::__private`.
#[doc(hidden)]
pub mod __private {
    pub use crate::attributes::{function_name, init_attributes, type_name_of};
    pub use crate::category::{CategoryChain, explicit as category, this_category};
    pub use crate::config::parse_flag;
    pub use crate::fatal::panic as fatal_panic;
    pub use crate::filter::{CompileTimeFilter, log_enabled};
    pub use crate::hex::log_dump;
    pub use crate::writer::{log_message, log_print, log_printf, log_write};
    pub use crate::{DumpFlags, LogAttributes, LogLevel};
    pub use pw_log_dispatch_macro::_printf_format_args;

    pub fn as_bytes<T: AsRef<[u8]> + ?Sized>(data: &T) -> &[u8] {
        data.as_ref()
    }

    pub fn as_str<T: AsRef<str> + ?Sized>(text: &T) -> &str {
        text.as_ref()
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __compile_time_filter {
    () => {
        $crate::__private::CompileTimeFilter::from_env(
            ::core::option_env!("PW_LOG_COMPILE_TIME_LEVEL"),
            ::core::option_env!("PW_LOG_DISABLE"),
        )
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __pw_log_fn() {}
        $crate::__private::function_name($crate::__private::type_name_of(__pw_log_fn))
    }};
}

// Source info defaults to on in debug builds of the calling crate.
#[doc(hidden)]
#[macro_export]
macro_rules! __source_attributes {
    () => {
        if const {
            $crate::__private::parse_flag(
                ::core::option_env!("PW_LOG_INCLUDE_SOURCE_INFO"),
                ::core::cfg!(debug_assertions),
            )
        } {
            $crate::__private::LogAttributes::with_source(
                ::core::file!(),
                ::core::line!(),
                ::core::option::Option::Some($crate::__function_name!()),
            )
        } else {
            $crate::__private::LogAttributes::new()
        }
    };
}

/// Declares the category of the enclosing function or block.
///
/// Takes precedence over the source and module categories for every call
/// site in the same block, including nested blocks.  A nested block may
/// declare its own category; declaring a second one in the same block is a
/// compile error.
///
/// ```
/// use pw_log_dispatch::prelude::*;
///
/// fn connect() {
///     log_category!("net.tcp");
///     assert_eq!(this_category!(), Some("net.tcp"));
///     {
///         log_category!("net.tcp.handshake");
///         assert_eq!(this_category!(), Some("net.tcp.handshake"));
///     }
/// }
/// # connect();
/// ```
#[macro_export]
macro_rules! log_category {
    ($name:expr $(,)?) => {
        #[allow(dead_code)]
        const __PW_LOG_SCOPE_CATEGORY: ::core::option::Option<&'static str> =
            ::core::option::Option::Some($name);
    };
}

/// Declares the category of the enclosing source file.
///
/// Use once at module level, after importing the [`prelude`].
///
/// ```
/// mod storage {
///     use pw_log_dispatch::prelude::*;
///     log_source_category!("storage");
///
///     pub fn category() -> Option<&'static str> {
///         this_category!()
///     }
/// }
/// assert_eq!(storage::category(), Some("storage"));
/// ```
#[macro_export]
macro_rules! log_source_category {
    ($name:expr $(,)?) => {
        #[allow(dead_code)]
        const __PW_LOG_SOURCE_CATEGORY: ::core::option::Option<&'static str> =
            ::core::option::Option::Some($name);
    };
}

/// Evaluates to the category in effect at the call site.
///
/// The most specific of the scope category, the source category and the
/// `PW_LOG_MODULE_CATEGORY` value of the calling crate, or `None`.  Always
/// `None` when logging is disabled.
#[macro_export]
macro_rules! this_category {
    () => {{
        const __PW_LOG_CATEGORY: ::core::option::Option<&'static str> =
            $crate::__private::this_category(
                $crate::__private::CategoryChain::new(
                    __PW_LOG_SCOPE_CATEGORY,
                    __PW_LOG_SOURCE_CATEGORY,
                    ::core::option_env!("PW_LOG_MODULE_CATEGORY"),
                ),
                $crate::__compile_time_filter!(),
            );
        __PW_LOG_CATEGORY
    }};
}

/// Returns `true` if a message at `level` would currently be emitted.
///
/// `false` at compile time when `level` is below the floor; otherwise the
/// answer of the backend's enabled callback, or `true` without one.
///
/// ```
/// use pw_log_dispatch::prelude::*;
///
/// assert!(log_enabled!(LogLevel::INFO));
/// assert!(log_enabled!(category: "net", LogLevel::INFO));
/// ```
#[macro_export]
macro_rules! log_enabled {
    (category: $category:expr, $level:expr $(,)?) => {{
        use $crate::__private as __pw_log_dispatch_crate;
        const __PW_LOG_LEVEL: __pw_log_dispatch_crate::LogLevel = $level;
        if const { $crate::__compile_time_filter!().allows(__PW_LOG_LEVEL) } {
            __pw_log_dispatch_crate::log_enabled(
                __PW_LOG_LEVEL,
                __pw_log_dispatch_crate::category($category),
            )
        } else {
            false
        }
    }};

    ($level:expr $(,)?) => {
        $crate::log_enabled!(category: $crate::this_category!(), $level)
    };
}

/// Emit a log message using [`core::fmt`] format string semantics.
///
/// `log` takes an optional `category:`, a constant [`LogLevel`], and a format
/// string with its arguments.  The rendered text is cut to
/// [`config::MAX_STRING_LENGTH`]` - 1` bytes.
///
/// ```
/// use pw_log_dispatch::prelude::*;
///
/// log!(LogLevel::INFO, "{} blocks free", 12);
/// log!(category: "fs", LogLevel::ERROR, "mount failed: {:?}", "EIO");
/// ```
#[macro_export]
macro_rules! log {
    (category: $category:expr, $level:expr, $($format_args:tt)+) => {{
        use $crate::__private as __pw_log_dispatch_crate;
        const __PW_LOG_LEVEL: __pw_log_dispatch_crate::LogLevel = $level;
        if const { $crate::__compile_time_filter!().allows(__PW_LOG_LEVEL) } {
            let __pw_log_category = __pw_log_dispatch_crate::category($category);
            if __pw_log_dispatch_crate::log_enabled(__PW_LOG_LEVEL, __pw_log_category) {
                let mut __pw_log_attributes = $crate::__source_attributes!();
                __pw_log_dispatch_crate::init_attributes(&mut __pw_log_attributes);
                __pw_log_dispatch_crate::log_message(
                    __PW_LOG_LEVEL,
                    __pw_log_category,
                    &__pw_log_attributes,
                    ::core::format_args!($($format_args)+),
                );
            }
        }
    }};

    ($level:expr, $($format_args:tt)+) => {
        $crate::log!(category: $crate::this_category!(), $level, $($format_args)+)
    };
}

/// Emit a log message using `printf` format string semantics.
///
/// The format string is translated to [`core::fmt`] at compile time, so
/// argument types are checked like any other Rust formatting.
///
/// ```
/// use pw_log_dispatch::prelude::*;
///
/// logf!(LogLevel::INFO, "%s has %u bytes left", "flash", 4096u32);
/// logf!(category: "net", LogLevel::WARN, "rssi %+d dBm", -70);
/// ```
#[macro_export]
macro_rules! logf {
    (category: $category:expr, $level:expr, $format_string:literal $(, $args:expr)* $(,)?) => {{
        use $crate::__private as __pw_log_dispatch_crate;
        const __PW_LOG_LEVEL: __pw_log_dispatch_crate::LogLevel = $level;
        if const { $crate::__compile_time_filter!().allows(__PW_LOG_LEVEL) } {
            let __pw_log_category = __pw_log_dispatch_crate::category($category);
            if __pw_log_dispatch_crate::log_enabled(__PW_LOG_LEVEL, __pw_log_category) {
                let mut __pw_log_attributes = $crate::__source_attributes!();
                __pw_log_dispatch_crate::init_attributes(&mut __pw_log_attributes);
                __pw_log_dispatch_crate::log_message(
                    __PW_LOG_LEVEL,
                    __pw_log_category,
                    &__pw_log_attributes,
                    __pw_log_dispatch_crate::_printf_format_args!($format_string $(, $args)*),
                );
            }
        }
    }};

    ($level:expr, $format_string:literal $(, $args:expr)* $(,)?) => {
        $crate::logf!(category: $crate::this_category!(), $level, $format_string $(, $args)*)
    };
}

/// Writes raw bytes to the backend without formatting.
///
/// Accepts anything that is `AsRef<[u8]>`.  Empty writes are dropped.
///
/// ```
/// use pw_log_dispatch::prelude::*;
///
/// log_write!(LogLevel::INFO, b"\x02frame\x03");
/// ```
#[macro_export]
macro_rules! log_write {
    (category: $category:expr, $level:expr, $data:expr $(,)?) => {{
        use $crate::__private as __pw_log_dispatch_crate;
        const __PW_LOG_LEVEL: __pw_log_dispatch_crate::LogLevel = $level;
        if const { $crate::__compile_time_filter!().allows(__PW_LOG_LEVEL) } {
            let __pw_log_category = __pw_log_dispatch_crate::category($category);
            if __pw_log_dispatch_crate::log_enabled(__PW_LOG_LEVEL, __pw_log_category) {
                __pw_log_dispatch_crate::log_write(
                    __PW_LOG_LEVEL,
                    __pw_log_category,
                    __pw_log_dispatch_crate::as_bytes(&$data),
                );
            }
        }
    }};

    ($level:expr, $data:expr $(,)?) => {
        $crate::log_write!(category: $crate::this_category!(), $level, $data)
    };
}

/// Writes a string to the backend without formatting.
///
/// ```
/// use pw_log_dispatch::prelude::*;
///
/// log_print!(LogLevel::INFO, "boot complete\r\n");
/// ```
#[macro_export]
macro_rules! log_print {
    (category: $category:expr, $level:expr, $text:expr $(,)?) => {{
        use $crate::__private as __pw_log_dispatch_crate;
        const __PW_LOG_LEVEL: __pw_log_dispatch_crate::LogLevel = $level;
        if const { $crate::__compile_time_filter!().allows(__PW_LOG_LEVEL) } {
            let __pw_log_category = __pw_log_dispatch_crate::category($category);
            if __pw_log_dispatch_crate::log_enabled(__PW_LOG_LEVEL, __pw_log_category) {
                __pw_log_dispatch_crate::log_print(
                    __PW_LOG_LEVEL,
                    __pw_log_category,
                    __pw_log_dispatch_crate::as_str(&$text),
                );
            }
        }
    }};

    ($level:expr, $text:expr $(,)?) => {
        $crate::log_print!(category: $crate::this_category!(), $level, $text)
    };
}

/// Renders a `printf` style format string and writes the text to the
/// backend's write callback.  No attributes are captured.
///
/// ```
/// use pw_log_dispatch::prelude::*;
///
/// log_printf!(LogLevel::INFO, "%08x\r\n", 0xbeefu32);
/// ```
#[macro_export]
macro_rules! log_printf {
    (category: $category:expr, $level:expr, $format_string:literal $(, $args:expr)* $(,)?) => {{
        use $crate::__private as __pw_log_dispatch_crate;
        const __PW_LOG_LEVEL: __pw_log_dispatch_crate::LogLevel = $level;
        if const { $crate::__compile_time_filter!().allows(__PW_LOG_LEVEL) } {
            let __pw_log_category = __pw_log_dispatch_crate::category($category);
            if __pw_log_dispatch_crate::log_enabled(__PW_LOG_LEVEL, __pw_log_category) {
                __pw_log_dispatch_crate::log_printf(
                    __PW_LOG_LEVEL,
                    __pw_log_category,
                    __pw_log_dispatch_crate::_printf_format_args!($format_string $(, $args)*),
                );
            }
        }
    }};

    ($level:expr, $format_string:literal $(, $args:expr)* $(,)?) => {
        $crate::log_printf!(category: $crate::this_category!(), $level, $format_string $(, $args)*)
    };
}

/// Writes a hex dump of binary data to the backend.
///
/// Bytes are encoded as lowercase hex without separators unless
/// [`DumpFlags`] say otherwise.
///
/// ```
/// use pw_log_dispatch::prelude::*;
///
/// let packet = [0x00u8, 0xff, 0x1a];
/// log_dump!(LogLevel::TRACE, packet);
/// log_dump!(LogLevel::TRACE, &packet[1..], DumpFlags::SPACED);
/// ```
#[macro_export]
macro_rules! log_dump {
    (category: $category:expr, $level:expr, $data:expr $(,)?) => {
        $crate::log_dump!(category: $category, $level, $data, $crate::DumpFlags::empty())
    };

    (category: $category:expr, $level:expr, $data:expr, $flags:expr $(,)?) => {{
        use $crate::__private as __pw_log_dispatch_crate;
        const __PW_LOG_LEVEL: __pw_log_dispatch_crate::LogLevel = $level;
        if const { $crate::__compile_time_filter!().allows(__PW_LOG_LEVEL) } {
            let __pw_log_category = __pw_log_dispatch_crate::category($category);
            if __pw_log_dispatch_crate::log_enabled(__PW_LOG_LEVEL, __pw_log_category) {
                __pw_log_dispatch_crate::log_dump(
                    __PW_LOG_LEVEL,
                    __pw_log_category,
                    __pw_log_dispatch_crate::as_bytes(&$data),
                    $flags,
                );
            }
        }
    }};

    ($level:expr, $data:expr $(, $flags:expr)? $(,)?) => {
        $crate::log_dump!(category: $crate::this_category!(), $level, $data $(, $flags)?)
    };
}

/// Logs a PANIC level message, then hands `code` to the fatal error handler.
/// Never returns.
///
/// ```should_panic
/// use pw_log_dispatch::prelude::*;
///
/// log_panic!(3, "stack overflow in {}", "rx_task");
/// ```
#[macro_export]
macro_rules! log_panic {
    (category: $category:expr, $code:expr, $($format_args:tt)+) => {{
        $crate::log!(category: $category, $crate::LogLevel::PANIC, $($format_args)+);
        $crate::__private::fatal_panic($code)
    }};

    ($code:expr, $($format_args:tt)+) => {{
        $crate::log!($crate::LogLevel::PANIC, $($format_args)+);
        $crate::__private::fatal_panic($code)
    }};
}

/// [`log_panic!`] with a `printf` style format string.
#[macro_export]
macro_rules! log_panicf {
    (category: $category:expr, $code:expr, $format_string:literal $(, $args:expr)* $(,)?) => {{
        $crate::logf!(category: $category, $crate::LogLevel::PANIC, $format_string $(, $args)*);
        $crate::__private::fatal_panic($code)
    }};

    ($code:expr, $format_string:literal $(, $args:expr)* $(,)?) => {{
        $crate::logf!($crate::LogLevel::PANIC, $format_string $(, $args)*);
        $crate::__private::fatal_panic($code)
    }};
}

/// [`log!`] that is only compiled into debug builds of the calling crate.
#[macro_export]
macro_rules! log_debug {
    ($($args:tt)+) => {
        if ::core::cfg!(debug_assertions) {
            $crate::log!($($args)+)
        }
    };
}

/// [`logf!`] that is only compiled into debug builds of the calling crate.
#[macro_export]
macro_rules! logf_debug {
    ($($args:tt)+) => {
        if ::core::cfg!(debug_assertions) {
            $crate::logf!($($args)+)
        }
    };
}

/// [`log_write!`] that is only compiled into debug builds of the calling
/// crate.
#[macro_export]
macro_rules! log_debug_write {
    ($($args:tt)+) => {
        if ::core::cfg!(debug_assertions) {
            $crate::log_write!($($args)+)
        }
    };
}

/// [`log_print!`] that is only compiled into debug builds of the calling
/// crate.
#[macro_export]
macro_rules! log_debug_print {
    ($($args:tt)+) => {
        if ::core::cfg!(debug_assertions) {
            $crate::log_print!($($args)+)
        }
    };
}

/// [`log_printf!`] that is only compiled into debug builds of the calling
/// crate.
#[macro_export]
macro_rules! log_debug_printf {
    ($($args:tt)+) => {
        if ::core::cfg!(debug_assertions) {
            $crate::log_printf!($($args)+)
        }
    };
}

/// [`log_dump!`] that is only compiled into debug builds of the calling
/// crate.
#[macro_export]
macro_rules! log_debug_dump {
    ($($args:tt)+) => {
        if ::core::cfg!(debug_assertions) {
            $crate::log_dump!($($args)+)
        }
    };
}
