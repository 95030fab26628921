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

//! Types shared between `pw_log_dispatch` call sites and the backends that
//! receive their output.
//!
//! Backends only need this crate: it defines the [`LogLevel`] scale, the
//! [`LogAttributes`] record handed to every message callback and the
//! signatures of the three callbacks a backend may register.
#![no_std]
#![deny(missing_docs)]

use core::ffi::c_void;
use core::mem::{offset_of, size_of};

/// Severity of a log message.
///
/// Levels are plain integers so that values outside the named set survive a
/// trip through a backend unchanged.  Named levels are spaced out to leave
/// room for intermediate severities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct LogLevel(i32);

#[allow(missing_docs)]
impl LogLevel {
    /// Lower bound of the scale.  Not an emittable level.
    pub const ALL: LogLevel = LogLevel(1);
    pub const TRACE: LogLevel = LogLevel(1);
    pub const INFO: LogLevel = LogLevel(30);
    pub const WARN: LogLevel = LogLevel(40);
    pub const ERROR: LogLevel = LogLevel(50);
    pub const PANIC: LogLevel = LogLevel(60);
    /// Upper bound of the scale.  As a floor it disables all output; it is
    /// never a message level.
    pub const NONE: LogLevel = LogLevel(70);

    /// Placeholder level meaning "not configured".  As a compile-time floor
    /// it behaves like [`LogLevel::ALL`].
    pub const DEFAULT: LogLevel = LogLevel(0);

    pub const ALL_LEVEL: LogLevel = Self::ALL;
    pub const TRACE_LEVEL: LogLevel = Self::TRACE;
    #[deprecated(note = "use LogLevel::TRACE")]
    pub const LOG_LEVEL: LogLevel = Self::TRACE;
    #[deprecated(note = "use LogLevel::TRACE")]
    pub const DEBUG_LEVEL: LogLevel = Self::TRACE;
    pub const INFO_LEVEL: LogLevel = Self::INFO;
    pub const WARN_LEVEL: LogLevel = Self::WARN;
    pub const ERROR_LEVEL: LogLevel = Self::ERROR;
    pub const PANIC_LEVEL: LogLevel = Self::PANIC;
    pub const NO_LOG_LEVEL: LogLevel = Self::NONE;
}

// Names accepted by `LogLevel::parse`, matched without regard to case.
const NAMED_LEVELS: [(&str, LogLevel); 10] = [
    ("ALL", LogLevel::ALL),
    ("TRACE", LogLevel::TRACE),
    ("LOG", LogLevel::TRACE),
    ("DEBUG", LogLevel::TRACE),
    ("INFO", LogLevel::INFO),
    ("WARN", LogLevel::WARN),
    ("ERROR", LogLevel::ERROR),
    ("PANIC", LogLevel::PANIC),
    ("NONE", LogLevel::NONE),
    ("DEFAULT", LogLevel::DEFAULT),
];

impl LogLevel {
    /// Wraps a raw level value.
    pub const fn from_raw(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw level value.
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Returns the canonical name of the level, or `"?"` for values outside
    /// the named set.
    ///
    /// `ALL` and `TRACE` share a value and both name as `"TRACE"`.
    pub const fn name(self) -> &'static str {
        match self.0 {
            1 => "TRACE",
            30 => "INFO",
            40 => "WARN",
            50 => "ERROR",
            60 => "PANIC",
            70 => "NONE",
            _ => "?",
        }
    }

    /// Returns a fixed width, three letter tag for the level.
    #[doc(hidden)]
    pub const fn tag(self) -> &'static str {
        match self.0 {
            1 => "TRC",
            30 => "INF",
            40 => "WRN",
            50 => "ERR",
            60 => "PNC",
            70 => "NON",
            _ => "???",
        }
    }

    /// Parses a level from either a name (`"INFO"`, `"warn"`, ...) or a
    /// decimal number.  Surrounding ASCII whitespace is ignored.
    ///
    /// ```
    /// use pw_log_dispatch_api::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("info"), Some(LogLevel::INFO));
    /// assert_eq!(LogLevel::parse("45"), Some(LogLevel::from_raw(45)));
    /// assert_eq!(LogLevel::parse("loud"), None);
    /// ```
    pub const fn parse(value: &str) -> Option<Self> {
        let value = value.as_bytes().trim_ascii();
        let mut i = 0;
        while i < NAMED_LEVELS.len() {
            let (name, level) = NAMED_LEVELS[i];
            if eq_ignore_ascii_case(value, name.as_bytes()) {
                return Some(level);
            }
            i += 1;
        }
        match parse_decimal(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl From<i32> for LogLevel {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<LogLevel> for i32 {
    fn from(level: LogLevel) -> Self {
        level.0
    }
}

impl core::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.name())
    }
}

/// Returns the name of `level`.  Total over every `i32`; never allocates.
pub const fn level_name(level: LogLevel) -> &'static str {
    level.name()
}

const fn eq_ignore_ascii_case(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i].to_ascii_uppercase() != b[i].to_ascii_uppercase() {
            return false;
        }
        i += 1;
    }
    true
}

const fn parse_decimal(value: &[u8]) -> Option<i32> {
    let (negative, mut i) = if !value.is_empty() && value[0] == b'-' {
        (true, 1)
    } else {
        (false, 0)
    };
    if i == value.len() {
        return None;
    }

    let mut accumulator: i64 = 0;
    while i < value.len() {
        let digit = value[i];
        if !digit.is_ascii_digit() {
            return None;
        }
        accumulator = accumulator * 10 + (digit - b'0') as i64;
        if accumulator > i32::MAX as i64 + 1 {
            return None;
        }
        i += 1;
    }

    if negative {
        accumulator = -accumulator;
    }
    if accumulator > i32::MAX as i64 {
        return None;
    }
    Some(accumulator as i32)
}

/// Metadata attached to every formatted log message.
///
/// The record is versioned by its leading `size` field.  Fields are only
/// ever appended, so a consumer handed a record from an older producer
/// checks `size` before reading a field; the accessor methods do that check.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogAttributes {
    /// Size of the record in bytes as known to the producer.
    pub size: usize,
    /// Reserved.  Always zero.
    pub flags: u32,
    /// Source file name, without its directory.
    pub file: Option<&'static str>,
    /// Source line number.  Zero when source info is not included.
    pub line: u32,
    /// Enclosing function.
    pub function: Option<&'static str>,
    /// Milliseconds since startup.
    pub time: u32,
}

// The field order is part of the backend contract.
const _: () = {
    assert!(offset_of!(LogAttributes, size) == 0);
    assert!(offset_of!(LogAttributes, flags) > offset_of!(LogAttributes, size));
    assert!(offset_of!(LogAttributes, file) > offset_of!(LogAttributes, flags));
    assert!(offset_of!(LogAttributes, line) > offset_of!(LogAttributes, file));
    assert!(offset_of!(LogAttributes, function) > offset_of!(LogAttributes, line));
    assert!(offset_of!(LogAttributes, time) > offset_of!(LogAttributes, function));
};

impl LogAttributes {
    /// Size of the current record layout.
    pub const SIZE: usize = size_of::<LogAttributes>();

    /// Returns a record with no source information.
    pub const fn new() -> Self {
        Self {
            size: Self::SIZE,
            flags: 0,
            file: None,
            line: 0,
            function: None,
            time: 0,
        }
    }

    /// Returns a record carrying a source location.
    pub const fn with_source(
        file: &'static str,
        line: u32,
        function: Option<&'static str>,
    ) -> Self {
        Self {
            size: Self::SIZE,
            flags: 0,
            file: Some(file),
            line,
            function,
            time: 0,
        }
    }

    const fn has_field(&self, offset: usize, len: usize) -> bool {
        self.size >= offset + len
    }

    /// Returns the source file if the record is large enough to carry it.
    pub const fn file(&self) -> Option<&'static str> {
        if self.has_field(offset_of!(LogAttributes, file), size_of::<Option<&str>>()) {
            self.file
        } else {
            None
        }
    }

    /// Returns the source line if the record is large enough to carry it.
    pub const fn line(&self) -> Option<u32> {
        if self.has_field(offset_of!(LogAttributes, line), size_of::<u32>()) && self.line != 0 {
            Some(self.line)
        } else {
            None
        }
    }

    /// Returns the enclosing function if the record is large enough to carry
    /// it.
    pub const fn function(&self) -> Option<&'static str> {
        if self.has_field(offset_of!(LogAttributes, function), size_of::<Option<&str>>()) {
            self.function
        } else {
            None
        }
    }

    /// Returns the timestamp if the record is large enough to carry it.
    pub const fn time(&self) -> Option<u32> {
        if self.has_field(offset_of!(LogAttributes, time), size_of::<u32>()) {
            Some(self.time)
        } else {
            None
        }
    }
}

impl Default for LogAttributes {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque value registered alongside a backend's callbacks and passed back
/// to each of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct Context(*mut c_void);

// SAFETY: The core never dereferences the pointer; it is only handed back to
// the backend that registered it.
unsafe impl Send for Context {}
// SAFETY: See above.
unsafe impl Sync for Context {}

impl Context {
    /// An empty context.
    pub const NULL: Context = Context(core::ptr::null_mut());

    /// Wraps a backend owned pointer.
    pub const fn new(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// Returns the wrapped pointer.
    pub const fn as_ptr(self) -> *mut c_void {
        self.0
    }

    /// Returns `true` for [`Context::NULL`].
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::NULL
    }
}

/// Receives a rendered, possibly truncated, message.
pub type MessageCallback = fn(
    text: &str,
    level: LogLevel,
    category: Option<&str>,
    attributes: &LogAttributes,
    context: Context,
);

/// Receives raw bytes from writes and hex dumps.
pub type WriteCallback = fn(data: &[u8], level: LogLevel, category: Option<&str>, context: Context);

/// Decides at run time whether a message is emitted.
pub type EnabledCallback = fn(level: LogLevel, category: Option<&str>, context: Context) -> bool;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_strictly_increasing() {
        let levels = [
            LogLevel::TRACE,
            LogLevel::INFO,
            LogLevel::WARN,
            LogLevel::ERROR,
            LogLevel::PANIC,
            LogLevel::NONE,
        ];
        for pair in levels.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!(LogLevel::DEFAULT < LogLevel::ALL);
    }

    #[test]
    #[allow(deprecated)]
    fn legacy_aliases_match_named_levels() {
        assert_eq!(LogLevel::ALL, LogLevel::TRACE);
        assert_eq!(LogLevel::ALL_LEVEL, LogLevel::TRACE);
        assert_eq!(LogLevel::TRACE_LEVEL, LogLevel::TRACE);
        assert_eq!(LogLevel::LOG_LEVEL, LogLevel::TRACE);
        assert_eq!(LogLevel::DEBUG_LEVEL, LogLevel::TRACE);
        assert_eq!(LogLevel::INFO_LEVEL, LogLevel::INFO);
        assert_eq!(LogLevel::WARN_LEVEL, LogLevel::WARN);
        assert_eq!(LogLevel::ERROR_LEVEL, LogLevel::ERROR);
        assert_eq!(LogLevel::PANIC_LEVEL, LogLevel::PANIC);
        assert_eq!(LogLevel::NO_LOG_LEVEL, LogLevel::NONE);
        assert_eq!(LogLevel::DEFAULT.value(), 0);
    }

    #[test]
    fn named_levels_have_names() {
        assert_eq!(level_name(LogLevel::ALL), "TRACE");
        assert_eq!(level_name(LogLevel::TRACE), "TRACE");
        assert_eq!(level_name(LogLevel::INFO), "INFO");
        assert_eq!(level_name(LogLevel::WARN), "WARN");
        assert_eq!(level_name(LogLevel::ERROR), "ERROR");
        assert_eq!(level_name(LogLevel::PANIC), "PANIC");
        assert_eq!(level_name(LogLevel::NONE), "NONE");
    }

    #[test]
    fn level_name_is_total() {
        for value in [i32::MIN, -1, 0, 2, 29, 31, 45, 61, 71, i32::MAX] {
            assert_eq!(level_name(LogLevel::from_raw(value)), "?");
        }
        let mut value = -1000;
        while value <= 1000 {
            assert!(!level_name(LogLevel::from_raw(value)).is_empty());
            value += 1;
        }
    }

    #[test]
    fn parse_accepts_names_and_numbers() {
        assert_eq!(LogLevel::parse("TRACE"), Some(LogLevel::TRACE));
        assert_eq!(LogLevel::parse("all"), Some(LogLevel::ALL));
        assert_eq!(LogLevel::parse(" Warn "), Some(LogLevel::WARN));
        assert_eq!(LogLevel::parse("none"), Some(LogLevel::NONE));
        assert_eq!(LogLevel::parse("default"), Some(LogLevel::DEFAULT));
        assert_eq!(LogLevel::parse("30"), Some(LogLevel::INFO));
        assert_eq!(LogLevel::parse("-5"), Some(LogLevel::from_raw(-5)));
        assert_eq!(
            LogLevel::parse("-2147483648"),
            Some(LogLevel::from_raw(i32::MIN))
        );
        assert_eq!(LogLevel::parse("2147483648"), None);
        assert_eq!(LogLevel::parse(""), None);
        assert_eq!(LogLevel::parse("-"), None);
        assert_eq!(LogLevel::parse("4x"), None);
    }

    #[test]
    fn parse_is_usable_in_const_context() {
        const LEVEL: Option<LogLevel> = LogLevel::parse("error");
        assert_eq!(LEVEL, Some(LogLevel::ERROR));
    }

    #[test]
    fn attributes_always_carry_their_size() {
        assert_eq!(LogAttributes::new().size, size_of::<LogAttributes>());
        let attributes = LogAttributes::with_source("main.rs", 12, Some("main"));
        assert_eq!(attributes.size, LogAttributes::SIZE);
        assert_eq!(attributes.file(), Some("main.rs"));
        assert_eq!(attributes.line(), Some(12));
        assert_eq!(attributes.function(), Some("main"));
        assert_eq!(attributes.time(), Some(0));
    }

    #[test]
    fn short_attributes_hide_unknown_fields() {
        let mut attributes = LogAttributes::with_source("main.rs", 12, Some("main"));
        attributes.time = 99;
        attributes.size = offset_of!(LogAttributes, line);
        assert_eq!(attributes.file(), Some("main.rs"));
        assert_eq!(attributes.line(), None);
        assert_eq!(attributes.function(), None);
        assert_eq!(attributes.time(), None);
    }

    #[test]
    fn display_pads_level_name() {
        use core::fmt::Write;
        struct Buf([u8; 16], usize);
        impl Write for Buf {
            fn write_str(&mut self, s: &str) -> core::fmt::Result {
                self.0[self.1..self.1 + s.len()].copy_from_slice(s.as_bytes());
                self.1 += s.len();
                Ok(())
            }
        }
        let mut buf = Buf([0; 16], 0);
        write!(buf, "{:<5}|", LogLevel::WARN).unwrap();
        assert_eq!(&buf.0[..buf.1], b"WARN |");
    }

    #[test]
    fn null_context_is_default() {
        assert!(Context::default().is_null());
        assert_eq!(Context::default(), Context::NULL);
    }
}
