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

//! `pw_log_dispatch` backend that prints log messages to `stdout`.  This
//! crate is useful when you have an application or test running on the
//! development host and want to see its logs.
//!
//! ```no_run
//! use pw_log_dispatch::prelude::*;
//!
//! pw_log_dispatch_backend_println::init();
//! pw_log_dispatch_backend_println::set_level(LogLevel::INFO);
//! log!(category: "net", LogLevel::WARN, "link down");
//! // 0000000012 main.rs:6, app::main: WARN [net]: link down
//! ```
//!
//! Raw writes and hex dumps are copied to `stdout` unchanged.
//!
//! *Note*: This crate requires `std`.

use std::io::{self, Write, stdout};
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{PoisonError, RwLock};

use pw_log_dispatch::Callbacks;
use pw_log_dispatch::category::matches_prefix;
use pw_log_dispatch_api::{Context, LogAttributes, LogLevel};

/// Layout of a printed message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    /// `<time> [<file>:<line>, <function>: ]<LEVEL>[ [<category>]]: <text>`
    /// terminated by `\r\n`.
    Full,
    /// `[<TAG>] <text>` terminated by `\n`.
    Tagged,
}

static LEVEL: AtomicI32 = AtomicI32::new(LogLevel::ALL.value());
static TAGGED: AtomicBool = AtomicBool::new(false);
static CATEGORY_FILTER: RwLock<Option<String>> = RwLock::new(None);

/// Callbacks of this backend.
pub static CALLBACKS: Callbacks = Callbacks::new(
    Some(print_message),
    Some(print_raw),
    Some(enabled),
    Context::NULL,
);

/// Registers this backend with `pw_log_dispatch`.
pub fn init() {
    pw_log_dispatch::set_callbacks(&CALLBACKS);
}

/// Drops messages below `level`.
pub fn set_level(level: LogLevel) {
    LEVEL.store(level.value(), Ordering::Relaxed);
}

/// Returns the current threshold level.
pub fn level() -> LogLevel {
    LogLevel::from_raw(LEVEL.load(Ordering::Relaxed))
}

/// Only prints categories at or below `filter` in the dot hierarchy.
/// Uncategorized output is always printed.  `None` removes the filter.
pub fn set_category_filter(filter: Option<&str>) {
    let mut current = CATEGORY_FILTER
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *current = filter.map(str::to_string);
}

/// Selects the layout of printed messages.  Defaults to [`LineStyle::Full`].
pub fn set_style(style: LineStyle) {
    TAGGED.store(style == LineStyle::Tagged, Ordering::Relaxed);
}

/// Returns the selected layout.
pub fn style() -> LineStyle {
    if TAGGED.load(Ordering::Relaxed) {
        LineStyle::Tagged
    } else {
        LineStyle::Full
    }
}

/// Writes one message in `style` to `out`.
pub fn write_line<W: Write>(
    out: &mut W,
    style: LineStyle,
    text: &str,
    level: LogLevel,
    category: Option<&str>,
    attributes: &LogAttributes,
) -> io::Result<()> {
    if style == LineStyle::Tagged {
        return writeln!(out, "[{}] {text}", level.tag());
    }

    write!(out, "{:010} ", attributes.time().unwrap_or(0))?;
    if let Some(file) = attributes.file() {
        write!(
            out,
            "{file}:{}, {}: ",
            attributes.line().unwrap_or(0),
            attributes.function().unwrap_or("?")
        )?;
    }
    write!(out, "{level}")?;
    if let Some(category) = category {
        write!(out, " [{category}]")?;
    }
    write!(out, ": {text}\r\n")
}

fn print_message(
    text: &str,
    level: LogLevel,
    category: Option<&str>,
    attributes: &LogAttributes,
    _context: Context,
) {
    let mut out = stdout().lock();
    // Nowhere to report a failed write to stdout.
    let _ = write_line(&mut out, style(), text, level, category, attributes);
    let _ = out.flush();
}

fn print_raw(data: &[u8], _level: LogLevel, _category: Option<&str>, _context: Context) {
    let mut out = stdout().lock();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn enabled(level: LogLevel, category: Option<&str>, _context: Context) -> bool {
    if level < self::level() {
        return false;
    }
    let filter = CATEGORY_FILTER
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    matches_prefix(filter.as_deref(), category)
}
