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

//! Test helpers that record everything a backend would receive.
//!
//! ```
//! use pw_log_dispatch::capture::{run_with_capture, Record};
//! use pw_log_dispatch::prelude::*;
//!
//! let records = run_with_capture(|| log!(category: "net.tcp", LogLevel::WARN, "retry {}", 3));
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].text(), Some("retry 3"));
//! assert_eq!(records[0].category(), Some("net.tcp"));
//! ```
//!
//! The registration is process wide, so captures (and anything else that
//! touches it) are serialized through [`with_registry_lock`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use pw_log_dispatch_api::{Context, EnabledCallback, LogAttributes, LogLevel};

use crate::registry::{self, Callbacks};

/// One backend callback invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Record {
    /// The message callback was called.
    Message {
        /// Rendered text.
        text: String,
        /// Message level.
        level: LogLevel,
        /// Message category.
        category: Option<String>,
        /// Attributes passed with the message.
        attributes: LogAttributes,
    },
    /// The write callback was called.
    Write {
        /// Bytes written.
        data: Vec<u8>,
        /// Write level.
        level: LogLevel,
        /// Write category.
        category: Option<String>,
    },
    /// The enabled callback was called.
    Enabled {
        /// Queried level.
        level: LogLevel,
        /// Queried category.
        category: Option<String>,
    },
}

impl Record {
    /// Level carried by the invocation.
    pub fn level(&self) -> LogLevel {
        match self {
            Record::Message { level, .. }
            | Record::Write { level, .. }
            | Record::Enabled { level, .. } => *level,
        }
    }

    /// Category carried by the invocation.
    pub fn category(&self) -> Option<&str> {
        match self {
            Record::Message { category, .. }
            | Record::Write { category, .. }
            | Record::Enabled { category, .. } => category.as_deref(),
        }
    }

    /// Text of a message record.
    pub fn text(&self) -> Option<&str> {
        match self {
            Record::Message { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Bytes of a write record.
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Record::Write { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Attributes of a message record.
    pub fn attributes(&self) -> Option<&LogAttributes> {
        match self {
            Record::Message { attributes, .. } => Some(attributes),
            _ => None,
        }
    }
}

static REGISTRY_LOCK: Mutex<()> = Mutex::new(());
static RECORDS: Mutex<Vec<Record>> = Mutex::new(Vec::new());
static PREDICATE: Mutex<Option<EnabledCallback>> = Mutex::new(None);

// A failed assertion inside a capture must not wedge every later test.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn push(record: Record) {
    lock(&RECORDS).push(record);
}

fn capture_message(
    text: &str,
    level: LogLevel,
    category: Option<&str>,
    attributes: &LogAttributes,
    _context: Context,
) {
    push(Record::Message {
        text: text.into(),
        level,
        category: category.map(Into::into),
        attributes: *attributes,
    });
}

fn capture_write(data: &[u8], level: LogLevel, category: Option<&str>, _context: Context) {
    push(Record::Write {
        data: data.into(),
        level,
        category: category.map(Into::into),
    });
}

fn capture_enabled(level: LogLevel, category: Option<&str>, context: Context) -> bool {
    push(Record::Enabled {
        level,
        category: category.map(Into::into),
    });
    let predicate = *lock(&PREDICATE);
    predicate.is_none_or(|predicate| predicate(level, category, context))
}

static CAPTURE: Callbacks = Callbacks::new(
    Some(capture_message),
    Some(capture_write),
    None,
    Context::NULL,
);

static CAPTURE_FILTERED: Callbacks = Callbacks::new(
    Some(capture_message),
    Some(capture_write),
    Some(capture_enabled),
    Context::NULL,
);

/// Runs `f` while holding the lock that serializes access to the global
/// registration, clock and panic handler.
///
/// Not reentrant: calling [`run_with_capture`] from `f` deadlocks.
pub fn with_registry_lock<R>(f: impl FnOnce() -> R) -> R {
    let _guard = lock(&REGISTRY_LOCK);
    f()
}

// Puts the previous registration back, also when the action panics.
struct Restore(Option<&'static Callbacks>);

impl Drop for Restore {
    fn drop(&mut self) {
        match self.0 {
            Some(callbacks) => registry::set_callbacks(callbacks),
            None => registry::clear_callbacks(),
        }
        *lock(&PREDICATE) = None;
    }
}

fn capture(
    callbacks: &'static Callbacks,
    predicate: Option<EnabledCallback>,
    action: impl FnOnce(),
) -> Vec<Record> {
    with_registry_lock(|| {
        let _restore = Restore(registry::registered());
        lock(&RECORDS).clear();
        *lock(&PREDICATE) = predicate;
        registry::set_callbacks(callbacks);
        action();
        core::mem::take(&mut *lock(&RECORDS))
    })
}

/// Runs `action` with recording callbacks registered and returns every
/// message and write it produced, in order.  No enabled callback is
/// registered, so the run-time filter lets everything through.
pub fn run_with_capture(action: impl FnOnce()) -> Vec<Record> {
    capture(&CAPTURE, None, action)
}

/// Like [`run_with_capture`], but also registers an enabled callback that
/// records each query as [`Record::Enabled`] and answers it with
/// `predicate`.
pub fn run_with_capture_filtered(
    predicate: EnabledCallback,
    action: impl FnOnce(),
) -> Vec<Record> {
    capture(&CAPTURE_FILTERED, Some(predicate), action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deny_all(_: LogLevel, _: Option<&str>, _: Context) -> bool {
        false
    }

    #[test]
    fn restores_previous_registration() {
        with_registry_lock(registry::clear_callbacks);
        run_with_capture(|| {
            assert!(registry::registered().is_some());
        });
        with_registry_lock(|| assert!(registry::registered().is_none()));
    }

    #[test]
    fn restores_after_panic() {
        let result = std::panic::catch_unwind(|| {
            run_with_capture(|| panic!("inside capture"));
        });
        assert!(result.is_err());
        with_registry_lock(|| assert!(registry::registered().is_none()));
    }

    #[test]
    fn filtered_capture_records_queries() {
        let records = run_with_capture_filtered(deny_all, || {
            assert!(!crate::filter::log_enabled(LogLevel::INFO, Some("a")));
        });
        assert_eq!(
            records,
            [Record::Enabled {
                level: LogLevel::INFO,
                category: Some("a".into()),
            }]
        );
    }
}
