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

//! Message rendering and dispatch to the registered backend.
//!
//! Messages are rendered into a [`MessageBuffer`] on the stack.  Text that
//! does not fit is cut at [`MessageBuffer::CAPACITY`] bytes and its last
//! character replaced with `~`.  Nothing is queued: without the matching
//! callback every function here returns without doing any work.

use core::fmt;

use pw_log_dispatch_api::{LogAttributes, LogLevel};

use crate::config::MAX_STRING_LENGTH;
use crate::registry;

/// Marker written over the last character of truncated text.
pub const TRUNCATION_MARKER: char = '~';

/// Fixed size buffer that text is formatted into.
///
/// Writes past [`MessageBuffer::CAPACITY`] keep as many whole characters as
/// fit and then fail with [`fmt::Error`] so that formatting stops early.
pub struct MessageBuffer {
    buffer: [u8; MAX_STRING_LENGTH],
    len: usize,
    truncated: bool,
}

impl MessageBuffer {
    /// Maximum number of bytes of text.  One byte of the configured length is
    /// reserved for a terminator.
    pub const CAPACITY: usize = MAX_STRING_LENGTH - 1;

    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self {
            buffer: [0; MAX_STRING_LENGTH],
            len: 0,
            truncated: false,
        }
    }

    /// Formats `args` into an empty buffer, marking the text if it had to be
    /// cut.
    pub fn format(args: fmt::Arguments) -> Self {
        let mut buffer = Self::new();
        if fmt::Write::write_fmt(&mut buffer, args).is_err() && buffer.truncated {
            buffer.mark_truncated();
        }
        buffer
    }

    /// Returns the text.
    pub fn as_str(&self) -> &str {
        // SAFETY: `write_str` only ever copies whole UTF-8 characters in and
        // `mark_truncated` replaces whole characters with an ASCII one.
        unsafe { core::str::from_utf8_unchecked(&self.buffer[..self.len]) }
    }

    /// Returns the text as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no text has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if text was dropped.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    fn mark_truncated(&mut self) {
        let Some(last) = self.as_str().chars().next_back() else {
            return;
        };
        self.len -= last.len_utf8();
        self.buffer[self.len] = TRUNCATION_MARKER as u8;
        self.len += 1;
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for MessageBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let available = Self::CAPACITY - self.len;
        let (fits, result) = if s.len() <= available {
            (s.len(), Ok(()))
        } else {
            self.truncated = true;
            let mut end = available;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            (end, Err(fmt::Error))
        };
        self.buffer[self.len..self.len + fits].copy_from_slice(&s.as_bytes()[..fits]);
        self.len += fits;
        result
    }
}

/// Renders `args` and passes the text to the message callback.
///
/// `attributes` should already have gone through
/// [`init_attributes`](crate::attributes::init_attributes).
pub fn log_message(
    level: LogLevel,
    category: Option<&str>,
    attributes: &LogAttributes,
    args: fmt::Arguments,
) {
    let callbacks = registry::callbacks();
    let Some(message) = callbacks.message else {
        return;
    };
    let buffer = MessageBuffer::format(args);
    message(
        buffer.as_str(),
        level,
        category,
        attributes,
        callbacks.context,
    );
}

/// Passes `data` unchanged to the write callback.  Empty writes are dropped.
pub fn log_write(level: LogLevel, category: Option<&str>, data: &[u8]) {
    if data.is_empty() {
        return;
    }
    let callbacks = registry::callbacks();
    if let Some(write) = callbacks.write {
        write(data, level, category, callbacks.context);
    }
}

/// Passes the bytes of `text` to the write callback.
pub fn log_print(level: LogLevel, category: Option<&str>, text: &str) {
    log_write(level, category, text.as_bytes());
}

/// Renders `args` and passes the text to the write callback.  Nothing is
/// rendered when no write callback is registered.
pub fn log_printf(level: LogLevel, category: Option<&str>, args: fmt::Arguments) {
    let callbacks = registry::callbacks();
    let Some(write) = callbacks.write else {
        return;
    };
    let buffer = MessageBuffer::format(args);
    if !buffer.is_empty() {
        write(buffer.as_bytes(), level, category, callbacks.context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Record, run_with_capture};
    use crate::registry::{self, Callbacks};
    use pw_log_dispatch_api::Context;

    fn text_of_length(len: usize) -> String {
        (0..len)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect()
    }

    #[test]
    fn short_text_is_unmodified() {
        let buffer = MessageBuffer::format(format_args!("value {} of {}", 3, "seven"));
        assert_eq!(buffer.as_str(), "value 3 of seven");
        assert!(!buffer.is_truncated());
    }

    #[test]
    fn text_at_capacity_is_unmodified() {
        let text = text_of_length(MessageBuffer::CAPACITY);
        let buffer = MessageBuffer::format(format_args!("{text}"));
        assert_eq!(buffer.as_str(), text);
        assert!(!buffer.is_truncated());
    }

    #[test]
    fn long_text_is_cut_to_capacity() {
        let text = text_of_length(MessageBuffer::CAPACITY + 40);
        let buffer = MessageBuffer::format(format_args!("{text}"));
        assert!(buffer.is_truncated());
        assert_eq!(buffer.len(), MessageBuffer::CAPACITY);
        assert_eq!(
            &buffer.as_str()[..MessageBuffer::CAPACITY - 1],
            &text[..MessageBuffer::CAPACITY - 1]
        );
        assert!(buffer.as_str().ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn truncation_across_pieces() {
        let half = text_of_length(MessageBuffer::CAPACITY / 2 + 1);
        let buffer = MessageBuffer::format(format_args!("{half}{half}{half}"));
        assert!(buffer.is_truncated());
        assert_eq!(buffer.len(), MessageBuffer::CAPACITY);
    }

    #[test]
    fn truncation_never_splits_characters() {
        let text: String = core::iter::repeat('é').take(MessageBuffer::CAPACITY).collect();
        let buffer = MessageBuffer::format(format_args!("{text}"));
        assert!(buffer.is_truncated());
        assert!(buffer.len() <= MessageBuffer::CAPACITY);
        assert!(buffer.as_str().ends_with(TRUNCATION_MARKER));
        assert!(buffer.as_str().trim_end_matches('~').chars().all(|c| c == 'é'));
    }

    #[test]
    fn message_goes_to_message_callback() {
        let records = run_with_capture(|| {
            let attributes = LogAttributes::new();
            log_message(
                LogLevel::WARN,
                Some("net.tcp"),
                &attributes,
                format_args!("retry {}", 2),
            );
        });
        assert_eq!(
            records,
            [Record::Message {
                text: "retry 2".into(),
                level: LogLevel::WARN,
                category: Some("net.tcp".into()),
                attributes: LogAttributes::new(),
            }]
        );
    }

    #[test]
    fn writes_go_to_write_callback() {
        let records = run_with_capture(|| {
            log_write(LogLevel::INFO, None, &[0, 1, 2]);
            log_print(LogLevel::INFO, Some("app"), "hello");
            log_printf(LogLevel::ERROR, None, format_args!("{}-{}", 1, 2));
            log_write(LogLevel::INFO, None, &[]);
            log_print(LogLevel::INFO, None, "");
        });
        assert_eq!(
            records,
            [
                Record::Write {
                    data: [0, 1, 2].into(),
                    level: LogLevel::INFO,
                    category: None,
                },
                Record::Write {
                    data: b"hello".into(),
                    level: LogLevel::INFO,
                    category: Some("app".into()),
                },
                Record::Write {
                    data: b"1-2".into(),
                    level: LogLevel::ERROR,
                    category: None,
                },
            ]
        );
    }

    fn unexpected_write(_: &[u8], _: LogLevel, _: Option<&str>, _: Context) {
        panic!("write callback must not be used for messages");
    }

    static WRITE_ONLY: Callbacks = Callbacks::new(None, Some(unexpected_write), None, Context::NULL);

    #[test]
    fn message_without_message_callback_is_dropped() {
        crate::capture::with_registry_lock(|| {
            registry::set_callbacks(&WRITE_ONLY);
            log_message(
                LogLevel::INFO,
                None,
                &LogAttributes::new(),
                format_args!("dropped"),
            );
            registry::clear_callbacks();
        });
    }

    #[test]
    fn nothing_registered_is_a_no_op() {
        crate::capture::with_registry_lock(|| {
            registry::clear_callbacks();
            log_message(
                LogLevel::INFO,
                None,
                &LogAttributes::new(),
                format_args!("x"),
            );
            log_write(LogLevel::INFO, None, b"x");
            log_print(LogLevel::INFO, None, "x");
            log_printf(LogLevel::INFO, None, format_args!("x"));
        });
    }
}
