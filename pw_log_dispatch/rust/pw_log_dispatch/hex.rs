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

//! Hex dumps of binary data.
//!
//! [`log_dump`] encodes bytes as two hex digits each and sends the text to
//! the write callback in chunks no larger than the message buffer.

use bitflags::bitflags;
use pw_log_dispatch_api::LogLevel;

use crate::config::MAX_STRING_LENGTH;
use crate::error::{Error, Result};
use crate::registry;

bitflags! {
    /// Formatting options for hex dumps.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DumpFlags: u32 {
        /// Separate bytes with a single space.
        const SPACED = 1 << 0;
        /// Use `A`-`F` instead of `a`-`f`.
        const UPPERCASE = 1 << 1;
    }
}

const LOWER_DIGITS: &[u8; 16] = b"0123456789abcdef";
const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

// Largest even number of characters that fits the message buffer, but room
// for at least one spaced byte.
const CHUNK_LENGTH: usize = if MAX_STRING_LENGTH < 4 {
    4
} else {
    MAX_STRING_LENGTH / 2 * 2
};

fn digits(flags: DumpFlags) -> &'static [u8; 16] {
    if flags.contains(DumpFlags::UPPERCASE) {
        UPPER_DIGITS
    } else {
        LOWER_DIGITS
    }
}

/// Number of characters [`encode`] produces for `len` bytes.
pub const fn encoded_len(len: usize, flags: DumpFlags) -> usize {
    if len == 0 {
        0
    } else if flags.contains(DumpFlags::SPACED) {
        len * 3 - 1
    } else {
        len * 2
    }
}

/// Encodes `data` into `out`, returning the number of bytes written.
///
/// Fails with [`Error::OutOfRange`] if `out` is shorter than
/// [`encoded_len`].
///
/// ```
/// use pw_log_dispatch::hex::{encode, DumpFlags};
///
/// let mut out = [0u8; 8];
/// let len = encode(&[0x00, 0xff, 0x1a], &mut out, DumpFlags::empty()).unwrap();
/// assert_eq!(&out[..len], b"00ff1a");
/// ```
pub fn encode(data: &[u8], out: &mut [u8], flags: DumpFlags) -> Result<usize> {
    let len = encoded_len(data.len(), flags);
    if out.len() < len {
        return Err(Error::OutOfRange);
    }
    let digits = digits(flags);
    let spaced = flags.contains(DumpFlags::SPACED);
    let mut offset = 0;
    for (i, byte) in data.iter().enumerate() {
        if spaced && i != 0 {
            out[offset] = b' ';
            offset += 1;
        }
        out[offset] = digits[usize::from(byte >> 4)];
        out[offset + 1] = digits[usize::from(byte & 0x0f)];
        offset += 2;
    }
    Ok(offset)
}

fn digit_value(digit: u8) -> Result<u8> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(Error::InvalidArgument),
    }
}

/// Decodes hex text produced by [`encode`] or [`log_dump`] into `out`,
/// returning the number of bytes written.  ASCII whitespace between bytes is
/// skipped.
///
/// Fails with [`Error::InvalidArgument`] on a non-hex character or a dangling
/// digit and with [`Error::OutOfRange`] if `out` is too short.
pub fn decode(text: &[u8], out: &mut [u8]) -> Result<usize> {
    let mut len = 0;
    let mut high: Option<u8> = None;
    for &c in text {
        if c.is_ascii_whitespace() {
            if high.is_some() {
                return Err(Error::InvalidArgument);
            }
            continue;
        }
        let value = digit_value(c)?;
        match high.take() {
            None => high = Some(value),
            Some(high) => {
                let slot = out.get_mut(len).ok_or(Error::OutOfRange)?;
                *slot = (high << 4) | value;
                len += 1;
            }
        }
    }
    if high.is_some() {
        return Err(Error::InvalidArgument);
    }
    Ok(len)
}

/// Hex encodes `data` and passes the text to the write callback.
///
/// Output is split into chunks of at most the message buffer size; chunks
/// always end on a byte boundary.  Empty input, or no registered write
/// callback, produces no output.
pub fn log_dump(level: LogLevel, category: Option<&str>, data: &[u8], flags: DumpFlags) {
    if data.is_empty() {
        return;
    }
    let callbacks = registry::callbacks();
    let Some(write) = callbacks.write else {
        return;
    };

    let digits = digits(flags);
    let spaced = flags.contains(DumpFlags::SPACED);
    let mut buffer = [0u8; CHUNK_LENGTH];
    let mut offset = 0;
    for (i, byte) in data.iter().enumerate() {
        let needed = if spaced && i != 0 { 3 } else { 2 };
        if offset + needed > CHUNK_LENGTH {
            write(&buffer[..offset], level, category, callbacks.context);
            offset = 0;
        }
        if spaced && i != 0 {
            buffer[offset] = b' ';
            offset += 1;
        }
        buffer[offset] = digits[usize::from(byte >> 4)];
        buffer[offset + 1] = digits[usize::from(byte & 0x0f)];
        offset += 2;
    }
    if offset != 0 {
        write(&buffer[..offset], level, category, callbacks.context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Record, run_with_capture};

    fn dump(data: &[u8], flags: DumpFlags) -> Vec<Vec<u8>> {
        run_with_capture(|| log_dump(LogLevel::INFO, Some("dump"), data, flags))
            .into_iter()
            .map(|record| match record {
                Record::Write {
                    data,
                    level,
                    category,
                } => {
                    assert_eq!(level, LogLevel::INFO);
                    assert_eq!(category.as_deref(), Some("dump"));
                    data
                }
                other => panic!("unexpected record {other:?}"),
            })
            .collect()
    }

    fn roundtrip(data: &[u8], flags: DumpFlags) {
        let text = dump(data, flags).concat();
        let mut decoded = vec![0u8; data.len()];
        let len = decode(&text, &mut decoded).unwrap();
        assert_eq!(&decoded[..len], data);
    }

    #[test]
    fn dump_is_lowercase_without_separators() {
        assert_eq!(
            dump(&[0x00, 0xff, 0x1a], DumpFlags::empty()),
            [b"00ff1a".to_vec()]
        );
    }

    #[test]
    fn dump_honors_flags() {
        assert_eq!(
            dump(&[0x00, 0xff, 0x1a], DumpFlags::SPACED | DumpFlags::UPPERCASE),
            [b"00 FF 1A".to_vec()]
        );
    }

    #[test]
    fn empty_dump_emits_nothing() {
        assert!(dump(&[], DumpFlags::empty()).is_empty());
        assert!(dump(&[], DumpFlags::SPACED).is_empty());
    }

    #[test]
    fn long_dump_is_chunked() {
        let data: Vec<u8> = (0..=255).collect();
        let chunks = dump(&data, DumpFlags::empty());
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|chunk| chunk.len() <= CHUNK_LENGTH));
        assert!(chunks.iter().all(|chunk| chunk.len() % 2 == 0));
        assert_eq!(chunks.concat().len(), data.len() * 2);
    }

    #[test]
    fn dumps_roundtrip() {
        let counting: Vec<u8> = (0..=255).collect();
        for data in [&[][..], &[0u8; 300][..], &[0xffu8; 300][..], &counting[..]] {
            roundtrip(data, DumpFlags::empty());
            roundtrip(data, DumpFlags::SPACED);
            roundtrip(data, DumpFlags::UPPERCASE);
        }
    }

    #[test]
    fn encode_checks_output_size() {
        let mut out = [0u8; 5];
        assert_eq!(
            encode(&[1, 2, 3], &mut out, DumpFlags::empty()),
            Err(Error::OutOfRange)
        );
        assert_eq!(encode(&[1, 2], &mut out, DumpFlags::SPACED), Ok(5));
        assert_eq!(&out, b"01 02");
        assert_eq!(encode(&[], &mut out, DumpFlags::SPACED), Ok(0));
    }

    #[test]
    fn decode_rejects_malformed_text() {
        let mut out = [0u8; 4];
        assert_eq!(decode(b"0", &mut out), Err(Error::InvalidArgument));
        assert_eq!(decode(b"0 1", &mut out), Err(Error::InvalidArgument));
        assert_eq!(decode(b"zz", &mut out), Err(Error::InvalidArgument));
        assert_eq!(decode(b"0102030405", &mut out), Err(Error::OutOfRange));
        assert_eq!(decode(b"", &mut out), Ok(0));
    }
}
