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

//! Build time configuration.
//!
//! Settings are read from environment variables when the relevant crate is
//! compiled.  Call site settings (`PW_LOG_COMPILE_TIME_LEVEL`,
//! `PW_LOG_DISABLE`, `PW_LOG_INCLUDE_SOURCE_INFO` and
//! `PW_LOG_MODULE_CATEGORY`) are read by the logging macros in the crate that
//! invokes them, typically set from its build script:
//!
//! ```text
//! println!("cargo:rustc-env=PW_LOG_COMPILE_TIME_LEVEL=INFO");
//! println!("cargo:rustc-env=PW_LOG_MODULE_CATEGORY=app.storage");
//! ```
//!
//! Invalid values fail the build.

/// Size of the buffer messages are rendered into, including one byte
/// reserved for the terminator a C backend would expect.  Rendered text is
/// therefore at most `MAX_STRING_LENGTH - 1` bytes.
///
/// Set with `PW_LOG_MAX_STRING_LENGTH` when building this crate.
pub const MAX_STRING_LENGTH: usize = parse_usize(option_env!("PW_LOG_MAX_STRING_LENGTH"), 160);

const _: () = assert!(
    MAX_STRING_LENGTH >= 2,
    "PW_LOG_MAX_STRING_LENGTH must be at least 2"
);

/// `true` when the `disable` feature turns every logging macro into a no-op.
pub const DISABLED: bool = cfg!(feature = "disable");

/// Parses an on/off setting.  `None` yields `default`.
pub const fn parse_flag(value: Option<&str>, default: bool) -> bool {
    let Some(value) = value else {
        return default;
    };
    let value = value.as_bytes().trim_ascii();
    if matches_any(value, &[b"1", b"true", b"on", b"yes"]) {
        true
    } else if value.is_empty() || matches_any(value, &[b"0", b"false", b"off", b"no"]) {
        false
    } else {
        panic!("expected a boolean log setting (1/0, true/false, on/off, yes/no)")
    }
}

const fn matches_any(value: &[u8], candidates: &[&[u8]]) -> bool {
    let mut i = 0;
    while i < candidates.len() {
        if bytes_eq(value, candidates[i]) {
            return true;
        }
        i += 1;
    }
    false
}

const fn bytes_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Parses a decimal size.  `None` yields `default`.
pub const fn parse_usize(value: Option<&str>, default: usize) -> usize {
    let Some(value) = value else {
        return default;
    };
    let digits = value.as_bytes().trim_ascii();
    if digits.is_empty() {
        panic!("expected a decimal log setting");
    }
    let mut result: usize = 0;
    let mut i = 0;
    while i < digits.len() {
        let digit = digits[i];
        if !digit.is_ascii_digit() {
            panic!("expected a decimal log setting");
        }
        result = match result.checked_mul(10) {
            Some(value) => match value.checked_add((digit - b'0') as usize) {
                Some(value) => value,
                None => panic!("log setting out of range"),
            },
            None => panic!("log setting out of range"),
        };
        i += 1;
    }
    result
}
