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

//! Errors returned by the helpers that sit outside the dispatch path.
//!
//! Dispatch itself never fails.  Values are compatible with Pigweed's
//! [pw_status](https://pigweed.dev/pw_status) codes.

/// Status code for no error.
pub const OK: u32 = 0;

/// Error type for fallible helpers such as [`crate::hex::encode`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// Input that can never be valid, e.g. an odd number of hex digits.
    InvalidArgument = 3,
    /// An output buffer is too small for the result.
    OutOfRange = 11,
}

/// `Result` alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Convert a Result into a status code.
pub trait StatusCode {
    /// Return a pigweed compatible status code.
    fn status_code(self) -> u32;
}

impl<T> StatusCode for Result<T> {
    fn status_code(self) -> u32 {
        match self {
            Ok(_) => OK,
            Err(e) => e as u32,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidArgument => f.write_str("invalid argument"),
            Error::OutOfRange => f.write_str("out of range"),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        assert_eq!(Result::Ok(()).status_code(), 0);
        assert_eq!(Result::<()>::Err(Error::InvalidArgument).status_code(), 3);
        assert_eq!(Result::<()>::Err(Error::OutOfRange).status_code(), 11);
    }
}
