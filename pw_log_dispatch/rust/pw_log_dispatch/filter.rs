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

//! Two stage level filtering.
//!
//! The first stage is a floor fixed when the calling crate is compiled.  The
//! logging macros test it inside an inline `const` block, so a call site
//! below the floor compiles to nothing.  The second stage asks the
//! registered backend through its enabled callback.

use pw_log_dispatch_api::LogLevel;

use crate::{config, registry};

/// The compile-time part of the filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileTimeFilter {
    floor: LogLevel,
    disabled: bool,
}

impl CompileTimeFilter {
    /// A filter that lets every level through.
    pub const ALLOW_ALL: CompileTimeFilter = CompileTimeFilter::new(LogLevel::ALL, false);

    /// Creates a filter.  [`LogLevel::DEFAULT`] as a floor means the same as
    /// [`LogLevel::ALL`].
    pub const fn new(floor: LogLevel, disabled: bool) -> Self {
        let floor = if floor.value() == LogLevel::DEFAULT.value() {
            LogLevel::ALL
        } else {
            floor
        };
        Self {
            floor,
            disabled: disabled || config::DISABLED,
        }
    }

    /// Builds a filter from the raw `PW_LOG_COMPILE_TIME_LEVEL` and
    /// `PW_LOG_DISABLE` values of the calling crate.
    ///
    /// Panics, failing the build when used in a `const`, if either value is
    /// malformed.
    pub const fn from_env(level: Option<&str>, disable: Option<&str>) -> Self {
        let floor = match level {
            None => LogLevel::ALL,
            Some(level) => match LogLevel::parse(level) {
                Some(level) => level,
                None => panic!("PW_LOG_COMPILE_TIME_LEVEL is not a log level name or number"),
            },
        };
        Self::new(floor, config::parse_flag(disable, false))
    }

    /// Returns the floor.
    pub const fn floor(self) -> LogLevel {
        self.floor
    }

    /// Returns `true` if logging is compiled out entirely.
    pub const fn is_disabled(self) -> bool {
        self.disabled
    }

    /// Returns `true` if a call site at `level` should be compiled.
    pub const fn allows(self, level: LogLevel) -> bool {
        !self.disabled && level.value() >= self.floor.value()
    }
}

/// Run-time stage: asks the registered enabled callback, or returns `true`
/// when there is none.
pub fn log_enabled(level: LogLevel, category: Option<&str>) -> bool {
    let callbacks = registry::callbacks();
    match callbacks.enabled {
        Some(enabled) => enabled(level, category, callbacks.context),
        None => true,
    }
}

/// Both stages for a level that is not known until run time.
///
/// Prefer [`log_enabled!`](crate::log_enabled) at call sites; it folds the
/// first stage at compile time.
pub fn enabled(filter: CompileTimeFilter, level: LogLevel, category: Option<&str>) -> bool {
    filter.allows(level) && log_enabled(level, category)
}
