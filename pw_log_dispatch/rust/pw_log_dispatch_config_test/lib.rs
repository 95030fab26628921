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

//! Logging call sites built with `PW_LOG_COMPILE_TIME_LEVEL=INFO`,
//! `PW_LOG_MODULE_CATEGORY=config_test` and source info forced on.

use pw_log_dispatch::prelude::*;

/// Logs once at each of several levels through each entry point.
pub fn log_at_every_level() {
    log!(LogLevel::TRACE, "trace");
    log!(LogLevel::INFO, "info");
    logf!(LogLevel::WARN, "warn %d", 1);
    log_write!(LogLevel::TRACE, b"trace write");
    log_print!(LogLevel::INFO, "info print");
    log_dump!(LogLevel::TRACE, [1u8]);
    log_printf!(LogLevel::ERROR, "error %u", 2u32);
}

/// Calls every entry point at a level below the floor.
pub fn log_below_floor() {
    log!(LogLevel::TRACE, "trace");
    logf!(LogLevel::TRACE, "trace %d", 1);
    log_write!(LogLevel::TRACE, b"trace write");
    log_print!(LogLevel::TRACE, "trace print");
    log_printf!(LogLevel::TRACE, "trace %u", 2u32);
    log_dump!(LogLevel::TRACE, [1u8, 2]);
}

pub fn trace_enabled() -> bool {
    log_enabled!(LogLevel::TRACE)
}

pub fn info_enabled() -> bool {
    log_enabled!(LogLevel::INFO)
}

pub fn module_category() -> Option<&'static str> {
    this_category!()
}

pub mod radio {
    use pw_log_dispatch::prelude::*;

    log_source_category!("radio");

    pub fn category() -> Option<&'static str> {
        this_category!()
    }

    pub fn emit() {
        log!(LogLevel::INFO, "radio up");
    }
}
