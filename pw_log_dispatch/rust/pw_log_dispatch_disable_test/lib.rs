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

//! Logging call sites built with `PW_LOG_DISABLE=1`.

use pw_log_dispatch::prelude::*;

log_source_category!("disabled");

/// Calls every entry point at the highest message level.
pub fn log_everything() {
    log!(LogLevel::ERROR, "error");
    logf!(LogLevel::ERROR, "error %d", 1);
    log_write!(LogLevel::ERROR, b"error write");
    log_print!(LogLevel::ERROR, "error print");
    log_printf!(LogLevel::ERROR, "error %u", 2u32);
    log_dump!(LogLevel::ERROR, [1u8, 2]);
    log!(category: "explicit", LogLevel::PANIC, "panic level");
    log_debug!(LogLevel::ERROR, "debug only");
}

pub fn error_enabled() -> bool {
    log_enabled!(LogLevel::ERROR)
}

pub fn source_category() -> Option<&'static str> {
    this_category!()
}

pub fn scope_category() -> Option<&'static str> {
    log_category!("disabled.scope");
    this_category!()
}
