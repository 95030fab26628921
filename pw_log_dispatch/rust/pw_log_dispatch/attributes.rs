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

//! Attribute capture and the clock that timestamps it.

use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

use pw_log_dispatch_api::LogAttributes;

/// Source of the millisecond timestamps stored in [`LogAttributes::time`].
///
/// The clock must not run backwards.  Wrapping at `u32::MAX` is expected.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    /// Milliseconds since startup.
    pub millis: fn() -> u32,
}

#[cfg(feature = "std")]
fn default_millis() -> u32 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    // Truncation wraps the timestamp roughly every 49 days.
    START.get_or_init(Instant::now).elapsed().as_millis() as u32
}

#[cfg(not(feature = "std"))]
fn default_millis() -> u32 {
    0
}

static DEFAULT_CLOCK: Clock = Clock {
    millis: default_millis,
};

static CLOCK: AtomicPtr<Clock> = AtomicPtr::new(ptr::null_mut());

/// Installs the platform clock.
pub fn set_clock(clock: &'static Clock) {
    CLOCK.store(ptr::from_ref(clock).cast_mut(), Ordering::Release);
}

/// Reinstalls the built in clock: time since first use on `std` builds, a
/// constant zero otherwise.
pub fn reset_clock() {
    CLOCK.store(ptr::null_mut(), Ordering::Release);
}

/// Reads the current clock.
pub fn now() -> u32 {
    let clock = CLOCK.load(Ordering::Acquire);
    // SAFETY: Only `&'static Clock` values are stored.
    let clock = unsafe { clock.as_ref() }.unwrap_or(&DEFAULT_CLOCK);
    (clock.millis)()
}

/// Returns `path` without its directory part.
pub fn strip_directory(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(separator) => &path[separator + 1..],
        None => path,
    }
}

/// Finishes a record right before dispatch: strips the directory from the
/// source file and stamps the current time.
pub fn init_attributes(attributes: &mut LogAttributes) {
    if let Some(file) = attributes.file {
        attributes.file = Some(strip_directory(file));
    }
    attributes.time = now();
}

/// Turns the type name of a function local item into the name of the
/// enclosing function.
#[doc(hidden)]
pub fn function_name(item_path: &'static str) -> &'static str {
    let mut name = item_path.strip_suffix("::__pw_log_fn").unwrap_or(item_path);
    while let Some(outer) = name.strip_suffix("::{{closure}}") {
        name = outer;
    }
    name
}

#[doc(hidden)]
pub fn type_name_of<T>(_: T) -> &'static str {
    core::any::type_name::<T>()
}
