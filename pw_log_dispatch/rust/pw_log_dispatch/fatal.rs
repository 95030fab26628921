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

//! The fatal path taken by [`log_panic!`](crate::log_panic).
//!
//! After the PANIC message is logged control passes to the registered
//! [`PanicHandler`] and never comes back.  The handler receives the caller's
//! error code and a microsecond delay primitive, which platforms use to let
//! a backend drain before resetting.

use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

/// Busy waits for the given number of microseconds.
pub type DelayFn = fn(micros: u32);

/// Platform hook for unrecoverable errors.
#[derive(Clone, Copy, Debug)]
pub struct PanicHandler {
    /// Halts or resets the system.
    pub halt: fn(code: i32, delay: DelayFn) -> !,
    /// Delay primitive passed to `halt`.
    pub delay: DelayFn,
}

fn default_halt(code: i32, _delay: DelayFn) -> ! {
    panic!("fatal error {code}")
}

#[cfg(feature = "std")]
fn default_delay(micros: u32) {
    std::thread::sleep(std::time::Duration::from_micros(u64::from(micros)));
}

#[cfg(not(feature = "std"))]
fn default_delay(_micros: u32) {}

static DEFAULT_HANDLER: PanicHandler = PanicHandler {
    halt: default_halt,
    delay: default_delay,
};

static HANDLER: AtomicPtr<PanicHandler> = AtomicPtr::new(ptr::null_mut());

/// Installs the platform's fatal error handler.
///
/// Until one is installed, fatal errors raise a Rust panic carrying the
/// error code.
pub fn set_panic_handler(handler: &'static PanicHandler) {
    HANDLER.store(ptr::from_ref(handler).cast_mut(), Ordering::Release);
}

/// Reinstalls the default handler.
pub fn reset_panic_handler() {
    HANDLER.store(ptr::null_mut(), Ordering::Release);
}

fn handler() -> &'static PanicHandler {
    let handler = HANDLER.load(Ordering::Acquire);
    // SAFETY: Only `&'static PanicHandler` values are stored.
    unsafe { handler.as_ref() }.unwrap_or(&DEFAULT_HANDLER)
}

/// Hands control to the panic handler with `code`.
pub fn panic(code: i32) -> ! {
    let handler = handler();
    (handler.halt)(code, handler.delay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::with_registry_lock;
    use std::panic::catch_unwind;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DELAYED: AtomicU32 = AtomicU32::new(0);

    fn record_delay(micros: u32) {
        DELAYED.store(micros, Ordering::Relaxed);
    }

    fn test_halt(code: i32, delay: DelayFn) -> ! {
        delay(500);
        std::panic::panic_any(code)
    }

    static TEST_HANDLER: PanicHandler = PanicHandler {
        halt: test_halt,
        delay: record_delay,
    };

    #[test]
    fn default_handler_panics_with_code() {
        let result = with_registry_lock(|| {
            reset_panic_handler();
            catch_unwind(|| panic(17))
        });
        let payload = result.unwrap_err();
        let message = payload.downcast_ref::<String>().unwrap();
        assert_eq!(message, "fatal error 17");
    }

    #[test]
    fn installed_handler_receives_code_and_delay() {
        let result = with_registry_lock(|| {
            set_panic_handler(&TEST_HANDLER);
            let result = catch_unwind(|| panic(-3));
            reset_panic_handler();
            result
        });
        assert_eq!(*result.unwrap_err().downcast_ref::<i32>().unwrap(), -3);
        assert_eq!(DELAYED.load(Ordering::Relaxed), 500);
    }
}
