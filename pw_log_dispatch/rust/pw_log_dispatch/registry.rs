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

//! Backend registration.
//!
//! A backend describes itself with a static [`Callbacks`] and publishes it
//! once at startup with [`set_callbacks`].  Until then every dispatch is a
//! no-op and the run-time filter lets everything through.
//!
//! ```
//! use pw_log_dispatch::registry::{self, Callbacks};
//! use pw_log_dispatch::{Context, LogAttributes, LogLevel};
//!
//! fn on_message(
//!     text: &str,
//!     level: LogLevel,
//!     _category: Option<&str>,
//!     _attributes: &LogAttributes,
//!     _context: Context,
//! ) {
//!     println!("{level}: {text}");
//! }
//!
//! static BACKEND: Callbacks = Callbacks::new(Some(on_message), None, None, Context::NULL);
//!
//! registry::set_callbacks(&BACKEND);
//! # registry::clear_callbacks();
//! ```
//!
//! Registration is a single-writer, rare event.  The whole set is published
//! with one pointer store so a concurrent logger sees either the old set or
//! the new one, never a mix.

use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

use pw_log_dispatch_api::{Context, EnabledCallback, MessageCallback, WriteCallback};

/// A backend's callbacks and the context passed back to each of them.
#[derive(Clone, Copy, Debug)]
pub struct Callbacks {
    /// Receives rendered messages.
    pub message: Option<MessageCallback>,
    /// Receives raw writes and hex dumps.
    pub write: Option<WriteCallback>,
    /// Run-time filter.  `None` enables everything that passed the
    /// compile-time floor.
    pub enabled: Option<EnabledCallback>,
    /// Opaque value handed to every callback.
    pub context: Context,
}

impl Callbacks {
    /// The state before any backend registers: drop all output, enable all
    /// levels.
    pub const NONE: Callbacks = Callbacks {
        message: None,
        write: None,
        enabled: None,
        context: Context::NULL,
    };

    /// Creates a callback set.
    pub const fn new(
        message: Option<MessageCallback>,
        write: Option<WriteCallback>,
        enabled: Option<EnabledCallback>,
        context: Context,
    ) -> Self {
        Self {
            message,
            write,
            enabled,
            context,
        }
    }
}

impl Default for Callbacks {
    fn default() -> Self {
        Self::NONE
    }
}

static DEFAULT_CALLBACKS: Callbacks = Callbacks::NONE;

// Null means "not registered".
static CALLBACKS: AtomicPtr<Callbacks> = AtomicPtr::new(ptr::null_mut());

/// Replaces the registered callbacks with `callbacks`.
pub fn set_callbacks(callbacks: &'static Callbacks) {
    CALLBACKS.store(ptr::from_ref(callbacks).cast_mut(), Ordering::Release);
}

/// Restores the unregistered state.
pub fn clear_callbacks() {
    CALLBACKS.store(ptr::null_mut(), Ordering::Release);
}

/// Returns the registered callbacks, if any.
pub fn registered() -> Option<&'static Callbacks> {
    let callbacks = CALLBACKS.load(Ordering::Acquire);
    // SAFETY: Only `&'static Callbacks` are ever stored and the pointer is
    // never written through.
    unsafe { callbacks.as_ref() }
}

/// Returns the callbacks dispatch should use: the registered set, or
/// [`Callbacks::NONE`].
pub fn callbacks() -> &'static Callbacks {
    registered().unwrap_or(&DEFAULT_CALLBACKS)
}
