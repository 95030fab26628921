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

use pw_log_dispatch::capture::run_with_capture;
use pw_log_dispatch::prelude::*;

fn logged_category(action: impl FnOnce()) -> Option<String> {
    let records = run_with_capture(action);
    assert_eq!(records.len(), 1, "{records:?}");
    records[0].category().map(str::to_string)
}

mod storage {
    use pw_log_dispatch::prelude::*;

    log_source_category!("storage");

    pub fn emit() {
        log!(LogLevel::INFO, "source tier");
    }

    pub fn emit_scoped() {
        log_category!("storage.flash");
        log!(LogLevel::INFO, "scope tier");
    }

    pub fn emit_nested() -> Option<&'static str> {
        log_category!("storage.outer");
        {
            log_category!("storage.inner");
            log!(LogLevel::INFO, "nested scope");
        }
        this_category!()
    }

    pub fn emit_empty_scope() {
        log_category!("");
        log!(LogLevel::INFO, "empty scope");
    }

    pub fn emit_explicit() {
        log_category!("storage.flash");
        log!(category: "explicit", LogLevel::INFO, "explicit");
    }

    pub fn emit_explicit_none() {
        log!(category: None::<&str>, LogLevel::INFO, "explicitly uncategorized");
    }

    pub mod child {
        use super::*;

        pub fn emit() {
            log_write!(LogLevel::INFO, b"inherited");
        }
    }

    pub mod overriding_child {
        use super::*;

        log_source_category!("storage.child");

        pub fn emit() {
            log_dump!(LogLevel::INFO, [1u8]);
        }
    }
}

mod uncategorized {
    use pw_log_dispatch::prelude::*;

    pub fn emit() {
        log_print!(LogLevel::INFO, "no tier");
    }
}

#[test]
fn source_category_applies_to_module() {
    assert_eq!(logged_category(storage::emit).as_deref(), Some("storage"));
}

#[test]
fn scope_category_overrides_source() {
    assert_eq!(
        logged_category(storage::emit_scoped).as_deref(),
        Some("storage.flash")
    );
}

#[test]
fn nested_scope_overrides_enclosing_scope() {
    let mut outer = None;
    let category = logged_category(|| outer = storage::emit_nested());
    assert_eq!(category.as_deref(), Some("storage.inner"));
    assert_eq!(outer, Some("storage.outer"));
}

#[test]
fn empty_scope_category_is_unset() {
    assert_eq!(
        logged_category(storage::emit_empty_scope).as_deref(),
        Some("storage")
    );
}

#[test]
fn explicit_category_overrides_every_tier() {
    assert_eq!(
        logged_category(storage::emit_explicit).as_deref(),
        Some("explicit")
    );
    assert_eq!(logged_category(storage::emit_explicit_none), None);
}

#[test]
fn child_modules_inherit_source_category() {
    assert_eq!(
        logged_category(storage::child::emit).as_deref(),
        Some("storage")
    );
    assert_eq!(
        logged_category(storage::overriding_child::emit).as_deref(),
        Some("storage.child")
    );
}

#[test]
fn no_tier_is_uncategorized() {
    assert_eq!(logged_category(uncategorized::emit), None);
    assert_eq!(this_category!(), None);
}

#[test]
fn category_is_a_compile_time_constant() {
    const CATEGORY: Option<&str> = {
        log_category!("const.context");
        this_category!()
    };
    assert_eq!(CATEGORY, Some("const.context"));
}
