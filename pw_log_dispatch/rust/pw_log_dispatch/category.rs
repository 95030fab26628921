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

//! Category resolution.
//!
//! A category is a dot separated name such as `"net.tcp"` describing where a
//! message comes from.  Each call site resolves its category once, at compile
//! time, from three tiers (most specific first):
//!
//! 1. the scope category declared with [`log_category!`](crate::log_category)
//!    in the enclosing function or block,
//! 2. the source category declared with
//!    [`log_source_category!`](crate::log_source_category) in the enclosing
//!    module,
//! 3. the module category taken from `PW_LOG_MODULE_CATEGORY` when the
//!    calling crate is compiled.
//!
//! When no tier is set the message is uncategorized (`None`), which backends
//! treat as matching every filter.

use crate::filter::CompileTimeFilter;

/// The three category tiers in effect at a call site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryChain<'a> {
    /// Category declared for the enclosing function or block.
    pub scope: Option<&'a str>,
    /// Category declared for the enclosing source file.
    pub source: Option<&'a str>,
    /// Category of the whole compilation unit.
    pub module: Option<&'a str>,
}

impl<'a> CategoryChain<'a> {
    /// A chain with no tier set.
    pub const EMPTY: CategoryChain<'static> = CategoryChain {
        scope: None,
        source: None,
        module: None,
    };

    /// Creates a chain.  Empty strings count as unset.
    pub const fn new(
        scope: Option<&'a str>,
        source: Option<&'a str>,
        module: Option<&'a str>,
    ) -> Self {
        Self {
            scope,
            source,
            module,
        }
    }

    /// Returns the most specific category set in the chain.
    pub const fn resolve(self) -> Option<&'a str> {
        if let Some(scope) = normalize(self.scope) {
            return Some(scope);
        }
        if let Some(source) = normalize(self.source) {
            return Some(source);
        }
        normalize(self.module)
    }
}

/// Maps an empty category to `None`.
pub const fn normalize(category: Option<&str>) -> Option<&str> {
    match category {
        Some(category) if !category.is_empty() => Some(category),
        _ => None,
    }
}

/// Converts an explicit category argument, `&str` or `Option<&str>`, into a
/// category.
#[doc(hidden)]
pub fn explicit<'a>(category: impl Into<Option<&'a str>>) -> Option<&'a str> {
    normalize(category.into())
}

/// Resolves the category for a call site.  `None` when `filter` has logging
/// disabled, through either `PW_LOG_DISABLE` or the `disable` feature.
#[doc(hidden)]
pub const fn this_category(
    chain: CategoryChain<'static>,
    filter: CompileTimeFilter,
) -> Option<&'static str> {
    if filter.is_disabled() {
        None
    } else {
        chain.resolve()
    }
}

/// Returns `true` if `category` falls under `filter`.
///
/// A filter matches itself and every category below it in the dot
/// hierarchy: `"net"` matches `"net"` and `"net.tcp"` but not `"network"`.
/// A missing filter or a missing category matches everything.
///
/// ```
/// use pw_log_dispatch::category::matches_prefix;
///
/// assert!(matches_prefix(Some("net"), Some("net.tcp")));
/// assert!(!matches_prefix(Some("net"), Some("network")));
/// assert!(matches_prefix(Some("net"), None));
/// ```
pub fn matches_prefix(filter: Option<&str>, category: Option<&str>) -> bool {
    let (Some(filter), Some(category)) = (normalize(filter), normalize(category)) else {
        return true;
    };
    match category.strip_prefix(filter) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}
