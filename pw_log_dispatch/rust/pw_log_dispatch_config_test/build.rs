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

// Logging configuration is read from the calling crate's build environment.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-env=PW_LOG_COMPILE_TIME_LEVEL=INFO");
    println!("cargo:rustc-env=PW_LOG_MODULE_CATEGORY=config_test");
    println!("cargo:rustc-env=PW_LOG_INCLUDE_SOURCE_INFO=1");
}
