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

use nix::unistd::{dup, dup2, pipe};
use std::fs::File;
use std::io::{Read, Write, stdout};
use std::os::fd::AsRawFd;

use pw_log_dispatch::prelude::*;
use pw_log_dispatch_backend_println::{LineStyle, init, set_category_filter, set_level, set_style};

#[cfg(not(target_os = "macos"))]
fn flush_stdout() {
    // Safety: Test only.  Calling into a libc function w/o any dependency on
    // data from the Rust side.
    unsafe {
        unsafe extern "C" {
            static stdout: *mut libc::FILE;
        }
        libc::fflush(stdout);
    }
}

#[cfg(target_os = "macos")]
fn flush_stdout() {
    // Safety: Test only.  Calling into a libc function w/o any dependency on
    // data from the Rust side.
    unsafe {
        unsafe extern "C" {
            // MacOS uses a #define to declare stdout so we need to expand that
            // manually.
            static __stdoutp: *mut libc::FILE;
        }
        libc::fflush(__stdoutp);
    }
}

// Runs `action` while capturing stdout and returns the captured output.
//
// The backend writes to the process' stdout rather than through `print!`, so
// the test harness' own capture does not see it.  Replace `STDOUT_FILENO`
// with the write side of a pipe instead.  POSIX only.
fn run_with_capture<F: FnOnce()>(action: F) -> String {
    let stdout_fd = stdout().as_raw_fd();

    // Duplicate the current stdout so we can restore it after the test.
    let old_stdout = dup(stdout_fd).unwrap();

    let (pipe_rx, pipe_tx) = pipe().unwrap();

    stdout().flush().unwrap();
    flush_stdout();

    dup2(pipe_tx.as_raw_fd(), stdout_fd).unwrap();

    action();

    stdout().flush().unwrap();
    flush_stdout();

    dup2(old_stdout, stdout_fd).unwrap();
    nix::unistd::close(old_stdout).unwrap();

    // Drop the writer side of the pipe to close it so that read will see an
    // EOF.
    drop(pipe_tx);

    let mut pipe_rx: File = pipe_rx.into();
    let mut output = String::new();
    pipe_rx.read_to_string(&mut output).unwrap();

    output
}

fn line_body(line: &str) -> &str {
    // Skip the timestamp.
    let (time, body) = line.split_at(10);
    assert!(time.bytes().all(|b| b.is_ascii_digit()), "{line:?}");
    body
}

// Stdout and the backend settings are process wide, so everything runs in a
// single test.
#[test]
fn backend_prints_to_stdout() {
    init();

    let output = run_with_capture(|| {
        log!(category: "net.tcp", LogLevel::WARN, "retry {}", 3);
        logf!(LogLevel::INFO, "%s has %u bytes", "flash", 4096u32);
    });
    let lines: Vec<&str> = output.split_inclusive("\r\n").collect();
    assert_eq!(lines.len(), 2, "{output:?}");
    if cfg!(debug_assertions) {
        let body = line_body(lines[0]);
        assert!(body.starts_with(" println_backend_test.rs:"), "{body:?}");
        assert!(body.contains("backend_prints_to_stdout: "), "{body:?}");
        assert!(body.ends_with("WARN [net.tcp]: retry 3\r\n"), "{body:?}");
        assert!(line_body(lines[1]).ends_with("INFO: flash has 4096 bytes\r\n"));
    } else {
        assert_eq!(line_body(lines[0]), " WARN [net.tcp]: retry 3\r\n");
        assert_eq!(line_body(lines[1]), " INFO: flash has 4096 bytes\r\n");
    }

    let output = run_with_capture(|| {
        log_print!(LogLevel::INFO, "raw text\n");
        log_write!(LogLevel::INFO, b"bytes\n");
        log_dump!(LogLevel::INFO, [0x00u8, 0xff, 0x1a]);
    });
    assert_eq!(output, "raw text\nbytes\n00ff1a");

    set_style(LineStyle::Tagged);
    let output = run_with_capture(|| {
        log!(LogLevel::INFO, "test");
        logf!(LogLevel::ERROR, "test %d", -1);
        logf!(LogLevel::TRACE, "test %c", 'c');
    });
    assert_eq!(output, "[INF] test\n[ERR] test -1\n[TRC] test c\n");

    set_level(LogLevel::WARN);
    set_category_filter(Some("net"));
    let output = run_with_capture(|| {
        log!(LogLevel::INFO, "below threshold");
        log!(category: "network", LogLevel::ERROR, "other category");
        log!(category: "net.udp", LogLevel::ERROR, "kept");
        log!(LogLevel::WARN, "uncategorized");
        assert!(!log_enabled!(LogLevel::INFO));
        assert!(log_enabled!(category: "net", LogLevel::WARN));
    });
    assert_eq!(output, "[ERR] kept\n[WRN] uncategorized\n");

    set_level(LogLevel::ALL);
    set_category_filter(None);
    set_style(LineStyle::Full);
}
