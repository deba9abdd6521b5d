// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Custom assertions for frontend tests

use rarch_shell::core::lifecycle::{Lifecycle, Mode};
use rarch_shell::core::message_queue::MessageQueue;

/// Assert the mode the next iteration will run
#[allow(dead_code)]
pub fn assert_next_mode(lifecycle: &Lifecycle, shutdown: bool, expected: Mode) {
    let actual = lifecycle.next_mode(shutdown);
    assert_eq!(
        actual, expected,
        "Next mode mismatch: expected {:?}, got {:?} (flags {:?})",
        expected,
        actual,
        lifecycle.flags()
    );
}

/// Assert the queue holds exactly the given texts, in insertion order
#[allow(dead_code)]
pub fn assert_messages(queue: &MessageQueue, expected: &[&str]) {
    let actual: Vec<&str> = queue.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(actual, expected, "Message queue mismatch");
}
