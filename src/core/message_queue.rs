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

//! On-screen notification queue
//!
//! Timed, prioritized user-visible messages. Pushing is fire-and-forget; the
//! video side pulls one message per frame and each pull consumes one frame of
//! the message's duration.
//!
//! # Example
//!
//! ```
//! use rarch_shell::core::message_queue::MessageQueue;
//!
//! let mut queue = MessageQueue::new(8);
//! queue.push("Saved state", 1, 2);
//! assert_eq!(queue.pull().as_deref(), Some("Saved state"));
//! assert_eq!(queue.pull().as_deref(), Some("Saved state"));
//! assert_eq!(queue.pull(), None);
//! ```

/// Default queue capacity
pub const DEFAULT_CAPACITY: usize = 8;

/// A queued message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message text
    pub text: String,

    /// Priority (higher is shown first)
    pub priority: u32,

    /// Remaining frames to display
    pub duration: u32,

    /// Insertion order, breaks priority ties
    seq: u64,
}

/// Bounded priority queue of timed messages
#[derive(Debug, Clone)]
pub struct MessageQueue {
    capacity: usize,
    messages: Vec<Message>,
    next_seq: u64,
}

impl MessageQueue {
    /// Create a queue holding at most `capacity` messages
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: Vec::with_capacity(capacity),
            next_seq: 0,
        }
    }

    /// Queue a message for `duration` frames
    ///
    /// Messages pushed while the queue is full are dropped. A zero duration
    /// is bumped to one frame so the message is shown at least once.
    pub fn push(&mut self, text: impl Into<String>, priority: u32, duration: u32) {
        let text = text.into();
        if self.messages.len() >= self.capacity {
            log::warn!("Message queue full, dropping: {}", text);
            return;
        }

        self.messages.push(Message {
            text,
            priority,
            duration: duration.max(1),
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Pull the current message
    ///
    /// Returns the highest-priority message (oldest first among equals) and
    /// consumes one frame of its duration, removing it when it runs out.
    pub fn pull(&mut self) -> Option<String> {
        let index = self
            .messages
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.priority.cmp(&b.priority).then(b.seq.cmp(&a.seq)))
            .map(|(i, _)| i)?;

        let message = &mut self.messages[index];
        message.duration -= 1;
        if message.duration == 0 {
            Some(self.messages.remove(index).text)
        } else {
            Some(message.text.clone())
        }
    }

    /// Peek at the message that the next `pull` would return
    pub fn peek(&self) -> Option<&Message> {
        self.messages
            .iter()
            .max_by(|a, b| a.priority.cmp(&b.priority).then(b.seq.cmp(&a.seq)))
    }

    /// Drop all queued messages
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of queued messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if no message is queued
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over queued messages in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
