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

//! Frontend shell components
//!
//! This module contains the platform-independent building blocks:
//! - Lifecycle state (mode flags, hot keys, command queue)
//! - File browser and directory listing
//! - Ticker text for overflowing labels
//! - Controller input mapping and bind tables
//! - Content history, notification queue and settings
//! - Platform bring-up (default paths, exit listener)

pub mod browser;
pub mod config;
pub mod dir_list;
pub mod error;
pub mod history;
pub mod input;
pub mod lifecycle;
pub mod message_queue;
pub mod platform;
pub mod ticker;

// Re-export commonly used types
pub use browser::{Activation, BrowserAction, FileBrowser};
pub use config::{LoadFailurePolicy, Settings};
pub use error::{ConfigError, FrontendError, Result};
pub use history::RomHistory;
pub use lifecycle::{Command, Commands, Lifecycle, Mode, ModeFlags};
pub use message_queue::MessageQueue;
pub use ticker::Ticker;
