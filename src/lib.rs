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

//! Frontend shell for libretro cores
//!
//! This library provides everything around the emulation core: the lifecycle
//! scheduler that picks between loading content, running the core and running
//! the menu, the file-browser menu, and per-console pad mapping.
//!
//! # Example
//!
//! ```
//! use rarch_shell::core::lifecycle::{Lifecycle, Mode};
//!
//! let mut lifecycle = Lifecycle::new();
//! lifecycle.request_menu();
//! lifecycle.request_load();
//!
//! // Loading always wins
//! assert_eq!(lifecycle.next_mode(false), Mode::LoadGame);
//! ```

pub mod core;
pub mod frontend;
