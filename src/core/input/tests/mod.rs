// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Input module tests
//!
//! - `binds`: bind table walking, defaults and dpad emulation rebinding
//! - `hotkeys`: hot key derivation from the port 0 pad state
//! - `ps3`: cellPad translation, dead zones and mouse queries

mod hotkeys;
