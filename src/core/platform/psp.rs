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

//! PSP bring-up
//!
//! The PSP kernel delivers the HOME-menu exit request on its own thread. The
//! exit listener sleeps on a channel until [`ExitSignal::raise`] is called,
//! flushes the logger and runs the exit handler. It never touches frontend
//! state.

use super::{port_dir, DefaultPaths, Platform, PlatformProfile};
use crate::core::error::Result;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

/// Called on the listener thread when an exit is requested
pub type ExitHandler = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListenerEvent {
    Exit,
    Stop,
}

/// Handle used to request process exit
#[derive(Debug, Clone)]
pub struct ExitSignal {
    sender: Sender<ListenerEvent>,
}

impl ExitSignal {
    /// Wake the exit listener
    pub fn raise(&self) {
        if self.sender.send(ListenerEvent::Exit).is_err() {
            log::warn!("Exit listener is not running");
        }
    }
}

struct ExitListener {
    sender: Sender<ListenerEvent>,
    handle: JoinHandle<()>,
}

/// PSP platform
pub struct PspPlatform {
    exit_handler: Option<ExitHandler>,
    listener: Option<ExitListener>,
}

impl std::fmt::Debug for PspPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PspPlatform")
            .field("listening", &self.listener.is_some())
            .finish()
    }
}

impl Default for PspPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PspPlatform {
    /// PSP platform whose exit handler terminates the process
    pub fn new() -> Self {
        Self::with_exit_handler(Box::new(|| std::process::exit(0)))
    }

    pub fn with_exit_handler(handler: ExitHandler) -> Self {
        Self {
            exit_handler: Some(handler),
            listener: None,
        }
    }

    /// Signal handle, available once [`Platform::init`] has run
    pub fn exit_signal(&self) -> Option<ExitSignal> {
        self.listener.as_ref().map(|l| ExitSignal {
            sender: l.sender.clone(),
        })
    }
}

impl Platform for PspPlatform {
    fn name(&self) -> &'static str {
        "psp"
    }

    fn environment_defaults(&self, argv0: &Path) -> DefaultPaths {
        let paths = DefaultPaths::from_port_dir(port_dir(argv0), PathBuf::from("/"));
        log::info!("port dir: [{}]", paths.port_dir.display());
        paths
    }

    fn profile(&self) -> PlatformProfile {
        PlatformProfile::console()
    }

    fn init(&mut self) -> Result<()> {
        if self.listener.is_some() {
            return Ok(());
        }

        let Some(handler) = self.exit_handler.take() else {
            log::warn!("Exit handler already consumed, not starting listener");
            return Ok(());
        };

        let (sender, receiver) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("exit-listener".to_string())
            .spawn(move || {
                if receiver.recv() == Ok(ListenerEvent::Exit) {
                    log::info!("Exit requested");
                    log::logger().flush();
                    handler();
                }
            })?;

        self.listener = Some(ExitListener { sender, handle });
        log::debug!("PSP exit listener started");
        Ok(())
    }

    fn deinit(&mut self) {
        if let Some(ExitListener { sender, handle }) = self.listener.take() {
            // Fails harmlessly if the listener already exited
            let _ = sender.send(ListenerEvent::Stop);
            if handle.join().is_err() {
                log::error!("Exit listener panicked");
            }
        }
    }
}
