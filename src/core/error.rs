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

//! Frontend error types
use thiserror::Error;

/// Result type for frontend operations
pub type Result<T> = std::result::Result<T, FrontendError>;

/// Main error type for the frontend shell
#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("Directory is empty: {0}")]
    EmptyDirectory(String),

    #[error("Failed to read directory {path}: {source}")]
    UnreadableDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load content: {0}")]
    LoadFailed(String),

    #[error("Menu initialization failed: {0}")]
    MenuInit(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("History entry {index} out of range (size {size})")]
    HistoryIndex { index: usize, size: usize },

    #[error("Invalid bind: port {port}, id {id}")]
    InvalidBind { port: usize, id: usize },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}
