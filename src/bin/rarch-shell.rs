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

//! Headless frontend shell
//!
//! Runs the lifecycle scheduler, menu and browser against headless drivers:
//! a core that runs a fixed number of frames, a video driver that logs
//! notifications and an input driver with nothing connected.

use clap::{Parser, ValueEnum};
use log::{error, info};
use rarch_shell::core::config::Settings;
use rarch_shell::core::dir_list::FsLister;
use rarch_shell::core::error::Result;
use rarch_shell::core::platform::{HostPlatform, Platform, PlatformProfile, PspPlatform};
use rarch_shell::frontend::headless::{FrameBudgetCore, HeadlessVideo, IdleInput};
use rarch_shell::frontend::{Drivers, ExitStatus, Frontend, ZipExtractor};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlatformArg {
    Host,
    Psp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PadArg {
    Generic,
    Console,
    Ps3,
}

impl PadArg {
    fn profile(self) -> PlatformProfile {
        match self {
            PadArg::Generic => PlatformProfile::generic(),
            PadArg::Console => PlatformProfile::console(),
            PadArg::Ps3 => PlatformProfile::ps3(),
        }
    }
}

/// Libretro frontend shell
#[derive(Parser)]
#[command(name = "rarch-shell")]
#[command(about = "Frontend shell for libretro cores", long_about = None)]
struct Args {
    /// Content to load at startup (opens the menu when omitted)
    content: Option<PathBuf>,

    /// Config file (defaults to rarch.toml next to the executable)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Platform layout
    #[arg(long, value_enum, default_value_t = PlatformArg::Host)]
    platform: PlatformArg,

    /// Pad family, overriding the platform default
    #[arg(long, value_enum)]
    pad: Option<PadArg>,

    /// Frames the headless core runs before shutting down
    #[arg(short = 'n', long, default_value = "600")]
    frames: u64,

    /// Content extensions accepted by the headless core
    #[arg(long, default_value = "bin|nes|sfc|md")]
    extensions: String,

    /// Browser start directory
    #[arg(long)]
    browse: Option<PathBuf>,

    /// Start the core without content
    #[arg(long)]
    no_content: bool,

    /// Stop after this many scheduler iterations
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    // Optional .env for RUST_LOG and friends
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    let args = Args::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    info!("rarch-shell v{}", env!("CARGO_PKG_VERSION"));

    match run(args) {
        Ok(status) => {
            info!("Shell stopped");
            u8::try_from(status.code()).map_or(ExitCode::FAILURE, ExitCode::from)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitStatus> {
    let mut platform: Box<dyn Platform> = match args.platform {
        PlatformArg::Host => Box::new(HostPlatform::new()),
        PlatformArg::Psp => Box::new(PspPlatform::new()),
    };
    run_on(platform.as_mut(), args)
}

/// Bring the platform up, run the frontend and always bring it down again
fn run_on(platform: &mut dyn Platform, args: Args) -> Result<ExitStatus> {
    platform.init()?;
    info!("Platform: {}", platform.name());

    let result = run_frontend(args, &*platform);

    platform.deinit();
    platform.exitspawn();
    result
}

fn run_frontend(args: Args, platform: &dyn Platform) -> Result<ExitStatus> {
    let argv0 = env::args_os().next().map(PathBuf::from).unwrap_or_default();
    let defaults = platform.environment_defaults(&argv0);

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| defaults.config_path.clone());
    let mut settings = Settings::load(&config_path)?;
    if let Some(dir) = args.browse {
        settings.browser_directory = Some(dir);
    }
    settings.apply_platform_defaults(&defaults);

    let profile = args
        .pad
        .map(PadArg::profile)
        .unwrap_or_else(|| platform.profile());

    let drivers = Drivers {
        core: Box::new(FrameBudgetCore::new(args.frames, &args.extensions)),
        video: Box::new(HeadlessVideo::new()),
        input: Box::new(IdleInput),
        lister: Box::new(FsLister),
        extractor: Some(Box::new(ZipExtractor)),
    };

    let mut frontend = Frontend::new(settings, defaults, profile, drivers)?;
    frontend.set_verbose(args.verbose);
    frontend.start(args.content, args.no_content);

    frontend.run_for(args.max_iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rarch_shell::core::platform::DefaultPaths;
    use std::ffi::OsString;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingPlatform {
        inits: usize,
        deinits: usize,
    }

    impl Platform for RecordingPlatform {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn environment_defaults(&self, _argv0: &std::path::Path) -> DefaultPaths {
            DefaultPaths::default()
        }

        fn profile(&self) -> PlatformProfile {
            PlatformProfile::generic()
        }

        fn init(&mut self) -> Result<()> {
            self.inits += 1;
            Ok(())
        }

        fn deinit(&mut self) {
            self.deinits += 1;
        }
    }

    #[test]
    fn test_platform_deinit_after_startup_error() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("broken.toml");
        fs::write(&config, "video = [unterminated").unwrap();

        let args = Args::parse_from([
            OsString::from("rarch-shell"),
            OsString::from("-c"),
            config.into_os_string(),
        ]);
        let mut platform = RecordingPlatform::default();

        assert!(run_on(&mut platform, args).is_err());
        assert_eq!(platform.inits, 1);
        assert_eq!(platform.deinits, 1);
    }
}
