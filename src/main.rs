// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser, Subcommand};
use hello_camera::app::{AppModel, Services};
use hello_camera::backends::audio::SystemSoundPlayer;
use hello_camera::backends::camera::{self, CameraUnit};
use hello_camera::backends::compositor::WindowCompositor;
use hello_camera::config::{Config, ConfigOverrides};
use hello_camera::constants::{APP_ID, LOG_FILE_NAME};
use hello_camera::storage::CameraRoll;
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

mod cli;

#[derive(Parser)]
#[command(name = "hello-camera")]
#[command(about = "Minimal camera: preview, take a picture, save it to the camera roll")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Flags that override the config file
#[derive(Args)]
struct Overrides {
    /// Config file (default: <config dir>/hello-camera/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Device node of the front camera
    #[arg(long, global = true)]
    front_device: Option<String>,

    /// Device node of the rear camera
    #[arg(long, global = true)]
    rear_device: Option<String>,

    /// Shutter sound name
    #[arg(long, global = true)]
    shutter_sound: Option<String>,
}

impl Overrides {
    fn load_config(self) -> Config {
        let config = match &self.config {
            Some(path) => Config::load_or_default(path),
            None => Config::load(),
        };
        config.with_overrides(ConfigOverrides {
            front_device: self.front_device,
            rear_device: self.rear_device,
            shutter_sound: self.shutter_sound,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras and the unit each one is used as
    List,

    /// Take a photo without the terminal UI
    Photo {
        /// Camera unit to use
        #[arg(short, long, value_enum, default_value_t = CameraUnit::Rear)]
        unit: CameraUnit,

        /// Output directory (default: the camera roll)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The terminal UI owns the screen, so its logs go to a file
    init_logging(cli.command.is_none());

    let config = cli.overrides.load_config();

    match cli.command {
        Some(Commands::List) => cli::list_cameras(&config),
        Some(Commands::Photo { unit, output }) => Ok(cli::take_photo(config, unit, output)?),
        None => run_terminal(config),
    }
}

/// Initialize logging
///
/// Set RUST_LOG environment variable to control log level
/// Examples: RUST_LOG=debug, RUST_LOG=hello_camera=debug, RUST_LOG=info
fn init_logging(to_file: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let log_file = to_file.then(open_log_file).flatten();
    match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None if to_file => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::sink)
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn open_log_file() -> Option<File> {
    let dir = dirs::state_dir().or_else(dirs::cache_dir)?.join(APP_ID);
    std::fs::create_dir_all(&dir).ok()?;
    File::create(dir.join(LOG_FILE_NAME)).ok()
}

fn run_terminal(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let (compositor, events) = WindowCompositor::new();
    let services = Services {
        camera: camera::get_backend(&config, Arc::clone(&compositor)),
        compositor: compositor.clone(),
        storage: Arc::new(CameraRoll::new(config.photo_directory())),
        sound: Arc::new(SystemSoundPlayer::new(config.sound_player.clone())),
    };

    let mut model = AppModel::new(&config, services);
    hello_camera::terminal::run(&mut model, &compositor, &events)
}
