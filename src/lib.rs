// SPDX-License-Identifier: MPL-2.0

//! Hello Camera - a minimal camera application
//!
//! Opens the front or rear camera, shows its viewfinder, takes a picture and
//! saves it to the camera roll.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Application state, camera session control and the buttons
//! - [`backends`]: Camera service, window compositor and audio
//! - [`pipelines`]: Still capture: shutter sound and saving
//! - [`config`]: User configuration handling
//! - [`storage`]: Camera roll files
//! - [`terminal`]: Terminal front end

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod pipelines;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use errors::{AppError, AppResult};
