// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  App Layer                   │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │  ┌─────────────┐    ┌──────────────────┐   │
//! │  │    Audio    │    │     Camera       │   │
//! │  │  (helper)   │    │     (V4L2)       │   │
//! │  └─────────────┘    └────────┬─────────┘   │
//! │                     ┌────────┴─────────┐   │
//! │                     │   Compositor     │   │
//! │                     │  (in-process)    │   │
//! │                     └──────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`audio`]: Named system sounds
//! - [`camera`]: Camera service and V4L2 implementation
//! - [`compositor`]: Windows the camera service renders the viewfinder into

pub mod audio;
pub mod camera;
pub mod compositor;
