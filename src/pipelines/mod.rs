// SPDX-License-Identifier: MPL-2.0

//! Capture pipelines

pub mod photo;
