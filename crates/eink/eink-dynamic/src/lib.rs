//! Dynamic refresh mode selection for e-ink panels
//!
//! E-ink panels trade two costs against each other: a full refresh is slow
//! and flickers but clears ghosting, a fast refresh is quick but leaves
//! residue behind. This crate decides, once per frame, whether to skip the
//! frame, push it fast, or push it full.
//!
//! # Overview
//!
//! ```text
//! request_frame ─► pending flags ─┐
//!                                 ▼
//!   history ─► promote ─► async poll ─► rate limit ─► content checks ─► verdict
//!      ▲                                                                  │
//!      └──────────────────────── store_and_reset ◄────────────────────────┘
//! ```
//!
//! - [`FrameFlags`] - why a frame was requested
//! - [`Decision`] / [`Reason`] - the verdict and its cause
//! - [`DynamicConfig`] - intervals, limits and policies
//! - [`DynamicDisplay`] - the controller owning panel, clock and history
//!
//! # Features
//!
//! - `std`: `std::error::Error` impls
//! - `defmt`: on-target logging and `defmt::Format` derives
//! - `tracing`: desktop logging
//! - `serde`: (de)serialize [`DynamicConfig`]

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::print_stdout)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

// Must come first so the log macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod async_full;
pub mod config;
pub mod controller;
pub mod decision;
pub mod error;
pub mod flags;
pub mod ghost;
pub mod hash;
pub mod history;
pub mod pipeline;

pub use async_full::AsyncFullRefresh;
pub use config::{
    BackgroundPolicy, DuplicatePolicy, DynamicConfig, DEFAULT_BACKGROUND_INTERVAL_MS,
    DEFAULT_FAST_REFRESH_LIMIT, DEFAULT_GHOSTING_LIMIT_PX, DEFAULT_RESPONSIVE_INTERVAL_MS,
};
pub use controller::DynamicDisplay;
pub use decision::{Decision, Mode, Reason};
pub use error::ConfigError;
pub use flags::FrameFlags;
pub use ghost::GhostTracker;
pub use hash::frame_hash;
pub use history::History;
