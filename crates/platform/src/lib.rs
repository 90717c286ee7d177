//! Hardware Abstraction Layer for the dynamic e-ink refresh engine
//!
//! This crate provides the narrow, trait-based interfaces the refresh engine
//! consumes, so the decision logic can be developed and tested without a
//! physical panel.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (UI, background timers)
//!         ↓
//! Refresh engine (eink-dynamic)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Panel driver (SSD16xx over SPI, or a test double)
//! ```
//!
//! # Contents
//!
//! - [`EinkPanel`] - Panel collaborator: buffer, windows, update, BUSY
//! - [`Framebuffer`] - Packed 1bpp `embedded-graphics` draw target
//! - [`MonotonicClock`] - Wrapping millisecond time source
//! - [`BusyPin`] - Active-HIGH BUSY line over `embedded-hal`
//!
//! # Features
//!
//! - `std`: Enable standard library support (`std::error::Error` impls)
//! - `defmt`: Enable defmt derives

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
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod busy;
pub mod clock;
pub mod display;
pub mod framebuffer;

pub use busy::BusyPin;
pub use clock::{EmbassyClock, MonotonicClock};
pub use display::{DisplayError, EinkPanel, RefreshMode};
pub use framebuffer::{buffer_len, Framebuffer};
