//! E-Ink Refresh Testing Utilities
//!
//! Headless doubles for the two collaborators the refresh engine consumes:
//!
//! - [`TestPanel`]: an [`EinkPanel`] that owns a real [`Framebuffer`],
//!   records every hardware call, and plays back a scripted BUSY line.
//! - [`TestClock`]: a [`MonotonicClock`] advanced by hand, able to wrap.
//!
//! # Quick start
//!
//! ```
//! use eink_testing::{PanelCall, TestClock, TestPanel};
//! use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
//! use platform::EinkPanel;
//!
//! let mut panel = TestPanel::<32>::new(16, 16);
//! Pixel(Point::new(3, 3), BinaryColor::On).draw(&mut *panel).unwrap();
//!
//! panel.push_busy(&[true, false]);
//! assert!(panel.is_busy().unwrap());
//! assert!(!panel.is_busy().unwrap());
//! assert_eq!(panel.calls(), &[PanelCall::IsBusy, PanelCall::IsBusy]);
//!
//! let clock = TestClock::new(0);
//! clock.advance(1_500);
//! ```

#![warn(clippy::all)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![allow(clippy::module_name_repetitions)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};

use platform::{DisplayError, EinkPanel, Framebuffer, MonotonicClock};

// ─────────────────────────────────────────────────────────────────────────────
// PanelCall
// ─────────────────────────────────────────────────────────────────────────────

/// One hardware operation observed by a [`TestPanel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCall {
    /// `set_partial_window()`
    SetPartialWindow,
    /// `set_full_window()`
    SetFullWindow,
    /// `force_update()`
    ForceUpdate,
    /// `end_update()`
    EndUpdate,
    /// `end_async_full()`
    EndAsyncFull,
    /// `is_busy()`
    IsBusy,
}

// ─────────────────────────────────────────────────────────────────────────────
// TestPanel
// ─────────────────────────────────────────────────────────────────────────────

/// Headless e-ink panel for refresh-policy testing.
///
/// Derefs to [`Framebuffer`], which implements `DrawTarget`, so tests draw
/// embedded-graphics primitives directly:
///
/// ```
/// use eink_testing::TestPanel;
/// use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::{PrimitiveStyle, Rectangle}};
///
/// let mut panel = TestPanel::<32>::new(16, 16);
/// Rectangle::new(Point::zero(), Size::new(8, 8))
///     .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
///     .draw(&mut *panel)
///     .unwrap();
/// ```
pub struct TestPanel<const N: usize> {
    framebuffer: Framebuffer<N>,
    calls: Vec<PanelCall>,
    busy_script: VecDeque<bool>,
    fail_next: Option<DisplayError>,
    fail_on: Option<(PanelCall, DisplayError)>,
    updates: usize,
}

impl<const N: usize> TestPanel<N> {
    /// Create an all-white panel.
    ///
    /// # Panics
    ///
    /// If `N` does not match `width / 8 * height`. Test-only code.
    #[allow(clippy::panic)]
    pub fn new(width: u32, height: u32) -> Self {
        let Ok(framebuffer) = Framebuffer::new(width, height) else {
            panic!("TestPanel<{N}> cannot hold a {width}x{height} frame");
        };
        Self {
            framebuffer,
            calls: Vec::new(),
            busy_script: VecDeque::new(),
            fail_next: None,
            fail_on: None,
            updates: 0,
        }
    }

    /// Queue BUSY samples; once the script runs dry the line reads idle.
    pub fn push_busy(&mut self, samples: &[bool]) {
        self.busy_script.extend(samples.iter().copied());
    }

    /// Make the next hardware operation (any method except `buffer`) fail.
    pub fn fail_next(&mut self, error: DisplayError) {
        self.fail_next = Some(error);
    }

    /// Make the next `call` fail, letting every other operation through.
    pub fn fail_on(&mut self, call: PanelCall, error: DisplayError) {
        self.fail_on = Some((call, error));
    }

    /// Every hardware call so far, in order.
    pub fn calls(&self) -> &[PanelCall] {
        &self.calls
    }

    /// Forget recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// How many times `call` was observed.
    pub fn count(&self, call: PanelCall) -> usize {
        self.calls.iter().filter(|&&c| c == call).count()
    }

    /// Number of refreshes actually pushed to the panel.
    pub fn updates(&self) -> usize {
        self.updates
    }

    fn record(&mut self, call: PanelCall) -> Result<(), DisplayError> {
        self.calls.push(call);
        if let Some(error) = self.fail_next.take() {
            return Err(error);
        }
        match self.fail_on {
            Some((target, error)) if target == call => {
                self.fail_on = None;
                Err(error)
            }
            _ => Ok(()),
        }
    }
}

impl<const N: usize> Deref for TestPanel<N> {
    type Target = Framebuffer<N>;

    fn deref(&self) -> &Self::Target {
        &self.framebuffer
    }
}

impl<const N: usize> DerefMut for TestPanel<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.framebuffer
    }
}

impl<const N: usize> EinkPanel for TestPanel<N> {
    type Error = DisplayError;

    fn buffer(&self) -> &[u8] {
        self.framebuffer.as_bytes()
    }

    fn set_partial_window(&mut self) -> Result<(), Self::Error> {
        self.record(PanelCall::SetPartialWindow)
    }

    fn set_full_window(&mut self) -> Result<(), Self::Error> {
        self.record(PanelCall::SetFullWindow)
    }

    fn force_update(&mut self) -> Result<(), Self::Error> {
        self.record(PanelCall::ForceUpdate)?;
        self.updates = self.updates.saturating_add(1);
        Ok(())
    }

    fn end_update(&mut self) -> Result<(), Self::Error> {
        self.record(PanelCall::EndUpdate)
    }

    fn end_async_full(&mut self) -> Result<(), Self::Error> {
        self.record(PanelCall::EndAsyncFull)
    }

    fn is_busy(&mut self) -> Result<bool, Self::Error> {
        self.record(PanelCall::IsBusy)?;
        Ok(self.busy_script.pop_front().unwrap_or(false))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TestClock
// ─────────────────────────────────────────────────────────────────────────────

/// Manually driven millisecond clock.
///
/// Uses interior mutability so a test can keep advancing it while the
/// controller holds a shared reference.
#[derive(Debug, Default)]
pub struct TestClock {
    now: Cell<u32>,
}

impl TestClock {
    /// Start the clock at `now_ms`.
    pub fn new(now_ms: u32) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    /// Move time forward, wrapping at `u32::MAX` like a hardware counter.
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    /// Jump to an absolute time (may go backwards to simulate a wrap).
    pub fn set(&self, now_ms: u32) {
        self.now.set(now_ms);
    }
}

impl MonotonicClock for TestClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}
