//! Dynamic refresh controller
//!
//! Owns the panel, the clock and every piece of cycle history. Callers draw
//! into the panel, then call [`DynamicDisplay::display`] (background frame) or
//! [`DynamicDisplay::force_display`] (responsive frame) once per loop tick.
//!
//! # Cycle
//!
//! ```text
//! promote ─► async poll ─► rate limit ─┬─► hash ─► content checks ─► window
//!                │               │      │                               │
//!                └── SKIPPED ◄───┘      │                    force_update + finish
//!                                       ▼                               │
//!                               store history ◄─────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use eink_dynamic::{DynamicConfig, DynamicDisplay, FrameFlags, Mode};
//! use eink_testing::{TestClock, TestPanel};
//!
//! let clock = TestClock::new(0);
//! let panel = TestPanel::<5000>::new(200, 200);
//! let mut display =
//!     DynamicDisplay::<_, _, 5000>::new(panel, &clock, DynamicConfig::default()).unwrap();
//!
//! // Boot screen in full quality.
//! display.request_frame(FrameFlags::COSMETIC);
//! assert!(display.display().unwrap());
//! assert_eq!(display.decision().mode(), Mode::Full);
//! ```

use platform::{EinkPanel, MonotonicClock, RefreshMode};

use crate::async_full::AsyncFullRefresh;
use crate::config::DynamicConfig;
use crate::decision::Decision;
use crate::error::ConfigError;
use crate::flags::FrameFlags;
use crate::ghost::GhostTracker;
use crate::hash::frame_hash;
use crate::history::{promote, rate_limit, History};
use crate::pipeline;

/// What `determine_mode` hands to the commit step.
#[derive(Debug, Clone, Copy)]
struct Cycle {
    decision: Decision,
    /// `Some` once the cycle got past rate limiting.
    hash: Option<u32>,
    ghost_pixels: Option<u32>,
}

impl Cycle {
    fn blocked(decision: Decision) -> Self {
        Self {
            decision,
            hash: None,
            ghost_pixels: None,
        }
    }
}

/// E-ink panel with per-frame refresh mode selection.
///
/// `N` is the packed framebuffer size in bytes (`width / 8 * height`); it
/// sizes the ghost-pixel map.
pub struct DynamicDisplay<P, C, const N: usize> {
    panel: P,
    clock: C,
    config: DynamicConfig,
    pending: FrameFlags,
    decision: Decision,
    history: History,
    ghost: Option<GhostTracker<N>>,
    async_full: AsyncFullRefresh,
}

impl<P, C, const N: usize> DynamicDisplay<P, C, N>
where
    P: EinkPanel,
    C: MonotonicClock,
{
    /// Wrap a panel.
    ///
    /// The panel's buffer must be exactly `N` bytes. The controller assumes
    /// the panel starts in full-window configuration.
    pub fn new(panel: P, clock: C, config: DynamicConfig) -> Result<Self, ConfigError> {
        let actual = panel.buffer().len();
        if actual != N {
            return Err(ConfigError::BufferSize {
                expected: N,
                actual,
            });
        }

        Ok(Self {
            panel,
            clock,
            config,
            pending: FrameFlags::empty(),
            decision: Decision::Unspecified,
            history: History::default(),
            ghost: config.ghosting_limit.map(|_| GhostTracker::new()),
            async_full: AsyncFullRefresh::new(),
        })
    }

    /// Add intent for the next cycle. Requests accumulate until a cycle
    /// completes.
    pub fn request_frame(&mut self, flags: FrameFlags) {
        self.pending |= flags;
    }

    /// Run one cycle for a background frame.
    ///
    /// Returns whether the panel was refreshed.
    pub fn display(&mut self) -> Result<bool, P::Error> {
        self.request_frame(FrameFlags::BACKGROUND);
        self.update()
    }

    /// Run one cycle for a responsive frame.
    ///
    /// Returns whether the panel was refreshed.
    pub fn force_display(&mut self) -> Result<bool, P::Error> {
        self.request_frame(FrameFlags::RESPONSIVE);
        self.update()
    }

    /// The panel.
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// The panel, for drawing the next frame.
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// The clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// State carried between cycles.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Flags waiting for the next cycle.
    pub fn pending_flags(&self) -> FrameFlags {
        self.pending
    }

    /// Verdict of the last completed cycle.
    pub fn decision(&self) -> Decision {
        self.decision
    }

    /// Active policy.
    pub fn config(&self) -> &DynamicConfig {
        &self.config
    }

    /// A detached full refresh has not finished yet.
    pub fn is_async_refresh_running(&self) -> bool {
        self.async_full.is_running()
    }

    /// The ghost-pixel map, when ghost tracking is enabled.
    pub fn ghost_tracker(&self) -> Option<&GhostTracker<N>> {
        self.ghost.as_ref()
    }

    /// Give back the panel and clock.
    pub fn release(self) -> (P, C) {
        (self.panel, self.clock)
    }

    /// One full cycle: decide, refresh if approved, commit history.
    ///
    /// A panel error before the refresh is pushed aborts the cycle without
    /// committing history; the pending flags stay queued so the next cycle
    /// retries the request. Once `force_update` succeeds the cycle is
    /// committed, and a failure to finish it is returned afterwards.
    fn update(&mut self) -> Result<bool, P::Error> {
        let now = self.clock.now_ms();
        let cycle = self.determine_mode(now)?;

        let approved = cycle.decision.triggers_refresh();
        let mut finished = Ok(());
        if approved {
            self.panel.force_update()?;
            finished = if self.config.async_full {
                self.async_full.end_or_detach(&mut self.panel, cycle.decision)
            } else {
                self.panel.end_update()
            };
        }

        self.store_and_reset(now, cycle);
        finished.map(|()| approved)
    }

    fn determine_mode(&mut self, now: u32) -> Result<Cycle, P::Error> {
        self.pending = promote(self.pending, self.history.decision);
        let flags = self.pending;

        if self.config.async_full {
            if let Some(blocked) = self.async_full.poll(&mut self.panel, flags)? {
                return Ok(Cycle::blocked(blocked));
            }
        }

        if let Some(limited) = rate_limit(flags, self.history.previous_run_ms, now, &self.config) {
            return Ok(Cycle::blocked(limited));
        }

        let buffer = self.panel.buffer();
        let hash = frame_hash(buffer);
        let evaluation = pipeline::evaluate(
            flags,
            hash,
            buffer,
            &self.history,
            &self.config,
            self.ghost.as_mut(),
        );

        if let Some(count) = evaluation.ghost_pixels {
            debug!("ghost pixels: {}", count);
        }

        if evaluation.decision == Decision::Unspecified {
            warn!("no refresh mode decided, flags={}", flags.bits());
        } else {
            self.apply_refresh_mode(evaluation.decision)?;
        }

        Ok(Cycle {
            decision: evaluation.decision,
            hash: Some(hash),
            ghost_pixels: evaluation.ghost_pixels,
        })
    }

    /// Reload the window configuration only when crossing between fast and
    /// full.
    fn apply_refresh_mode(&mut self, decision: Decision) -> Result<(), P::Error> {
        let target = match decision {
            Decision::Fast(_) => RefreshMode::Fast,
            Decision::Full(_) => RefreshMode::Full,
            Decision::Skipped(_) | Decision::Unspecified => return Ok(()),
        };

        if target == self.history.window {
            return Ok(());
        }

        match target {
            RefreshMode::Fast => self.panel.set_partial_window()?,
            RefreshMode::Full => self.panel.set_full_window()?,
        }
        self.history.window = target;
        debug!("window -> {}", target.name());
        Ok(())
    }

    fn store_and_reset(&mut self, now: u32, cycle: Cycle) {
        let decision = cycle.decision;

        if let Some(hash) = cycle.hash {
            self.history.previous_run_ms = Some(now);
            if decision.triggers_refresh() {
                self.history.hash = Some(hash);
            }
        }

        self.history.adjust_refresh_counters(decision);

        if let (Decision::Full(_), Some(ghost)) = (decision, self.ghost.as_mut()) {
            ghost.reset(self.panel.buffer());
        }

        if cycle.ghost_pixels.is_some() {
            self.history.ghost_pixel_count = cycle.ghost_pixels;
        }

        self.history.flags = self.pending;
        self.history.decision = decision;
        self.decision = decision;
        self.pending = FrameFlags::empty();

        debug!(
            "refresh={}, reason={}",
            decision.mode().name(),
            decision.reason_str()
        );
    }
}
