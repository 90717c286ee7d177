//! Cycle history and rate limiting
//!
//! The controller remembers what it did last cycle so the next one can rate
//! limit, detect duplicate frames, count consecutive fast refreshes and retry
//! requests that were suppressed.

use platform::RefreshMode;

use crate::config::DynamicConfig;
use crate::decision::{Decision, Reason};
use crate::flags::FrameFlags;

/// State carried from one decision cycle to the next.
///
/// Mutated only by the controller at the end of a completed cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    pub(crate) flags: FrameFlags,
    pub(crate) decision: Decision,
    pub(crate) hash: Option<u32>,
    pub(crate) previous_run_ms: Option<u32>,
    pub(crate) fast_refresh_count: u32,
    pub(crate) window: RefreshMode,
    pub(crate) ghost_pixel_count: Option<u32>,
}

impl History {
    /// Flags evaluated by the previous cycle.
    pub fn flags(&self) -> FrameFlags {
        self.flags
    }

    /// Verdict of the previous cycle.
    pub fn decision(&self) -> Decision {
        self.decision
    }

    /// Hash of the last frame actually pushed to the panel.
    pub fn hash(&self) -> Option<u32> {
        self.hash
    }

    /// Timestamp of the last cycle that passed rate limiting.
    pub fn previous_run_ms(&self) -> Option<u32> {
        self.previous_run_ms
    }

    /// Fast refreshes since the last full refresh.
    pub fn fast_refresh_count(&self) -> u32 {
        self.fast_refresh_count
    }

    /// Window configuration currently loaded into the controller.
    pub fn window(&self) -> RefreshMode {
        self.window
    }

    /// Ghost pixels counted for the most recent candidate frame, when ghost
    /// tracking is enabled and the check ran.
    pub fn ghost_pixel_count(&self) -> Option<u32> {
        self.ghost_pixel_count
    }

    /// Count one refresh: increment on fast, reset on full.
    pub(crate) fn adjust_refresh_counters(&mut self, decision: Decision) {
        match decision {
            Decision::Fast(_) => {
                self.fast_refresh_count = self.fast_refresh_count.saturating_add(1);
            }
            Decision::Full(_) => self.fast_refresh_count = 0,
            Decision::Skipped(_) | Decision::Unspecified => {}
        }
    }
}

/// Re-arm the flag of a request the previous cycle suppressed.
pub fn promote(flags: FrameFlags, previous: Decision) -> FrameFlags {
    match previous.reason() {
        Some(Reason::AsyncBlockedDemandFast) => flags | FrameFlags::DEMAND_FAST,
        Some(Reason::AsyncBlockedCosmetic) => flags | FrameFlags::COSMETIC,
        Some(Reason::AsyncBlockedResponsive | Reason::ExceededRateLimitFast) => {
            flags | FrameFlags::RESPONSIVE
        }
        _ => flags,
    }
}

/// Minimum interval check.
///
/// `previous_run_ms` is `None` until a cycle first passes this check, so the
/// first request is always served. A `now` earlier than the previous run means
/// the millisecond counter wrapped; the check is skipped for that cycle.
pub fn rate_limit(
    flags: FrameFlags,
    previous_run_ms: Option<u32>,
    now_ms: u32,
    config: &DynamicConfig,
) -> Option<Decision> {
    let previous = previous_run_ms?;
    let elapsed = now_ms.checked_sub(previous)?;

    if flags.is_plain_background() && elapsed < config.background_interval_ms {
        return Some(Decision::Skipped(Reason::ExceededRateLimitFull));
    }

    if flags.is_exempt_from_rate_limit() {
        return None;
    }

    if flags.contains(FrameFlags::RESPONSIVE) && elapsed < config.responsive_interval_ms {
        return Some(Decision::Skipped(Reason::ExceededRateLimitFast));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DynamicConfig {
        DynamicConfig::default()
            .with_background_interval_ms(30_000)
            .with_responsive_interval_ms(1_000)
    }

    #[test]
    fn test_first_request_is_not_limited() {
        assert_eq!(rate_limit(FrameFlags::BACKGROUND, None, 0, &config()), None);
    }

    #[test]
    fn test_background_limited_within_interval() {
        let c = config();
        assert_eq!(
            rate_limit(FrameFlags::BACKGROUND, Some(1_000), 30_999, &c),
            Some(Decision::Skipped(Reason::ExceededRateLimitFull))
        );
        assert_eq!(rate_limit(FrameFlags::BACKGROUND, Some(1_000), 31_000, &c), None);
    }

    #[test]
    fn test_responsive_limited_within_interval() {
        let c = config();
        let flags = FrameFlags::BACKGROUND | FrameFlags::RESPONSIVE;
        assert_eq!(
            rate_limit(flags, Some(0), 999, &c),
            Some(Decision::Skipped(Reason::ExceededRateLimitFast))
        );
        assert_eq!(rate_limit(flags, Some(0), 1_000, &c), None);
    }

    #[test]
    fn test_cosmetic_and_demand_fast_bypass() {
        let c = config();
        let cosmetic = FrameFlags::COSMETIC | FrameFlags::RESPONSIVE;
        let demand = FrameFlags::DEMAND_FAST | FrameFlags::BACKGROUND;
        assert_eq!(rate_limit(cosmetic, Some(0), 1, &c), None);
        assert_eq!(rate_limit(demand, Some(0), 1, &c), None);
    }

    #[test]
    fn test_wraparound_skips_check() {
        assert_eq!(
            rate_limit(FrameFlags::BACKGROUND, Some(u32::MAX - 10), 5, &config()),
            None
        );
    }

    #[test]
    fn test_promotion() {
        let bg = FrameFlags::BACKGROUND;
        assert_eq!(
            promote(bg, Decision::Skipped(Reason::AsyncBlockedDemandFast)),
            bg | FrameFlags::DEMAND_FAST
        );
        assert_eq!(
            promote(bg, Decision::Skipped(Reason::AsyncBlockedCosmetic)),
            bg | FrameFlags::COSMETIC
        );
        assert_eq!(
            promote(bg, Decision::Skipped(Reason::AsyncBlockedResponsive)),
            bg | FrameFlags::RESPONSIVE
        );
        assert_eq!(
            promote(bg, Decision::Skipped(Reason::ExceededRateLimitFast)),
            bg | FrameFlags::RESPONSIVE
        );
        assert_eq!(promote(bg, Decision::Skipped(Reason::AsyncBlockedBackground)), bg);
        assert_eq!(promote(bg, Decision::Skipped(Reason::ExceededRateLimitFull)), bg);
        assert_eq!(promote(bg, Decision::Unspecified), bg);
    }

    #[test]
    fn test_counters() {
        let mut h = History::default();
        h.adjust_refresh_counters(Decision::Fast(Reason::NoObjections));
        h.adjust_refresh_counters(Decision::Fast(Reason::NoObjections));
        assert_eq!(h.fast_refresh_count(), 2);
        h.adjust_refresh_counters(Decision::Skipped(Reason::FrameMatchedPrevious));
        assert_eq!(h.fast_refresh_count(), 2);
        h.adjust_refresh_counters(Decision::Full(Reason::FlaggedBackground));
        assert_eq!(h.fast_refresh_count(), 0);
    }
}
