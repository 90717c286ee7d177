//! Content checks
//!
//! Once a request survives promotion, the async poll and rate limiting, these
//! checks run in a fixed order. Each returns `Some` to claim the verdict or
//! `None` to pass; the first claim wins and later checks are not evaluated.
//!
//! ```text
//! cosmetic → demand fast → fast refresh limit → ghosting → duplicate → fallback
//! ```

use crate::config::{BackgroundPolicy, DuplicatePolicy, DynamicConfig};
use crate::decision::{Decision, Reason};
use crate::flags::FrameFlags;
use crate::ghost::GhostTracker;
use crate::history::History;

/// Outcome of the content checks for one candidate frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Verdict; `Unspecified` only if no check claimed the frame.
    pub decision: Decision,
    /// Ghost pixels counted, if the ghosting check ran.
    pub ghost_pixels: Option<u32>,
}

/// Run the content checks in order.
///
/// `ghost` is `Some` when ghost tracking is enabled; its dirty map is only
/// updated if the checks ahead of it passed.
pub fn evaluate<const N: usize>(
    flags: FrameFlags,
    hash: u32,
    buffer: &[u8],
    history: &History,
    config: &DynamicConfig,
    ghost: Option<&mut GhostTracker<N>>,
) -> Evaluation {
    let mut ghost_pixels = None;

    let decision = cosmetic(flags)
        .or_else(|| demand_fast(flags))
        .or_else(|| fast_refresh_limit(history.fast_refresh_count(), config.fast_refresh_limit))
        .or_else(|| {
            let limit = config.ghosting_limit?;
            let count = ghost?.count_and_mark(buffer);
            ghost_pixels = Some(count);
            ghosting(count, limit)
        })
        .or_else(|| {
            duplicate(
                flags,
                hash,
                history.hash(),
                history.fast_refresh_count(),
                config.duplicates,
            )
        })
        .or_else(|| fallback(flags, config.background))
        .unwrap_or_default();

    Evaluation {
        decision,
        ghost_pixels,
    }
}

/// `COSMETIC` wants full quality.
pub fn cosmetic(flags: FrameFlags) -> Option<Decision> {
    flags
        .contains(FrameFlags::COSMETIC)
        .then_some(Decision::Full(Reason::FlaggedCosmetic))
}

/// `DEMAND_FAST` wants a fast refresh no matter what.
pub fn demand_fast(flags: FrameFlags) -> Option<Decision> {
    flags
        .contains(FrameFlags::DEMAND_FAST)
        .then_some(Decision::Fast(Reason::FlaggedDemandFast))
}

/// Interrupt a run of fast refreshes once it reaches `limit`.
pub fn fast_refresh_limit(fast_refresh_count: u32, limit: u32) -> Option<Decision> {
    (fast_refresh_count >= limit).then_some(Decision::Full(Reason::ExceededFastRefreshLimit))
}

/// Force a full refresh when more than `limit` pixels would ghost.
pub fn ghosting(ghost_pixels: u32, limit: u32) -> Option<Decision> {
    (ghost_pixels > limit).then_some(Decision::Full(Reason::ExceededGhostingLimit))
}

/// Frame identical to the one on screen.
pub fn duplicate(
    flags: FrameFlags,
    hash: u32,
    previous_hash: Option<u32>,
    fast_refresh_count: u32,
    policy: DuplicatePolicy,
) -> Option<Decision> {
    if previous_hash != Some(hash) {
        return None;
    }

    let residue = flags.is_plain_background() && fast_refresh_count > 0;
    if residue && policy == DuplicatePolicy::RedrawWithFull {
        Some(Decision::Full(Reason::RedrawWithFull))
    } else {
        Some(Decision::Skipped(Reason::FrameMatchedPrevious))
    }
}

/// Nothing objected: background frames follow the policy, responsive frames
/// go fast.
pub fn fallback(flags: FrameFlags, policy: BackgroundPolicy) -> Option<Decision> {
    if flags.is_plain_background() {
        return Some(match policy {
            BackgroundPolicy::Fast => Decision::Fast(Reason::BackgroundUsesFast),
            BackgroundPolicy::Full => Decision::Full(Reason::FlaggedBackground),
        });
    }

    flags
        .contains(FrameFlags::RESPONSIVE)
        .then_some(Decision::Fast(Reason::NoObjections))
}
