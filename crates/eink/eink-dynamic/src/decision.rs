//! Refresh verdicts
//!
//! Every decision cycle produces exactly one [`Decision`]: skip the frame,
//! push it with a fast refresh, or push it with a full refresh. Each verdict
//! carries the [`Reason`] that produced it so a log trace explains the panel's
//! behaviour.

/// Terminal mode of a decision cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// No verdict reached. Never valid at the end of a cycle.
    #[default]
    Unspecified,
    /// Frame not pushed.
    Skipped,
    /// Partial-window refresh.
    Fast,
    /// Full-window refresh, clears ghosting.
    Full,
}

impl Mode {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Unspecified => "UNSPECIFIED",
            Mode::Skipped => "SKIPPED",
            Mode::Fast => "FAST",
            Mode::Full => "FULL",
        }
    }
}

/// Cause of a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reason {
    /// Background frame requested before the background interval elapsed.
    ExceededRateLimitFull,
    /// Responsive frame requested before the responsive interval elapsed.
    ExceededRateLimitFast,
    /// `COSMETIC` flag set.
    FlaggedCosmetic,
    /// `DEMAND_FAST` flag set.
    FlaggedDemandFast,
    /// Too many fast refreshes in a row.
    ExceededFastRefreshLimit,
    /// Buffer identical to the one on screen.
    FrameMatchedPrevious,
    /// Unchanged background frame redrawn in full to clear fast-refresh residue.
    RedrawWithFull,
    /// Background frame, policy says fast.
    BackgroundUsesFast,
    /// Background frame, policy says full.
    FlaggedBackground,
    /// Responsive frame and nothing objected to a fast refresh.
    NoObjections,
    /// Too many pixels at risk of ghosting.
    ExceededGhostingLimit,
    /// Demand-fast request arrived during an async full refresh.
    AsyncBlockedDemandFast,
    /// Cosmetic request arrived during an async full refresh.
    AsyncBlockedCosmetic,
    /// Responsive request arrived during an async full refresh.
    AsyncBlockedResponsive,
    /// Background request arrived during an async full refresh.
    AsyncBlockedBackground,
}

impl Reason {
    /// Stable name used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::ExceededRateLimitFull => "EXCEEDED_RATELIMIT_FULL",
            Reason::ExceededRateLimitFast => "EXCEEDED_RATELIMIT_FAST",
            Reason::FlaggedCosmetic => "FLAGGED_COSMETIC",
            Reason::FlaggedDemandFast => "FLAGGED_DEMANDFAST",
            Reason::ExceededFastRefreshLimit => "EXCEEDED_LIMIT_FASTREFRESH",
            Reason::FrameMatchedPrevious => "FRAME_MATCHED_PREVIOUS",
            Reason::RedrawWithFull => "REDRAW_WITH_FULL",
            Reason::BackgroundUsesFast => "BACKGROUND_USES_FAST",
            Reason::FlaggedBackground => "FLAGGED_BACKGROUND",
            Reason::NoObjections => "NO_OBJECTIONS",
            Reason::ExceededGhostingLimit => "EXCEEDED_GHOSTINGLIMIT",
            Reason::AsyncBlockedDemandFast => "ASYNC_REFRESH_BLOCKED_DEMANDFAST",
            Reason::AsyncBlockedCosmetic => "ASYNC_REFRESH_BLOCKED_COSMETIC",
            Reason::AsyncBlockedResponsive => "ASYNC_REFRESH_BLOCKED_RESPONSIVE",
            Reason::AsyncBlockedBackground => "ASYNC_REFRESH_BLOCKED_BACKGROUND",
        }
    }
}

/// Verdict of one decision cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decision {
    /// Initial state, or the outcome of a cycle where no check fired.
    #[default]
    Unspecified,
    /// Frame dropped.
    Skipped(Reason),
    /// Push with a fast refresh.
    Fast(Reason),
    /// Push with a full refresh.
    Full(Reason),
}

impl Decision {
    /// Mode without the reason.
    pub fn mode(&self) -> Mode {
        match self {
            Decision::Unspecified => Mode::Unspecified,
            Decision::Skipped(_) => Mode::Skipped,
            Decision::Fast(_) => Mode::Fast,
            Decision::Full(_) => Mode::Full,
        }
    }

    /// Reason, if a verdict was reached.
    pub fn reason(&self) -> Option<Reason> {
        match *self {
            Decision::Unspecified => None,
            Decision::Skipped(r) | Decision::Fast(r) | Decision::Full(r) => Some(r),
        }
    }

    /// `true` for FAST and FULL.
    pub fn triggers_refresh(&self) -> bool {
        matches!(self, Decision::Fast(_) | Decision::Full(_))
    }

    /// Reason name for log lines, `"NONE"` when unspecified.
    pub fn reason_str(&self) -> &'static str {
        self.reason().map_or("NONE", |r| r.as_str())
    }
}
