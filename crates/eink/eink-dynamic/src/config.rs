//! Refresh policy configuration
//!
//! Built once at start-up and handed to the controller. The defaults suit a
//! small SSD16xx panel: background redraws at most every 30 s, interactive
//! redraws at most every second, a full refresh after five fast ones.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default background interval (30 s).
pub const DEFAULT_BACKGROUND_INTERVAL_MS: u32 = 30_000;

/// Default responsive interval (1 s).
pub const DEFAULT_RESPONSIVE_INTERVAL_MS: u32 = 1_000;

/// Default consecutive fast refresh ceiling.
pub const DEFAULT_FAST_REFRESH_LIMIT: u32 = 5;

/// Suggested ghost-pixel ceiling when ghost tracking is enabled.
pub const DEFAULT_GHOSTING_LIMIT_PX: u32 = 2_000;

/// How a plain `BACKGROUND` frame is refreshed once nothing else objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BackgroundPolicy {
    /// Full refresh (reason `FLAGGED_BACKGROUND`).
    #[default]
    Full,
    /// Fast refresh (reason `BACKGROUND_USES_FAST`).
    Fast,
}

/// What to do with an unchanged plain `BACKGROUND` frame that follows one or
/// more fast refreshes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DuplicatePolicy {
    /// Redraw it in full to wipe the fast-refresh residue.
    #[default]
    RedrawWithFull,
    /// Skip it like any other duplicate.
    Skip,
}

/// Runtime refresh policy.
///
/// # Example
///
/// ```
/// use eink_dynamic::DynamicConfig;
///
/// let config = DynamicConfig::default()
///     .with_fast_refresh_limit(8)
///     .with_ghosting_limit(Some(1_500))
///     .with_async_full(true);
/// assert_eq!(config.fast_refresh_limit, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DynamicConfig {
    /// Minimum spacing of plain background frames.
    pub background_interval_ms: u32,
    /// Minimum spacing of responsive frames.
    pub responsive_interval_ms: u32,
    /// Fast refreshes allowed before a full one is forced.
    pub fast_refresh_limit: u32,
    /// Ghost-pixel ceiling; `None` disables ghost tracking.
    pub ghosting_limit: Option<u32>,
    /// Leave full refreshes running and poll BUSY on later cycles.
    pub async_full: bool,
    /// Refresh mode for plain background frames.
    pub background: BackgroundPolicy,
    /// Handling of unchanged background frames after fast refreshes.
    pub duplicates: DuplicatePolicy,
}

impl Default for DynamicConfig {
    fn default() -> Self {
        Self {
            background_interval_ms: DEFAULT_BACKGROUND_INTERVAL_MS,
            responsive_interval_ms: DEFAULT_RESPONSIVE_INTERVAL_MS,
            fast_refresh_limit: DEFAULT_FAST_REFRESH_LIMIT,
            ghosting_limit: None,
            async_full: false,
            background: BackgroundPolicy::Full,
            duplicates: DuplicatePolicy::RedrawWithFull,
        }
    }
}

impl DynamicConfig {
    /// Background frames refresh fast; unchanged frames are always skipped.
    ///
    /// Once background frames use fast refresh there is no full refresh to
    /// redraw a duplicate with, so the two policies travel together.
    pub fn background_uses_fast() -> Self {
        Self {
            background: BackgroundPolicy::Fast,
            duplicates: DuplicatePolicy::Skip,
            ..Self::default()
        }
    }

    /// Set the background interval.
    #[must_use]
    pub fn with_background_interval_ms(mut self, ms: u32) -> Self {
        self.background_interval_ms = ms;
        self
    }

    /// Set the responsive interval.
    #[must_use]
    pub fn with_responsive_interval_ms(mut self, ms: u32) -> Self {
        self.responsive_interval_ms = ms;
        self
    }

    /// Set the consecutive fast refresh ceiling.
    #[must_use]
    pub fn with_fast_refresh_limit(mut self, limit: u32) -> Self {
        self.fast_refresh_limit = limit;
        self
    }

    /// Enable (`Some`) or disable (`None`) ghost tracking.
    #[must_use]
    pub fn with_ghosting_limit(mut self, limit: Option<u32>) -> Self {
        self.ghosting_limit = limit;
        self
    }

    /// Enable or disable async full refreshes.
    #[must_use]
    pub fn with_async_full(mut self, enabled: bool) -> Self {
        self.async_full = enabled;
        self
    }

    /// Set the background refresh policy.
    #[must_use]
    pub fn with_background(mut self, policy: BackgroundPolicy) -> Self {
        self.background = policy;
        self
    }

    /// Set the duplicate frame policy.
    #[must_use]
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }
}
