//! Frame intent flags.
//!
//! Independent callers (a UI handler asking for a responsive frame, a
//! background timer asking for an idle redraw) each OR their intent into the
//! pending set; the next decision cycle evaluates the union by priority.

use bitflags::bitflags;

bitflags! {
    /// Why a frame was requested.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FrameFlags: u8 {
        /// Idle / periodic redraw.
        const BACKGROUND  = 0b0001;
        /// User interaction; wants a fast refresh.
        const RESPONSIVE  = 0b0010;
        /// Wants full quality regardless of cost (splash and boot screens).
        const COSMETIC    = 0b0100;
        /// One-off override demanding a fast refresh.
        const DEMAND_FAST = 0b1000;
    }
}

impl FrameFlags {
    /// `true` when the set is exactly `BACKGROUND` with nothing else.
    pub fn is_plain_background(self) -> bool {
        self == Self::BACKGROUND
    }

    /// Bypasses rate limiting.
    pub fn is_exempt_from_rate_limit(self) -> bool {
        self.intersects(Self::COSMETIC | Self::DEMAND_FAST)
    }
}
