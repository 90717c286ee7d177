//! Monotonic millisecond clock
//!
//! The refresh engine measures rate-limit intervals against a free-running
//! `u32` millisecond counter. The counter is allowed to wrap (about every
//! 49.7 days); consumers detect the wrap by `now < previous` and must not
//! treat it as an error.

/// Monotonic millisecond time source.
pub trait MonotonicClock {
    /// Milliseconds since an arbitrary epoch, wrapping at `u32::MAX`.
    fn now_ms(&self) -> u32;
}

/// [`MonotonicClock`] backed by the embassy time driver.
///
/// On the STM32 target the driver is the TIM2 time driver; on desktop the
/// consumer must enable embassy-time's `std` feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    // Truncation is the wrap behaviour the trait documents.
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> u32 {
        embassy_time::Instant::now().as_millis() as u32
    }
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
