//! Property-based tests for the decision engine.
//! Verifies invariants hold for arbitrary request sequences, not just fixed
//! scenarios.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use eink_dynamic::{frame_hash, Decision, DynamicConfig, DynamicDisplay, FrameFlags, GhostTracker, Mode};
use eink_testing::{TestClock, TestPanel};
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use proptest::prelude::*;

/// One caller step: extra flags, which entry point, time passed, pixel touched.
fn step() -> impl Strategy<Value = (u8, bool, u32, i32, i32, bool)> {
    (
        0u8..16,
        proptest::bool::ANY,
        0u32..40_000,
        0i32..16,
        0i32..16,
        proptest::bool::ANY,
    )
}

fn config() -> impl Strategy<Value = DynamicConfig> {
    (
        proptest::bool::ANY,
        proptest::bool::ANY,
        proptest::option::of(0u32..16),
        1u32..8,
    )
        .prop_map(|(fast_background, async_full, ghosting, limit)| {
            let base = if fast_background {
                DynamicConfig::background_uses_fast()
            } else {
                DynamicConfig::default()
            };
            base.with_async_full(async_full)
                .with_ghosting_limit(ghosting)
                .with_fast_refresh_limit(limit)
        })
}

proptest! {
    /// Every completed cycle ends with a concrete verdict, and the counters
    /// follow it.
    #[test]
    fn cycles_never_end_unspecified(
        config in config(),
        steps in proptest::collection::vec(step(), 1..40),
        busy in proptest::collection::vec(proptest::bool::ANY, 0..20),
    ) {
        let clock = TestClock::new(0);
        let mut panel = TestPanel::<32>::new(16, 16);
        panel.push_busy(&busy);
        let mut d = DynamicDisplay::<_, _, 32>::new(panel, &clock, config).unwrap();

        for (extra, responsive, dt, x, y, black) in steps {
            clock.advance(dt);
            Pixel(Point::new(x, y), BinaryColor::from(black))
                .draw(&mut **d.panel_mut())
                .unwrap();
            d.request_frame(FrameFlags::from_bits_truncate(extra));

            let before = d.history().fast_refresh_count();
            let refreshed = if responsive { d.force_display() } else { d.display() }.unwrap();

            let decision = d.decision();
            prop_assert_ne!(decision.mode(), Mode::Unspecified);
            prop_assert_eq!(refreshed, decision.triggers_refresh());
            prop_assert!(d.pending_flags().is_empty());
            match decision {
                Decision::Fast(_) => prop_assert_eq!(d.history().fast_refresh_count(), before + 1),
                Decision::Full(_) => prop_assert_eq!(d.history().fast_refresh_count(), 0),
                _ => prop_assert_eq!(d.history().fast_refresh_count(), before),
            }
            if !config.async_full {
                prop_assert!(!d.is_async_refresh_running());
            }
        }
    }

    /// The checksum does not depend on byte order.
    #[test]
    fn hash_is_order_independent(mut bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let forward = frame_hash(&bytes);
        bytes.reverse();
        prop_assert_eq!(forward, frame_hash(&bytes));
    }

    /// Ghost pixels never exceed the pixels marked dirty beforehand, and a
    /// reset frame has no ghosts against itself.
    #[test]
    fn ghost_count_is_bounded(
        first in proptest::array::uniform8(any::<u8>()),
        second in proptest::array::uniform8(any::<u8>()),
    ) {
        let mut tracker = GhostTracker::<8>::new();
        prop_assert_eq!(tracker.count_and_mark(&first), 0);

        let dirty: u32 = first.iter().map(|b| b.count_ones()).sum();
        let ghosts = tracker.count_and_mark(&second);
        prop_assert!(ghosts <= dirty);

        tracker.reset(&second);
        prop_assert_eq!(tracker.count_and_mark(&second), 0);
    }
}
