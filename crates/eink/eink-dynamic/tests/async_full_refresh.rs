//! Detached full refreshes: BUSY polling, blocked requests and promotion.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use eink_dynamic::{Decision, DynamicConfig, DynamicDisplay, FrameFlags, Reason};
use eink_testing::{PanelCall, TestClock, TestPanel};
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use platform::DisplayError;

type Panel = TestPanel<32>;
type Display<'a> = DynamicDisplay<Panel, &'a TestClock, 32>;

fn async_display(clock: &TestClock) -> Display<'_> {
    let config = DynamicConfig::default().with_async_full(true);
    DynamicDisplay::new(Panel::new(16, 16), clock, config).unwrap()
}

fn ink(d: &mut Display<'_>, x: i32, y: i32) {
    Pixel(Point::new(x, y), BinaryColor::On)
        .draw(&mut **d.panel_mut())
        .unwrap();
}

#[test]
fn full_refresh_is_detached_and_finished_once() {
    let clock = TestClock::new(0);
    let mut d = async_display(&clock);

    d.request_frame(FrameFlags::COSMETIC);
    assert!(d.display().unwrap());
    assert!(d.is_async_refresh_running());
    assert_eq!(d.panel().calls(), &[PanelCall::ForceUpdate]);

    d.panel_mut().push_busy(&[true, true]);
    for _ in 0..2 {
        clock.advance(100);
        assert!(!d.display().unwrap());
        assert_eq!(d.decision(), Decision::Skipped(Reason::AsyncBlockedBackground));
    }
    assert_eq!(d.panel().count(PanelCall::EndAsyncFull), 0);

    clock.advance(30_000);
    ink(&mut d, 1, 1);
    assert!(d.display().unwrap());
    assert_eq!(d.panel().count(PanelCall::EndAsyncFull), 1);
    assert_eq!(d.decision(), Decision::Full(Reason::FlaggedBackground));
    // That full refresh is detached again.
    assert!(d.is_async_refresh_running());
}

#[test]
fn blocked_responsive_request_is_promoted_after_completion() {
    let clock = TestClock::new(0);
    let mut d = async_display(&clock);

    d.request_frame(FrameFlags::COSMETIC);
    d.display().unwrap();

    d.panel_mut().push_busy(&[true]);
    clock.advance(500);
    ink(&mut d, 2, 2);
    assert!(!d.force_display().unwrap());
    assert_eq!(d.decision(), Decision::Skipped(Reason::AsyncBlockedResponsive));

    // The caller only issues a background request now.
    clock.advance(500);
    assert!(d.display().unwrap());
    assert!(d.history().flags().contains(FrameFlags::RESPONSIVE));
    assert_eq!(d.decision(), Decision::Fast(Reason::NoObjections));
    // Fast refreshes finish synchronously.
    assert!(!d.is_async_refresh_running());
    assert_eq!(
        d.panel().calls().last().copied(),
        Some(PanelCall::EndUpdate)
    );
}

#[test]
fn blocked_reason_follows_flag_priority() {
    let clock = TestClock::new(0);
    let mut d = async_display(&clock);
    d.request_frame(FrameFlags::COSMETIC);
    d.display().unwrap();
    d.panel_mut().push_busy(&[true, true, true]);

    d.request_frame(FrameFlags::DEMAND_FAST | FrameFlags::COSMETIC);
    d.force_display().unwrap();
    assert_eq!(d.decision(), Decision::Skipped(Reason::AsyncBlockedDemandFast));

    // Promoted DEMAND_FAST keeps winning while the panel stays busy.
    d.display().unwrap();
    assert_eq!(d.decision(), Decision::Skipped(Reason::AsyncBlockedDemandFast));
    d.display().unwrap();
    assert_eq!(d.decision(), Decision::Skipped(Reason::AsyncBlockedDemandFast));

    d.display().unwrap();
    assert_eq!(d.decision(), Decision::Fast(Reason::FlaggedDemandFast));
}

#[test]
fn blocked_cosmetic_request_is_promoted() {
    let clock = TestClock::new(0);
    let mut d = async_display(&clock);
    d.request_frame(FrameFlags::COSMETIC);
    d.display().unwrap();
    d.panel_mut().push_busy(&[true]);

    d.request_frame(FrameFlags::COSMETIC);
    d.display().unwrap();
    assert_eq!(d.decision(), Decision::Skipped(Reason::AsyncBlockedCosmetic));

    d.display().unwrap();
    assert_eq!(d.decision(), Decision::Full(Reason::FlaggedCosmetic));
}

#[test]
fn busy_read_failure_keeps_request_queued() {
    let clock = TestClock::new(0);
    let mut d = async_display(&clock);
    d.request_frame(FrameFlags::COSMETIC);
    d.display().unwrap();

    d.panel_mut().fail_next(DisplayError::Gpio);
    clock.advance(1_000);
    assert_eq!(d.force_display(), Err(DisplayError::Gpio));
    assert!(d.is_async_refresh_running());
    assert!(d.pending_flags().contains(FrameFlags::RESPONSIVE));
    assert_eq!(d.decision(), Decision::Full(Reason::FlaggedCosmetic));

    ink(&mut d, 3, 3);
    assert!(d.display().unwrap());
    assert_eq!(d.decision(), Decision::Fast(Reason::NoObjections));
}

#[test]
fn failed_end_update_after_detached_full_is_retried_without_second_finish() {
    let clock = TestClock::new(0);
    let mut d = async_display(&clock);
    d.request_frame(FrameFlags::COSMETIC);
    d.display().unwrap();

    d.panel_mut()
        .fail_on(PanelCall::EndUpdate, DisplayError::Communication);
    clock.advance(1_000);
    ink(&mut d, 4, 4);
    assert_eq!(d.force_display(), Err(DisplayError::Communication));
    assert!(d.is_async_refresh_running());
    assert!(d.pending_flags().contains(FrameFlags::RESPONSIVE));

    assert!(d.force_display().unwrap());
    assert_eq!(d.decision(), Decision::Fast(Reason::NoObjections));
    assert!(!d.is_async_refresh_running());
    assert_eq!(d.panel().count(PanelCall::EndAsyncFull), 1);
    assert_eq!(d.panel().updates(), 2);
}
