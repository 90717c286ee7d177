//! The controller driving a panel assembled from platform parts: a packed
//! framebuffer, a real BUSY pin adapter (mocked GPIO) and the embassy clock.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use eink_dynamic::{Decision, DynamicConfig, DynamicDisplay, FrameFlags, Reason};
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use platform::{BusyPin, DisplayError, EinkPanel, EmbassyClock, Framebuffer};

/// Minimal driver: window and update commands only bump counters.
struct PinPanel {
    framebuffer: Framebuffer<32>,
    busy: BusyPin<PinMock>,
    updates: u32,
    finished_async: u32,
}

impl EinkPanel for PinPanel {
    type Error = DisplayError;

    fn buffer(&self) -> &[u8] {
        self.framebuffer.as_bytes()
    }

    fn set_partial_window(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_full_window(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn force_update(&mut self) -> Result<(), Self::Error> {
        self.updates += 1;
        Ok(())
    }

    fn end_update(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_async_full(&mut self) -> Result<(), Self::Error> {
        self.finished_async += 1;
        Ok(())
    }

    fn is_busy(&mut self) -> Result<bool, Self::Error> {
        self.busy.is_busy()
    }
}

#[test]
fn busy_pin_drives_async_full_refresh() {
    let pin = PinMock::new(&[
        PinTransaction::get(PinState::High),
        PinTransaction::get(PinState::Low),
    ]);
    let panel = PinPanel {
        framebuffer: Framebuffer::new(16, 16).unwrap(),
        busy: BusyPin::new(pin),
        updates: 0,
        finished_async: 0,
    };
    let config = DynamicConfig::default().with_async_full(true);
    let mut d = DynamicDisplay::<_, _, 32>::new(panel, EmbassyClock, config).unwrap();

    d.request_frame(FrameFlags::COSMETIC);
    assert!(d.display().unwrap());
    assert!(d.is_async_refresh_running());

    // BUSY high: blocked.
    d.request_frame(FrameFlags::DEMAND_FAST);
    assert!(!d.display().unwrap());
    assert_eq!(d.decision(), Decision::Skipped(Reason::AsyncBlockedDemandFast));

    // BUSY low: finished, and the blocked request goes through.
    assert!(d.display().unwrap());
    assert_eq!(d.decision(), Decision::Fast(Reason::FlaggedDemandFast));
    assert!(!d.is_async_refresh_running());

    let (panel, _clock) = d.release();
    assert_eq!(panel.updates, 2);
    assert_eq!(panel.finished_async, 1);
    panel.busy.into_inner().done();
}

#[test]
fn gpio_failure_surfaces_from_cycle() {
    use embedded_hal_mock::eh1::MockError;
    use std::io::ErrorKind;

    let pin = PinMock::new(&[PinTransaction::get(PinState::High)
        .with_error(MockError::Io(ErrorKind::NotConnected))]);
    let panel = PinPanel {
        framebuffer: Framebuffer::new(16, 16).unwrap(),
        busy: BusyPin::new(pin),
        updates: 0,
        finished_async: 0,
    };
    let config = DynamicConfig::default().with_async_full(true);
    let mut d = DynamicDisplay::<_, _, 32>::new(panel, EmbassyClock, config).unwrap();

    d.request_frame(FrameFlags::COSMETIC);
    d.display().unwrap();

    d.request_frame(FrameFlags::COSMETIC);
    assert_eq!(d.display(), Err(DisplayError::Gpio));
    assert!(d.pending_flags().contains(FrameFlags::COSMETIC));

    let (panel, _clock) = d.release();
    panel.busy.into_inner().done();
}
