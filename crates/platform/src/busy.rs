//! BUSY line adapter
//!
//! SSD16xx-family controllers hold BUSY HIGH while a waveform is being
//! driven. Panel drivers that implement [`crate::EinkPanel::is_busy`] can
//! delegate to [`BusyPin`] instead of reading the pin by hand.

use embedded_hal::digital::InputPin;

use crate::display::DisplayError;

/// Active-HIGH BUSY input.
pub struct BusyPin<P> {
    pin: P,
}

impl<P: InputPin> BusyPin<P> {
    /// Wrap a BUSY input pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Single non-blocking sample of the BUSY line.
    pub fn is_busy(&mut self) -> Result<bool, DisplayError> {
        self.pin.is_high().map_err(|_| DisplayError::Gpio)
    }

    /// Release the underlying pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}
