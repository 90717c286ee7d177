//! Display abstraction layer
//!
//! The refresh engine never drives SPI or waveforms itself. It talks to the
//! panel through [`EinkPanel`], which exposes the rendered buffer, the two
//! window configurations, and the update / busy primitives of the underlying
//! controller driver.

/// Hardware collaborator for the dynamic refresh engine.
///
/// Implementors own the packed 1bpp framebuffer (bit set = black) and the
/// controller connection. All methods are synchronous: a fast refresh blocks
/// for its (short) duration, while a full refresh may be left running and
/// polled through [`EinkPanel::is_busy`].
pub trait EinkPanel {
    /// Error type for panel operations
    type Error: core::fmt::Debug;

    /// The rendered frame that the next update would push to the panel.
    fn buffer(&self) -> &[u8];

    /// Configure the controller for fast (partial-window) refreshes.
    fn set_partial_window(&mut self) -> Result<(), Self::Error>;

    /// Configure the controller for full-window refreshes.
    fn set_full_window(&mut self) -> Result<(), Self::Error>;

    /// Push the buffer and start an update immediately, bypassing any rate
    /// limiting the driver layer applies on its own.
    fn force_update(&mut self) -> Result<(), Self::Error>;

    /// Finish the current update (blocks until the controller is idle).
    fn end_update(&mut self) -> Result<(), Self::Error>;

    /// Finish a full refresh that was left running in the background.
    fn end_async_full(&mut self) -> Result<(), Self::Error>;

    /// Sample the BUSY line. `true` while a waveform is still being driven.
    fn is_busy(&mut self) -> Result<bool, Self::Error>;
}

/// Physical refresh configuration currently loaded into the controller.
///
/// Distinct from the per-cycle refresh decision: the controller keeps its
/// window configuration across cycles, and it is only reloaded when a cycle
/// crosses from one kind of refresh to the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshMode {
    /// Full window - best quality, clears ghosting
    #[default]
    Full,
    /// Partial window - fast, accumulates ghosting
    Fast,
}

impl RefreshMode {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            RefreshMode::Full => "FULL",
            RefreshMode::Fast => "FAST",
        }
    }
}

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error
    Communication,
    /// GPIO operation error (BUSY line could not be read)
    Gpio,
    /// Buffer size does not match the display geometry
    InvalidBuffer,
}

#[cfg(feature = "std")]
impl std::error::Error for DisplayError {}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Communication => write!(f, "Display communication error"),
            Self::Gpio => write!(f, "GPIO error"),
            Self::InvalidBuffer => write!(f, "Invalid buffer size"),
        }
    }
}
