//! Construction errors
//!
//! Runtime decision cycles have no errors of their own: the only failures a
//! cycle can report come from the panel and surface as `P::Error`.

/// Rejected controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The panel buffer does not match the controller's const size.
    BufferSize {
        /// Bytes the controller was instantiated for.
        expected: usize,
        /// Bytes the panel actually exposes.
        actual: usize,
    },
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferSize { expected, actual } => write!(
                f,
                "panel buffer is {actual} bytes, controller expects {expected}"
            ),
        }
    }
}
