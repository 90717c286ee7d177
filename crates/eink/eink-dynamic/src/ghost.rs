//! Ghost-pixel tracking
//!
//! A pixel driven black by a fast refresh leaves residue behind when it is
//! later driven white without a full refresh. The tracker keeps one dirty bit
//! per panel pixel (same packing as the framebuffer: bit set = black) and
//! counts how many dirty pixels the candidate frame would turn white.
//!
//! ```text
//! dirty  buffer   ghost   dirty'
//!   0      0        0       0
//!   0      1        0       1
//!   1      0        1       1
//!   1      1        0       1
//! ```

/// Dirty-pixel map for an `N`-byte packed panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhostTracker<const N: usize> {
    dirty: [u8; N],
}

impl<const N: usize> Default for GhostTracker<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> GhostTracker<N> {
    /// All pixels clean.
    pub const fn new() -> Self {
        Self { dirty: [0; N] }
    }

    /// Count ghost pixels in `buffer`, then mark its black pixels dirty.
    ///
    /// Bytes beyond `N` (or missing from a short buffer) are ignored.
    pub fn count_and_mark(&mut self, buffer: &[u8]) -> u32 {
        let mut ghosts = 0u32;
        for (dirty, &frame) in self.dirty.iter_mut().zip(buffer) {
            ghosts = ghosts.saturating_add((*dirty & !frame).count_ones());
            *dirty |= frame;
        }
        ghosts
    }

    /// Take `buffer` as the clean baseline after a full refresh.
    pub fn reset(&mut self, buffer: &[u8]) {
        for (dirty, &frame) in self.dirty.iter_mut().zip(buffer) {
            *dirty = frame;
        }
    }

    /// The dirty map.
    pub fn dirty(&self) -> &[u8; N] {
        &self.dirty
    }
}
