//! Frame change detection.

/// Additive checksum over every byte of the frame.
///
/// A change detector, not a digest: it is order independent and collisions
/// only cost a skipped redraw.
pub fn frame_hash(buffer: &[u8]) -> u32 {
    buffer
        .iter()
        .fold(0u32, |acc, &b| acc.wrapping_add(u32::from(b)))
}
