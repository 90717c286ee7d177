//! Packed 1bpp framebuffer
//!
//! Each byte holds 8 pixels, MSB-first, rows packed back to back.
//! `BinaryColor::On` (black) → bit = 1; `BinaryColor::Off` (white) → bit = 0.
//! The refresh engine's dirty-pixel map uses the same packing and polarity.

// Pixel coordinates from embedded-graphics are i32; after bounds checks they
// are always non-negative so casting to usize is safe.
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::display::DisplayError;

/// Number of bytes a `width × height` 1bpp buffer needs.
///
/// Width must be a multiple of 8 (controller RAM is byte addressed per row).
/// Returns `None` for any other width or on overflow.
pub const fn buffer_len(width: u32, height: u32) -> Option<usize> {
    if width % 8 != 0 {
        return None;
    }
    match (width / 8).checked_mul(height) {
        Some(len) => Some(len as usize),
        None => None,
    }
}

/// 1bpp framebuffer of `N` bytes.
///
/// `N` must equal `width / 8 * height`; [`Framebuffer::new`] enforces it.
pub struct Framebuffer<const N: usize> {
    width: u32,
    height: u32,
    bytes: [u8; N],
}

impl<const N: usize> Framebuffer<N> {
    /// Create an all-white framebuffer for a `width × height` panel.
    // On target the framebuffer is placed in a `static`.
    #[allow(clippy::large_stack_arrays)]
    pub fn new(width: u32, height: u32) -> Result<Self, DisplayError> {
        if buffer_len(width, height) != Some(N) {
            return Err(DisplayError::InvalidBuffer);
        }
        Ok(Self {
            width,
            height,
            bytes: [0x00; N],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Overwrite the buffer with pre-packed data.
    pub fn copy_from(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        if data.len() != N {
            return Err(DisplayError::InvalidBuffer);
        }
        self.bytes.copy_from_slice(data);
        Ok(())
    }

    /// Byte index and bit mask for an in-bounds point.
    fn locate(&self, point: Point) -> Option<(usize, u8)> {
        if point.x < 0
            || point.y < 0
            || point.x as u32 >= self.width
            || point.y as u32 >= self.height
        {
            return None;
        }
        // Bounds guard above: x < width, y < height, and width * height / 8
        // == N fits in usize, so the pixel index cannot overflow.
        #[allow(clippy::arithmetic_side_effects)]
        let pixel_index = point.y as usize * self.width as usize + point.x as usize;
        // MSB-first: pixel 0 of a row is in bit 7 of its byte.
        #[allow(clippy::arithmetic_side_effects)]
        let mask = 0x80u8 >> (pixel_index % 8);
        Some((pixel_index / 8, mask))
    }

    /// Read back one pixel. `None` when out of bounds.
    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        let (index, mask) = self.locate(point)?;
        let byte = self.bytes.get(index)?;
        Some(BinaryColor::from(byte & mask != 0))
    }
}

impl<const N: usize> DrawTarget for Framebuffer<N> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    /// Out-of-bounds pixels are silently dropped.
    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let Some((index, mask)) = self.locate(point) else {
                continue;
            };
            if let Some(byte) = self.bytes.get_mut(index) {
                match color {
                    BinaryColor::On => *byte |= mask,
                    BinaryColor::Off => *byte &= !mask,
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        };
        self.bytes.fill(fill);
        Ok(())
    }
}

impl<const N: usize> OriginDimensions for Framebuffer<N> {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
