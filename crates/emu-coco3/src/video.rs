//! Frame sink.
//!
//! The core does not generate GIME video. Each frame it paints the border
//! colour over the whole buffer so the host has a correctly sized surface
//! to present.

/// Output width in pixels.
pub const FRAME_WIDTH: usize = 640;
/// Output height in pixels.
pub const FRAME_HEIGHT: usize = 480;

/// Layout of the pixel buffer handed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferInfo {
    pub width: usize,
    pub height: usize,
    /// Bytes per row.
    pub pitch: usize,
}

/// ARGB8888 frame.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pixels: Vec<u32>,
}

impl Framebuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pixels: vec![0xFF00_0000; FRAME_WIDTH * FRAME_HEIGHT],
        }
    }

    #[must_use]
    pub fn info(&self) -> FramebufferInfo {
        FramebufferInfo {
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
            pitch: FRAME_WIDTH * 4,
        }
    }

    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Fill with a GIME 6-bit RGB colour.
    pub fn fill_border(&mut self, colour: u8) {
        self.pixels.fill(rgb6_to_argb(colour));
    }

    /// Copy the frame into a host buffer. Returns `false` if `out` is too
    /// small.
    pub fn copy_to(&self, out: &mut [u32]) -> bool {
        match out.get_mut(..self.pixels.len()) {
            Some(dst) => {
                dst.copy_from_slice(&self.pixels);
                true
            }
            None => false,
        }
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a GIME RGB palette entry (bits R1 G1 B1 R0 G0 B0) to ARGB8888.
#[must_use]
pub fn rgb6_to_argb(colour: u8) -> u32 {
    let level = |hi: u8, lo: u8| -> u32 {
        let two_bit = (((colour >> hi) & 1) << 1) | ((colour >> lo) & 1);
        u32::from(two_bit) * 0x55
    };
    let r = level(5, 2);
    let g = level(4, 1);
    let b = level(3, 0);
    0xFF00_0000 | (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_extremes() {
        assert_eq!(rgb6_to_argb(0x00), 0xFF00_0000);
        assert_eq!(rgb6_to_argb(0x3F), 0xFFFF_FFFF);
        assert_eq!(rgb6_to_argb(0x24), 0xFFFF_0000);
        assert_eq!(rgb6_to_argb(0x09), 0xFF00_00FF);
    }

    #[test]
    fn copy_needs_room() {
        let mut fb = Framebuffer::new();
        fb.fill_border(0x12);
        let mut small = vec![0u32; 16];
        assert!(!fb.copy_to(&mut small));
        let mut full = vec![0u32; FRAME_WIDTH * FRAME_HEIGHT];
        assert!(fb.copy_to(&mut full));
        assert_eq!(full[0], rgb6_to_argb(0x12));
        assert_eq!(fb.info().pitch, 2560);
    }
}
