//! Display list opcodes
//!
//! Each display list entry is a 32-bit word; the opcode sits in the top byte.
//! Only the encoders needed to bring a panel up are provided here, the rest of
//! the table is for callers assembling their own lists.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use crate::eve::flag::Flag;

pub struct Dl;

#[allow(missing_docs)]
impl Dl {
    pub const ALPHA_FUNC: u32 = 0x0900_0000;
    pub const BEGIN: u32 = 0x1F00_0000;
    pub const BITMAP_EXT_FORMAT: u32 = 0x2E00_0000;
    pub const BITMAP_HANDLE: u32 = 0x0500_0000;
    pub const BITMAP_LAYOUT: u32 = 0x0700_0000;
    pub const BITMAP_LAYOUT_H: u32 = 0x2800_0000;
    pub const BITMAP_SIZE: u32 = 0x0800_0000;
    pub const BITMAP_SIZE_H: u32 = 0x2900_0000;
    pub const BITMAP_SOURCE: u32 = 0x0100_0000;
    pub const BITMAP_SWIZZLE: u32 = 0x2F00_0000;
    pub const BITMAP_TRANSFORM_A: u32 = 0x1500_0000;
    pub const BITMAP_TRANSFORM_B: u32 = 0x1600_0000;
    pub const BITMAP_TRANSFORM_C: u32 = 0x1700_0000;
    pub const BITMAP_TRANSFORM_D: u32 = 0x1800_0000;
    pub const BITMAP_TRANSFORM_E: u32 = 0x1900_0000;
    pub const BITMAP_TRANSFORM_F: u32 = 0x1A00_0000;
    pub const BLEND_FUNC: u32 = 0x0B00_0000;
    pub const CALL: u32 = 0x1D00_0000;
    pub const CELL: u32 = 0x0600_0000;
    pub const CLEAR: u32 = 0x2600_0000;
    pub const CLEAR_COLOR_A: u32 = 0x0F00_0000;
    pub const CLEAR_COLOR_RGB: u32 = 0x0200_0000;
    pub const CLEAR_STENCIL: u32 = 0x1100_0000;
    pub const CLEAR_TAG: u32 = 0x1200_0000;
    pub const COLOR_A: u32 = 0x1000_0000;
    pub const COLOR_MASK: u32 = 0x2000_0000;
    pub const COLOR_RGB: u32 = 0x0400_0000;
    pub const DISPLAY: u32 = 0x0000_0000;
    pub const END: u32 = 0x2100_0000;
    pub const JUMP: u32 = 0x1E00_0000;
    pub const LINE_WIDTH: u32 = 0x0E00_0000;
    pub const MACRO: u32 = 0x2500_0000;
    pub const NOP: u32 = 0x2D00_0000;
    pub const PALETTE_SOURCE: u32 = 0x2A00_0000;
    pub const POINT_SIZE: u32 = 0x0D00_0000;
    pub const RESTORE_CONTEXT: u32 = 0x2300_0000;
    pub const RETURN: u32 = 0x2400_0000;
    pub const SAVE_CONTEXT: u32 = 0x2200_0000;
    pub const SCISSOR_SIZE: u32 = 0x1C00_0000;
    pub const SCISSOR_XY: u32 = 0x1B00_0000;
    pub const STENCIL_FUNC: u32 = 0x0A00_0000;
    pub const STENCIL_MASK: u32 = 0x1300_0000;
    pub const STENCIL_OP: u32 = 0x0C00_0000;
    pub const TAG: u32 = 0x0300_0000;
    pub const TAG_MASK: u32 = 0x1400_0000;
    pub const VERTEX2F: u32 = 0x4000_0000;
    pub const VERTEX2II: u32 = 0x8000_0000;
    pub const VERTEX_FORMAT: u32 = 0x2700_0000;
    pub const VERTEX_TRANSLATE_X: u32 = 0x2B00_0000;
    pub const VERTEX_TRANSLATE_Y: u32 = 0x2C00_0000;
}

/// Graphics primitives accepted by `BEGIN`
pub struct Prim;

#[allow(missing_docs)]
impl Prim {
    pub const BITMAPS: u32 = 1;
    pub const POINTS: u32 = 2;
    pub const LINES: u32 = 3;
    pub const LINE_STRIP: u32 = 4;
    pub const EDGE_STRIP_R: u32 = 5;
    pub const EDGE_STRIP_L: u32 = 6;
    pub const EDGE_STRIP_A: u32 = 7;
    pub const EDGE_STRIP_B: u32 = 8;
    pub const RECTS: u32 = 9;
}

/// `CLEAR_COLOR_RGB`: colour used by the next `CLEAR`
pub fn clear_color_rgb(color: Rgb888) -> u32 {
    Dl::CLEAR_COLOR_RGB
        | u32::from(color.r()) << 16
        | u32::from(color.g()) << 8
        | u32::from(color.b())
}

/// `CLEAR`: reset the selected buffers
pub fn clear(color: bool, stencil: bool, tag: bool) -> u32 {
    let mut word = Dl::CLEAR;
    if color {
        word |= Flag::CLEAR_COLOR;
    }
    if stencil {
        word |= Flag::CLEAR_STENCIL;
    }
    if tag {
        word |= Flag::CLEAR_TAG;
    }
    word
}

/// `DISPLAY`: end of the list
pub const fn display() -> u32 {
    Dl::DISPLAY
}

/// `BEGIN` a primitive
pub const fn begin(prim: u32) -> u32 {
    Dl::BEGIN | (prim & 0x0F)
}

/// `END` the current primitive
pub const fn end() -> u32 {
    Dl::END
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_color_packs_rgb() {
        assert_eq!(clear_color_rgb(Rgb888::BLUE), 0x0200_00FF);
        assert_eq!(clear_color_rgb(Rgb888::new(0x12, 0x34, 0x56)), 0x0212_3456);
    }

    #[test]
    fn clear_sets_requested_buffers() {
        assert_eq!(clear(true, true, true), 0x2600_0007);
        assert_eq!(clear(true, false, false), 0x2600_0004);
        assert_eq!(clear(false, false, false), Dl::CLEAR);
    }

    #[test]
    fn display_ends_the_list() {
        assert_eq!(display(), 0);
        assert_eq!(begin(Prim::RECTS), 0x1F00_0009);
    }
}
