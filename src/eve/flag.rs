/// Bit values written to or read from EVE registers.
///
/// This struct collects the flag values used during bring-up and by callers
/// poking registers directly. Grouped by the register they apply to.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // REG_ID
    pub const CHIP_ID: u8 = 0x7C;

    // REG_CPURESET bits, 0 = every engine running
    pub const CPURESET_COPROCESSOR: u16 = 0x01;
    pub const CPURESET_TOUCH: u16 = 0x02;
    pub const CPURESET_AUDIO: u16 = 0x04;
    pub const CPURESET_READY: u16 = 0x00;

    // REG_DLSWAP
    pub const DLSWAP_DONE: u8 = 0x00;
    pub const DLSWAP_LINE: u8 = 0x01;
    pub const DLSWAP_FRAME: u8 = 0x02; // swap at the next frame boundary

    // REG_GPIO
    pub const GPIO_DISP: u8 = 0x80; // DISP line, enables the panel

    // REG_PCLK_POL
    pub const PCLK_POL_RISING: u8 = 0x00;
    pub const PCLK_POL_FALLING: u8 = 0x01;

    // REG_INT_FLAGS / REG_INT_MASK
    pub const IRQ_SWAP: u8 = 0x01;
    pub const IRQ_TOUCH: u8 = 0x02;
    pub const IRQ_TAG: u8 = 0x04;
    pub const IRQ_SOUND: u8 = 0x08;
    pub const IRQ_PLAYBACK: u8 = 0x10;
    pub const IRQ_CMDEMPTY: u8 = 0x20;
    pub const IRQ_CMDFLAG: u8 = 0x40;
    pub const IRQ_CONVCOMPLETE: u8 = 0x80;

    // CLEAR display list command
    pub const CLEAR_TAG: u32 = 0x01;
    pub const CLEAR_STENCIL: u32 = 0x02;
    pub const CLEAR_COLOR: u32 = 0x04;
}
