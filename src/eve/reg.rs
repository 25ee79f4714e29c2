//! Memory map and register file of the BT81X
//!
//! Registers are typed by their access width, so `dev.rd(Reg::CPURESET)`
//! yields a `u16` and writing a `u32` to `Reg::PCLK` does not compile.
//! Widths follow the BT81X datasheet register summary.

use core::marker::PhantomData;

use crate::eve::interface::{Address, Word};

/// Fixed windows of the host address space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// General purpose graphics RAM
    RamG,
    /// Font and bitmap ROM
    Rom,
    /// Display list RAM
    RamDl,
    /// Register file
    RamReg,
    /// Coprocessor command FIFO
    RamCmd,
    /// External flash, reached through the coprocessor
    Flash,
}

impl Region {
    /// All regions in address order
    pub const ALL: [Region; 6] = [
        Region::RamG,
        Region::Rom,
        Region::RamDl,
        Region::RamReg,
        Region::RamCmd,
        Region::Flash,
    ];

    /// First address of the region
    pub const fn base(self) -> u32 {
        match self {
            Region::RamG => 0x0000_0000,
            Region::Rom => 0x0020_0000,
            Region::RamDl => 0x0030_0000,
            Region::RamReg => 0x0030_2000,
            Region::RamCmd => 0x0030_8000,
            Region::Flash => 0x0080_0000,
        }
    }

    /// Length of the region in bytes
    pub const fn size(self) -> u32 {
        match self {
            Region::RamG => 1024 * 1024,
            Region::Rom => 1024 * 1024,
            Region::RamDl => 8 * 1024,
            Region::RamReg => 4 * 1024,
            Region::RamCmd => 4 * 1024,
            Region::Flash => 256 * 1024 * 1024,
        }
    }

    /// Absolute address of `offset` inside the region
    pub const fn at(self, offset: u32) -> u32 {
        self.base() + offset
    }

    pub fn contains(self, address: u32) -> bool {
        address >= self.base() && address - self.base() < self.size()
    }

    /// Region holding `address`, if any.
    ///
    /// The transport does not validate addresses; callers that want to can
    /// check here first.
    pub fn containing(address: u32) -> Option<Region> {
        Region::ALL.into_iter().find(|region| region.contains(address))
    }
}

/// A register address tagged with its access width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register<W> {
    address: u32,
    _width: PhantomData<W>,
}

impl<W: Word> Register<W> {
    /// Declare a register at an absolute address
    pub const fn new(address: u32) -> Self {
        Register {
            address,
            _width: PhantomData,
        }
    }

    pub const fn address(self) -> Address {
        Address::new(self.address)
    }
}

/// Register file, absolute addresses inside [`Region::RamReg`]
pub struct Reg;

#[allow(missing_docs)]
impl Reg {
    // Identification and clocks
    pub const ID: Register<u8> = Register::new(0x30_2000);
    pub const FRAMES: Register<u32> = Register::new(0x30_2004);
    pub const CLOCK: Register<u32> = Register::new(0x30_2008);
    pub const FREQUENCY: Register<u32> = Register::new(0x30_200C);
    pub const CPURESET: Register<u16> = Register::new(0x30_2020);

    // Rendering
    pub const RENDERMODE: Register<u8> = Register::new(0x30_2010);
    pub const SNAPY: Register<u16> = Register::new(0x30_2014);
    pub const SNAPSHOT: Register<u8> = Register::new(0x30_2018);
    pub const SNAPFORMAT: Register<u8> = Register::new(0x30_201C);
    pub const TAP_CRC: Register<u32> = Register::new(0x30_2024);
    pub const TAP_MASK: Register<u32> = Register::new(0x30_2028);

    // Display timing
    pub const HCYCLE: Register<u16> = Register::new(0x30_202C);
    pub const HOFFSET: Register<u16> = Register::new(0x30_2030);
    pub const HSIZE: Register<u16> = Register::new(0x30_2034);
    pub const HSYNC0: Register<u16> = Register::new(0x30_2038);
    pub const HSYNC1: Register<u16> = Register::new(0x30_203C);
    pub const VCYCLE: Register<u16> = Register::new(0x30_2040);
    pub const VOFFSET: Register<u16> = Register::new(0x30_2044);
    pub const VSIZE: Register<u16> = Register::new(0x30_2048);
    pub const VSYNC0: Register<u16> = Register::new(0x30_204C);
    pub const VSYNC1: Register<u16> = Register::new(0x30_2050);

    // Display output
    pub const DLSWAP: Register<u8> = Register::new(0x30_2054);
    pub const ROTATE: Register<u8> = Register::new(0x30_2058);
    pub const OUTBITS: Register<u16> = Register::new(0x30_205C);
    pub const DITHER: Register<u8> = Register::new(0x30_2060);
    pub const SWIZZLE: Register<u8> = Register::new(0x30_2064);
    pub const CSPREAD: Register<u8> = Register::new(0x30_2068);
    pub const PCLK_POL: Register<u8> = Register::new(0x30_206C);
    pub const PCLK: Register<u8> = Register::new(0x30_2070);

    // GPIO and backlight
    pub const GPIO_DIR: Register<u8> = Register::new(0x30_2090);
    pub const GPIO: Register<u8> = Register::new(0x30_2094);
    pub const GPIOX_DIR: Register<u16> = Register::new(0x30_2098);
    pub const GPIOX: Register<u16> = Register::new(0x30_209C);
    pub const PWM_HZ: Register<u16> = Register::new(0x30_20D0);
    pub const PWM_DUTY: Register<u8> = Register::new(0x30_20D4);

    // Interrupts
    pub const INT_FLAGS: Register<u8> = Register::new(0x30_20A8);
    pub const INT_EN: Register<u8> = Register::new(0x30_20AC);
    pub const INT_MASK: Register<u8> = Register::new(0x30_20B0);

    // Macros and coprocessor FIFO
    pub const MACRO_0: Register<u32> = Register::new(0x30_20D8);
    pub const MACRO_1: Register<u32> = Register::new(0x30_20DC);
    pub const CMD_READ: Register<u16> = Register::new(0x30_20F8);
    pub const CMD_WRITE: Register<u16> = Register::new(0x30_20FC);
    pub const CMD_DL: Register<u16> = Register::new(0x30_2100);
    pub const CMDB_SPACE: Register<u16> = Register::new(0x30_2574);
    pub const CMDB_WRITE: Register<u32> = Register::new(0x30_2578);

    // Misc
    pub const BIST_EN: Register<u8> = Register::new(0x30_2174);
    pub const TRIM: Register<u8> = Register::new(0x30_2180);
    pub const ANA_COMP: Register<u8> = Register::new(0x30_2184);
    pub const SPI_WIDTH: Register<u8> = Register::new(0x30_2188);
    pub const ADAPTIVE_FRAMERATE: Register<u8> = Register::new(0x30_257C);
}
