//! Host memory access over SPI
//!
//! Every register access is one chip-select window holding two phases:
//!
//! 1. an address phase of three bytes, most significant first, with bit 7 of
//!    the first byte set for writes and clear for reads
//! 2. a data phase of 1, 2 or 4 payload bytes, low-order byte first
//!
//! Host commands use the same window but carry only `{code, param}`.

use embedded_hal::{
    digital::OutputPin,
    spi::{Operation, SpiDevice},
};

use crate::eve::error::{Error, Result};

/// Largest register payload in bytes
pub const MAX_WIDTH: usize = 4;

/// Upper bound for dummy bytes clocked after a read address
pub const MAX_READ_DUMMY: u8 = 4;

const WRITE_BIT: u8 = 0x80;

/// Direction encoded into the address phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// A 24-bit host memory address.
///
/// The direction bit is never stored; it is applied by [`Address::frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u32);

impl Address {
    /// Mask of the 24 address bits
    pub const MASK: u32 = 0x00FF_FFFF;

    /// Build an address, discarding anything above bit 23
    pub const fn new(raw: u32) -> Self {
        Address(raw & Self::MASK)
    }

    /// Raw address value
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Address `bytes` further on
    pub const fn offset(self, bytes: u32) -> Self {
        Address::new(self.0 + bytes)
    }

    /// Bytes of the address phase for the given direction
    pub const fn frame(self, direction: Direction) -> [u8; 3] {
        let high = ((self.0 >> 16) & 0xff) as u8;
        let high = match direction {
            Direction::Read => high & !WRITE_BIT,
            Direction::Write => high | WRITE_BIT,
        };

        [high, ((self.0 >> 8) & 0xff) as u8, (self.0 & 0xff) as u8]
    }
}

impl From<u32> for Address {
    fn from(raw: u32) -> Self {
        Address::new(raw)
    }
}

/// Register access width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Bits8,
    Bits16,
    Bits32,
}

impl Width {
    /// Payload size in bytes
    pub const fn bytes(self) -> usize {
        match self {
            Width::Bits8 => 1,
            Width::Bits16 => 2,
            Width::Bits32 => 4,
        }
    }
}

/// Register value types that can cross the bus
pub trait Word: Copy {
    /// Width of a register holding this type
    const WIDTH: Width;

    /// Write the little-endian representation into `buf`
    fn encode(self, buf: &mut [u8]);

    /// Read a value back from its little-endian representation
    fn decode(buf: &[u8]) -> Self;
}

macro_rules! impl_word {
    ($($ty:ty => $width:expr),* $(,)?) => {
        $(
            impl Word for $ty {
                const WIDTH: Width = $width;

                fn encode(self, buf: &mut [u8]) {
                    buf[..Self::WIDTH.bytes()].copy_from_slice(&self.to_le_bytes());
                }

                fn decode(buf: &[u8]) -> Self {
                    let mut raw = [0u8; core::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&buf[..Self::WIDTH.bytes()]);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_word!(u8 => Width::Bits8, u16 => Width::Bits16, u32 => Width::Bits32);

/// Byte-level access to the chip.
///
/// The sequencer and the command dispatcher only talk to this trait, so any
/// bus that can bracket a transaction with chip-select can drive the chip.
pub trait Transport {
    /// Read `buf.len()` bytes starting at `address`
    fn read(&mut self, address: Address, buf: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `address`
    fn write(&mut self, address: Address, data: &[u8]) -> Result<()>;

    /// Send raw bytes in their own chip-select window, without address phase
    fn transmit(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Rejects access widths the chip cannot serve
pub(crate) fn check_width(len: usize) -> Result<()> {
    match len {
        0 => Err(Error::InvalidArgument("zero-width register access")),
        n if n > MAX_WIDTH => Err(Error::InvalidArgument("register access wider than 32 bits")),
        _ => Ok(()),
    }
}

/// SPI transport with a manually driven chip-select line.
///
/// The platform SPI device is attached without a CS pin of its own; this
/// interface holds CS low around each bus transaction instead.
pub struct SpiInterface<SPI, CS> {
    /// SPI device, one transaction = one bus-exclusive window
    spi: SPI,
    /// Chip select, active low
    cs: CS,
    /// Dummy bytes clocked after a read address
    read_dummy: u8,
}

impl<SPI, CS> SpiInterface<SPI, CS> {
    /// Create an interface with bit-exact three byte read frames
    pub fn new(spi: SPI, cs: CS) -> Self {
        SpiInterface {
            spi,
            cs,
            read_dummy: 0,
        }
    }

    /// Clock `count` zero bytes between the read address and the data phase
    pub fn with_read_dummy(mut self, count: u8) -> Self {
        self.read_dummy = count.min(MAX_READ_DUMMY);
        self
    }

    /// Consume the interface and return the SPI device and CS line
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> SpiInterface<SPI, CS>
where
    SPI: SpiDevice,
    CS: OutputPin,
{
    /// Run `operations` with CS held low for their whole duration
    fn window(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<()> {
        self.cs
            .set_low()
            .map_err(|_| Error::Bus(embedded_hal::spi::ErrorKind::ChipSelectFault))?;

        let result = self.spi.transaction(operations).map_err(Error::bus);

        // CS goes back high even if the transaction failed
        let released = self
            .cs
            .set_high()
            .map_err(|_| Error::Bus(embedded_hal::spi::ErrorKind::ChipSelectFault));

        result.and(released)
    }
}

impl<SPI, CS> Transport for SpiInterface<SPI, CS>
where
    SPI: SpiDevice,
    CS: OutputPin,
{
    fn read(&mut self, address: Address, buf: &mut [u8]) -> Result<()> {
        check_width(buf.len())?;

        let mut frame = [0u8; 3 + MAX_READ_DUMMY as usize];
        frame[..3].copy_from_slice(&address.frame(Direction::Read));
        let frame = &frame[..3 + self.read_dummy as usize];

        self.window(&mut [Operation::Write(frame), Operation::Read(buf)])
            .inspect_err(|e| {
                log::warn!("host memory read at 0x{:06X} failed: {}", address.value(), e)
            })
    }

    fn write(&mut self, address: Address, data: &[u8]) -> Result<()> {
        check_width(data.len())?;

        let frame = address.frame(Direction::Write);

        self.window(&mut [Operation::Write(&frame), Operation::Write(data)])
            .inspect_err(|e| {
                log::warn!("host memory write at 0x{:06X} failed: {}", address.value(), e)
            })
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<()> {
        self.window(&mut [Operation::Write(bytes)])
    }
}
