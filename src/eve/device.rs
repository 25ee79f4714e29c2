//! One physical EVE chip: its transport plus the power-down line
//!
//! A device does no locking. One owner drives it from one thread; callers
//! that need shared access wrap the device in their own mutex.

use embedded_hal::digital::OutputPin;

use crate::eve::cmd::HostCommand;
use crate::eve::error::{Error, Result};
use crate::eve::interface::{Address, Transport, Word, MAX_WIDTH};
use crate::eve::reg::Register;

/// Device context handed out by the registry
pub struct Device<T, PD> {
    /// Register and command transport (owns bus and CS line)
    transport: T,
    /// Power down line, low = held in reset
    pd: PD,
    /// Platform transaction queue depth this device was opened with
    queue_depth: u16,
}

impl<T, PD> Device<T, PD> {
    pub fn new(transport: T, pd: PD, queue_depth: u16) -> Self {
        Device {
            transport,
            pd,
            queue_depth,
        }
    }

    pub fn queue_depth(&self) -> u16 {
        self.queue_depth
    }

    /// Direct access to the transport, e.g. for raw byte transfers
    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the device and return the transport and power-down line
    pub fn release(self) -> (T, PD) {
        (self.transport, self.pd)
    }
}

impl<T, PD> Device<T, PD>
where
    T: Transport,
    PD: OutputPin,
{
    /// Drive the power-down line: `true` powers the chip, `false` holds it in reset
    pub fn set_power(&mut self, on: bool) -> Result<()> {
        log::debug!("power {}", if on { "on" } else { "off" });

        if on {
            self.pd.set_high().map_err(Error::pin("PD"))
        } else {
            self.pd.set_low().map_err(Error::pin("PD"))
        }
    }

    /// Send a raw host command
    pub fn command(&mut self, code: u8, param: u8) -> Result<()> {
        self.host(HostCommand::new(code, param))
    }

    pub fn host(&mut self, command: HostCommand) -> Result<()> {
        command.send(&mut self.transport)
    }

    /// Read a typed register
    pub fn rd<W: Word>(&mut self, register: Register<W>) -> Result<W> {
        self.read_word(register.address())
    }

    /// Write a typed register
    pub fn wr<W: Word>(&mut self, register: Register<W>, value: W) -> Result<()> {
        self.write_word(register.address(), value)
    }

    pub fn read8(&mut self, address: u32) -> Result<u8> {
        self.read_word(Address::new(address))
    }

    pub fn read16(&mut self, address: u32) -> Result<u16> {
        self.read_word(Address::new(address))
    }

    pub fn read32(&mut self, address: u32) -> Result<u32> {
        self.read_word(Address::new(address))
    }

    pub fn write8(&mut self, address: u32, value: u8) -> Result<()> {
        self.write_word(Address::new(address), value)
    }

    pub fn write16(&mut self, address: u32, value: u16) -> Result<()> {
        self.write_word(Address::new(address), value)
    }

    pub fn write32(&mut self, address: u32, value: u32) -> Result<()> {
        self.write_word(Address::new(address), value)
    }

    fn read_word<W: Word>(&mut self, address: Address) -> Result<W> {
        let mut buf = [0u8; MAX_WIDTH];
        let buf = &mut buf[..W::WIDTH.bytes()];

        self.transport.read(address, buf)?;
        Ok(W::decode(buf))
    }

    fn write_word<W: Word>(&mut self, address: Address, value: W) -> Result<()> {
        let mut buf = [0u8; MAX_WIDTH];
        let buf = &mut buf[..W::WIDTH.bytes()];

        value.encode(buf);
        self.transport.write(address, buf)
    }
}
