//! Simulated EVE chip behind mock embedded-hal SPI, GPIO and delay types.
//!
//! Every pin change, bus byte and delay lands in one shared event log so
//! tests can check chip-select bracketing and step ordering.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, Operation, SpiDevice};

use eve_lcd::{Config, Error, Flag, Platform, Reg, Registry};

pub const CS: u8 = 10;
pub const PD: u8 = 9;

/// Everything observable from outside the chip, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// GPIO configured as output
    Output(u8),
    /// GPIO driven
    Pin { pin: u8, high: bool },
    /// Bytes clocked out in one write operation
    Tx(Vec<u8>),
    /// Bytes clocked in by one read operation
    Rx(usize),
    /// Transaction refused by the bus
    Fault,
    DelayMs(u32),
    DelayNs(u32),
    Attach,
    Detach,
}

/// Decoded host access as seen by the chip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Read(u32),
    Write(u32, Vec<u8>),
    Command(u8, u8),
}

pub struct SimChip {
    pub events: Vec<Event>,
    pub accesses: Vec<Access>,
    pub memory: HashMap<u32, u8>,
    /// REG_ID read attempt that first returns the chip id
    pub id_ready_on: u32,
    /// REG_CPURESET read attempt that first returns 0
    pub cpureset_ready_on: u32,
    pub id_reads: u32,
    pub cpureset_reads: u32,
    /// Refuse this many upcoming transactions outright
    pub fail_transactions: u32,
    /// Refuse this many upcoming REG_ID reads
    pub fail_id_reads: u32,
    /// Refuse every write to this address
    pub fail_write_to: Option<u32>,
}

impl Default for SimChip {
    fn default() -> Self {
        SimChip {
            events: Vec::new(),
            accesses: Vec::new(),
            memory: HashMap::new(),
            id_ready_on: 1,
            cpureset_ready_on: 1,
            id_reads: 0,
            cpureset_reads: 0,
            fail_transactions: 0,
            fail_id_reads: 0,
            fail_write_to: None,
        }
    }
}

impl SimChip {
    fn load(&mut self, address: u32, buf: &mut [u8]) -> Result<(), SimError> {
        self.accesses.push(Access::Read(address));
        buf.fill(0);

        if address == Reg::ID.address().value() {
            if self.fail_id_reads > 0 {
                self.fail_id_reads -= 1;
                return Err(SimError);
            }
            self.id_reads += 1;
            if self.id_reads >= self.id_ready_on {
                buf[0] = Flag::CHIP_ID;
            }
        } else if address == Reg::CPURESET.address().value() {
            self.cpureset_reads += 1;
            let status: u16 = if self.cpureset_reads >= self.cpureset_ready_on {
                0x0000
            } else {
                0x0007
            };
            let n = buf.len().min(2);
            buf[..n].copy_from_slice(&status.to_le_bytes()[..n]);
        } else {
            for (i, byte) in buf.iter_mut().enumerate() {
                *byte = self.memory.get(&(address + i as u32)).copied().unwrap_or(0);
            }
        }
        Ok(())
    }

    fn store(&mut self, address: u32, data: &[u8]) -> Result<(), SimError> {
        if self.fail_write_to == Some(address) {
            return Err(SimError);
        }
        self.accesses.push(Access::Write(address, data.to_vec()));
        for (i, byte) in data.iter().enumerate() {
            self.memory.insert(address + i as u32, *byte);
        }
        Ok(())
    }

    /// Logged events without the delays
    pub fn bus_events(&self) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| !matches!(e, Event::DelayMs(_) | Event::DelayNs(_)))
            .cloned()
            .collect()
    }

    pub fn reads_of(&self, address: u32) -> usize {
        self.accesses
            .iter()
            .filter(|a| **a == Access::Read(address))
            .count()
    }

    /// Position of the first write to `address` in the access log
    pub fn first_write_to(&self, address: u32) -> Option<usize> {
        self.accesses
            .iter()
            .position(|a| matches!(a, Access::Write(addr, _) if *addr == address))
    }

    /// Position of the last read of `address` in the access log
    pub fn last_read_of(&self, address: u32) -> Option<usize> {
        self.accesses
            .iter()
            .rposition(|a| *a == Access::Read(address))
    }

    pub fn written_addresses(&self) -> Vec<u32> {
        self.accesses
            .iter()
            .filter_map(|a| match a {
                Access::Write(addr, _) => Some(*addr),
                _ => None,
            })
            .collect()
    }
}

pub type Chip = Rc<RefCell<SimChip>>;

#[derive(Debug)]
pub struct SimError;

impl spi::Error for SimError {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

/// Mock SPI device: decodes address and command frames for the chip
pub struct SimBus {
    chip: Chip,
}

impl spi::ErrorType for SimBus {
    type Error = SimError;
}

impl SpiDevice for SimBus {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), SimError> {
        let mut chip = self.chip.borrow_mut();

        if chip.fail_transactions > 0 {
            chip.fail_transactions -= 1;
            chip.events.push(Event::Fault);
            return Err(SimError);
        }

        // (address, is_write) once the address phase has been seen
        let mut target: Option<(u32, bool)> = None;

        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    chip.events.push(Event::Tx(bytes.to_vec()));
                    match target {
                        None if bytes.len() == 2 => {
                            chip.accesses.push(Access::Command(bytes[0], bytes[1]));
                        }
                        None if bytes.len() >= 3 => {
                            let address = u32::from(bytes[0] & 0x7F) << 16
                                | u32::from(bytes[1]) << 8
                                | u32::from(bytes[2]);
                            target = Some((address, bytes[0] & 0x80 != 0));
                        }
                        Some((address, true)) => chip.store(address, bytes)?,
                        _ => return Err(SimError),
                    }
                }
                Operation::Read(buf) => {
                    chip.events.push(Event::Rx(buf.len()));
                    match target {
                        Some((address, false)) => chip.load(address, buf)?,
                        _ => return Err(SimError),
                    }
                }
                _ => return Err(SimError),
            }
        }
        Ok(())
    }
}

/// Mock GPIO output
pub struct SimPin {
    pin: u8,
    chip: Chip,
}

impl digital::ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.chip.borrow_mut().events.push(Event::Pin {
            pin: self.pin,
            high: false,
        });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.chip.borrow_mut().events.push(Event::Pin {
            pin: self.pin,
            high: true,
        });
        Ok(())
    }
}

/// Mock delay, records instead of sleeping
pub struct SimDelay {
    chip: Chip,
}

impl SimDelay {
    pub fn new(chip: &Chip) -> Self {
        SimDelay { chip: chip.clone() }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.chip.borrow_mut().events.push(Event::DelayNs(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.chip.borrow_mut().events.push(Event::DelayMs(ms));
    }
}

/// Mock platform handing out pins and bus devices wired to one chip
pub struct SimPlatform {
    pub chip: Chip,
    pub fail_output: Option<u8>,
    pub fail_attach: bool,
}

impl SimPlatform {
    pub fn new(chip: &Chip) -> Self {
        SimPlatform {
            chip: chip.clone(),
            fail_output: None,
            fail_attach: false,
        }
    }
}

impl Platform for SimPlatform {
    type Spi = SimBus;
    type Pin = SimPin;

    fn output(&mut self, pin: u8) -> eve_lcd::Result<SimPin> {
        if self.fail_output == Some(pin) {
            return Err(Error::Platform(format!("GPIO{} not available", pin)));
        }
        self.chip.borrow_mut().events.push(Event::Output(pin));
        Ok(SimPin {
            pin,
            chip: self.chip.clone(),
        })
    }

    fn attach(&mut self, _config: &Config) -> eve_lcd::Result<SimBus> {
        if self.fail_attach {
            return Err(Error::Platform("spi_bus_add_device failed".into()));
        }
        self.chip.borrow_mut().events.push(Event::Attach);
        Ok(SimBus {
            chip: self.chip.clone(),
        })
    }

    fn detach(&mut self, _spi: SimBus) {
        self.chip.borrow_mut().events.push(Event::Detach);
    }
}

pub fn config() -> Config {
    Config::new(CS, PD)
}

/// A single-slot registry over a fresh simulated chip
pub fn bench() -> (Registry<SimPlatform>, Chip) {
    let chip: Chip = Rc::new(RefCell::new(SimChip::default()));
    let registry = Registry::new(SimPlatform::new(&chip));
    (registry, chip)
}

/// Forget everything logged so far (e.g. the open sequence)
pub fn clear_log(chip: &Chip) {
    let mut chip = chip.borrow_mut();
    chip.events.clear();
    chip.accesses.clear();
}
