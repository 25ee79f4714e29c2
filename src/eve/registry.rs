//! Bounded pool of open devices
//!
//! The registry owns every device context. `open` hands out a small
//! [`Handle`] (slot index plus generation) and `close` returns the slot to the
//! pool. A handle kept past `close` never reaches the device that later
//! reuses its slot.

use embedded_hal::{digital::OutputPin, spi::SpiDevice};

use crate::eve::config::Config;
use crate::eve::device::Device;
use crate::eve::error::{Error, Result};
use crate::eve::interface::SpiInterface;

/// Default number of devices a registry can hold
pub const MAX_DEVICES: usize = 1;

/// Platform collaborator: GPIO configuration and SPI bus attachment.
///
/// Implemented once per target; the registry never names a concrete
/// platform type.
pub trait Platform {
    /// Bus device with its own exclusive transaction window
    type Spi: SpiDevice;
    /// Push-pull output line
    type Pin: OutputPin;

    /// Configure `pin` as an output
    fn output(&mut self, pin: u8) -> Result<Self::Pin>;

    /// Attach a device to the bus described by `config`, without hardware CS
    fn attach(&mut self, config: &Config) -> Result<Self::Spi>;

    /// Remove a device from its bus
    fn detach(&mut self, spi: Self::Spi);
}

/// Device type handed out by a registry over platform `P`
pub type PlatformDevice<P> =
    Device<SpiInterface<<P as Platform>::Spi, <P as Platform>::Pin>, <P as Platform>::Pin>;

/// Reference to an open device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    slot: u8,
    generation: u16,
}

impl Handle {
    pub fn slot(&self) -> usize {
        self.slot as usize
    }
}

struct Open<P: Platform> {
    device: PlatformDevice<P>,
    pin_cs: u8,
    pin_pd: u8,
}

impl<P: Platform> Open<P> {
    fn owns(&self, pin: u8) -> bool {
        self.pin_cs == pin || self.pin_pd == pin
    }
}

struct Slot<P: Platform> {
    generation: u16,
    open: Option<Open<P>>,
}

/// Owner of all device contexts for one platform.
///
/// Construct it once at startup; [`Registry::shutdown`] closes whatever is
/// still open and gives the platform back.
pub struct Registry<P: Platform, const N: usize = MAX_DEVICES> {
    platform: P,
    slots: [Slot<P>; N],
}

impl<P: Platform, const N: usize> Registry<P, N> {
    pub fn new(platform: P) -> Self {
        Registry {
            platform,
            slots: core::array::from_fn(|_| Slot {
                generation: 0,
                open: None,
            }),
        }
    }

    /// Number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of open devices
    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.open.is_some()).count()
    }

    /// Allocate a slot, configure the control lines and attach to the bus.
    ///
    /// On return the chip is held in reset (PD low) with CS idle (high).
    pub fn open(&mut self, config: &Config) -> Result<Handle> {
        config.validate()?;

        let index = self
            .slots
            .iter()
            .position(|slot| slot.open.is_none())
            .ok_or_else(|| {
                log::warn!("no more devices available");
                Error::ResourceExhausted(N)
            })?;

        if self
            .slots
            .iter()
            .filter_map(|slot| slot.open.as_ref())
            .any(|open| open.owns(config.pin_cs) || open.owns(config.pin_pd))
        {
            return Err(Error::InvalidArgument("pin already owned by an open device"));
        }

        log::debug!("opening device");
        log::debug!("  - SPI mode:       {:?}", config.spi_mode);
        log::debug!("  - SPI speed:      {}", config.clock_hz);
        log::debug!("  - SPI queue size: {}", config.queue_depth);
        log::debug!("  - SPI host:       {:?}", config.host);
        log::debug!("  - CS pin:         {}", config.pin_cs);
        log::debug!("  - PD pin:         {}", config.pin_pd);

        let mut cs = self.platform.output(config.pin_cs).inspect_err(|e| {
            log::warn!("unable to setup GPIO pins: {}", e);
        })?;
        let mut pd = self.platform.output(config.pin_pd).inspect_err(|e| {
            log::warn!("unable to setup GPIO pins: {}", e);
        })?;

        pd.set_low().map_err(Error::pin("PD"))?;
        cs.set_high().map_err(Error::pin("CS"))?;

        let spi = self.platform.attach(config).inspect_err(|e| {
            log::warn!("unable to add device: {}", e);
        })?;

        let transport = SpiInterface::new(spi, cs).with_read_dummy(config.read_dummy);
        let slot = &mut self.slots[index];
        slot.open = Some(Open {
            device: Device::new(transport, pd, config.queue_depth),
            pin_cs: config.pin_cs,
            pin_pd: config.pin_pd,
        });

        Ok(Handle {
            slot: index as u8,
            generation: slot.generation,
        })
    }

    /// Borrow the device behind `handle`
    pub fn device(&mut self, handle: Handle) -> Result<&mut PlatformDevice<P>> {
        self.slots
            .get_mut(handle.slot())
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.open.as_mut())
            .map(|open| &mut open.device)
            .ok_or(Error::InvalidArgument("stale or closed device handle"))
    }

    pub fn is_open(&self, handle: Handle) -> bool {
        self.slots
            .get(handle.slot())
            .is_some_and(|slot| slot.generation == handle.generation && slot.open.is_some())
    }

    /// Drive the power-down line of an open device
    pub fn power(&mut self, handle: Handle, on: bool) -> Result<()> {
        self.device(handle)?.set_power(on)
    }

    /// Power the device down, detach it and free its slot.
    ///
    /// Closing a handle that is already closed does nothing.
    pub fn close(&mut self, handle: Handle) {
        let Some(slot) = self.slots.get_mut(handle.slot()) else {
            return;
        };
        if slot.generation != handle.generation {
            return;
        }
        let Some(open) = slot.open.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);

        let (transport, mut pd) = open.device.release();
        let (spi, mut cs) = transport.release();

        if let Err(e) = pd.set_low().map_err(Error::pin("PD")) {
            log::warn!("closing device: {}", e);
        }
        if let Err(e) = cs.set_high().map_err(Error::pin("CS")) {
            log::warn!("closing device: {}", e);
        }

        self.platform.detach(spi);
        log::debug!("device in slot {} closed", handle.slot);
    }

    /// Close every open device and hand the platform back
    pub fn shutdown(mut self) -> P {
        for index in 0..N {
            if self.slots[index].open.is_some() {
                let handle = Handle {
                    slot: index as u8,
                    generation: self.slots[index].generation,
                };
                self.close(handle);
            }
        }
        self.platform
    }
}
