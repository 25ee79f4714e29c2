//! Device open parameters

use embedded_hal::spi::{Mode, MODE_0};

use crate::eve::error::{Error, Result};
use crate::eve::interface::MAX_READ_DUMMY;

/// Default SPI clock, 10 MHz
pub const DEFAULT_CLOCK_HZ: u32 = 10_000_000;

/// Default depth of the platform transaction queue
pub const DEFAULT_QUEUE_DEPTH: u16 = 4;

/// SPI controller the device hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiHost {
    Spi2,
    Spi3,
}

/// Immutable description of one device.
///
/// Consumed by [`crate::eve::registry::Registry::open`]; nothing keeps a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Chip select GPIO, driven by the driver rather than the SPI peripheral
    pub pin_cs: u8,
    /// Power down GPIO, low holds the chip in reset
    pub pin_pd: u8,
    pub spi_mode: Mode,
    pub clock_hz: u32,
    pub queue_depth: u16,
    pub host: SpiHost,
    /// Zero bytes clocked between a read address and its data
    pub read_dummy: u8,
}

impl Config {
    pub const fn new(pin_cs: u8, pin_pd: u8) -> Self {
        Self {
            pin_cs,
            pin_pd,
            spi_mode: MODE_0,
            clock_hz: DEFAULT_CLOCK_HZ,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            host: SpiHost::Spi2,
            read_dummy: 0,
        }
    }

    pub const fn with_mode(mut self, spi_mode: Mode) -> Self {
        self.spi_mode = spi_mode;
        self
    }

    pub const fn with_clock_hz(mut self, clock_hz: u32) -> Self {
        self.clock_hz = clock_hz;
        self
    }

    pub const fn with_queue_depth(mut self, queue_depth: u16) -> Self {
        self.queue_depth = queue_depth;
        self
    }

    pub const fn with_host(mut self, host: SpiHost) -> Self {
        self.host = host;
        self
    }

    pub const fn with_read_dummy(mut self, read_dummy: u8) -> Self {
        self.read_dummy = read_dummy;
        self
    }

    /// Reject configurations no platform could honour
    pub fn validate(&self) -> Result<()> {
        if self.pin_cs == self.pin_pd {
            return Err(Error::InvalidArgument("CS and PD must be different pins"));
        }
        if self.clock_hz == 0 {
            return Err(Error::InvalidArgument("SPI clock speed must be non-zero"));
        }
        if self.queue_depth == 0 {
            return Err(Error::InvalidArgument("SPI queue depth must be non-zero"));
        }
        if self.read_dummy > MAX_READ_DUMMY {
            return Err(Error::InvalidArgument("too many read dummy bytes"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = Config::new(10, 9);
        assert_eq!(config.spi_mode, MODE_0);
        assert_eq!(config.clock_hz, DEFAULT_CLOCK_HZ);
        assert_eq!(config.queue_depth, DEFAULT_QUEUE_DEPTH);
        assert_eq!(config.host, SpiHost::Spi2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn malformed_configs_are_rejected() {
        assert!(matches!(
            Config::new(5, 5).validate(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(Config::new(10, 9).with_clock_hz(0).validate().is_err());
        assert!(Config::new(10, 9).with_queue_depth(0).validate().is_err());
        assert!(Config::new(10, 9).with_read_dummy(9).validate().is_err());
        assert!(Config::new(10, 9).with_read_dummy(1).validate().is_ok());
    }
}
