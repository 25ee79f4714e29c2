//! ESP-IDF platform: GPIO outputs and SPI device attachment
//!
//! The automatic `spics_io_num` of the IDF SPI master does not hold CS across
//! the address and data phases of one access, so devices are attached
//! without a CS pin and the driver toggles CS itself.

use std::sync::Arc;

use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_svc::hal::spi::{SpiConfig, SpiDeviceDriver, SpiDriver};
use esp_idf_svc::hal::units::Hertz;

use crate::eve::config::{Config, SpiHost};
use crate::eve::error::{Error, Result};
use crate::eve::registry::Platform;

/// One initialized SPI host shared by every device attached to it
pub struct EspPlatform {
    bus: Arc<SpiDriver<'static>>,
    host: SpiHost,
}

impl EspPlatform {
    /// `bus` must already be initialized for `host`
    pub fn new(bus: SpiDriver<'static>, host: SpiHost) -> Self {
        EspPlatform {
            bus: Arc::new(bus),
            host,
        }
    }
}

impl Platform for EspPlatform {
    type Spi = SpiDeviceDriver<'static, Arc<SpiDriver<'static>>>;
    type Pin = PinDriver<'static, AnyOutputPin, Output>;

    fn output(&mut self, pin: u8) -> Result<Self::Pin> {
        // SAFETY: the registry refuses to hand the same pin to two open
        // devices, and the board wiring reserves these pins for the display.
        let pin = unsafe { AnyOutputPin::new(i32::from(pin)) };

        PinDriver::output(pin).map_err(|e| Error::Platform(e.to_string()))
    }

    fn attach(&mut self, config: &Config) -> Result<Self::Spi> {
        if config.host != self.host {
            return Err(Error::Platform(format!(
                "SPI host {:?} is not initialized (have {:?})",
                config.host, self.host
            )));
        }

        let spi_config = SpiConfig::new()
            .baudrate(Hertz(config.clock_hz))
            .data_mode(config.spi_mode)
            .queue_size(usize::from(config.queue_depth));

        SpiDeviceDriver::new(
            self.bus.clone(),
            Option::<AnyOutputPin>::None, // CS is driven by the interface
            &spi_config,
        )
        .map_err(|e| Error::Platform(e.to_string()))
    }

    fn detach(&mut self, spi: Self::Spi) {
        // Dropping the driver removes the device from the bus
        drop(spi);
    }
}
