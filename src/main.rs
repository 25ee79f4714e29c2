#[cfg(target_os = "espidf")]
use anyhow::Context;

#[cfg(target_os = "espidf")]
use eve_lcd::{
    eve::esp::EspPlatform, Config, DisplayTimings, Pins, Registry, Sequencer, SpiHost,
};

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::delay::FreeRtos;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::peripherals::Peripherals;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::spi;

/// SPI clock for the EVE device
#[cfg(target_os = "espidf")]
const SPI_CLOCK_HZ: u32 = 10_000_000;
/// Transactions the IDF driver may queue per device
#[cfg(target_os = "espidf")]
const SPI_QUEUE_SIZE: u16 = 4;

// https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();
    log::set_max_level(log::LevelFilter::Debug);

    log::info!("booting up {}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take().context("Could not take peripherals")?;
    let pins = peripherals.pins;

    log::info!("initializing SPI bus");
    let bus = spi::SpiDriver::new(
        peripherals.spi2,
        pins.gpio12,                        // SCLK - Pins::SCLK
        pins.gpio11,                        // MOSI - Pins::MOSI
        Some(pins.gpio13),                  // MISO - Pins::MISO
        &spi::SpiDriverConfig::new().dma(spi::Dma::Disabled),
    )
    .context("Could not create SPI bus driver")?;

    let mut registry: Registry<EspPlatform> =
        Registry::new(EspPlatform::new(bus, SpiHost::Spi2));

    log::info!("initializing LCD over SPI");
    let config = Config::new(Pins::CS, Pins::PD)
        .with_clock_hz(SPI_CLOCK_HZ)
        .with_queue_depth(SPI_QUEUE_SIZE)
        .with_host(SpiHost::Spi2)
        .with_read_dummy(1); // BT81X clocks one dummy byte before read data

    // Leaves the chip powered down with CS idle
    let lcd = registry.open(&config).context("Could not open EVE device")?;

    let mut sequencer = Sequencer::new(FreeRtos, DisplayTimings::WVGA_800X480);
    if let Err(e) = sequencer.run(registry.device(lcd)?) {
        log::error!("LCD bring-up failed: {}", e);
        registry.close(lcd);
        return Err(anyhow::anyhow!("LCD bring-up failed: {}", e));
    }

    log::info!("LCD up and running");

    loop {
        FreeRtos::delay_ms(1000);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("eve-lcd is ESP-IDF firmware; build it for an espidf target");
}
