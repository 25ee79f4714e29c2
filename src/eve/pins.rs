//! Pin definitions for the EVE display board
//!
//! GPIO assignments of the ESP32-S3 wiring to the BT81X breakout.

/// Pin configuration constants for the EVE controller
pub struct Pins;

#[allow(dead_code)]
impl Pins {
    // SPI Display pins
    /// Chip Select pin, driven by the driver (not the SPI peripheral)
    pub const CS: u8 = 10;
    /// Power down pin (Low holds the controller in reset)
    pub const PD: u8 = 9;
    /// SPI Clock pin
    pub const SCLK: u8 = 12;
    /// SPI Master Out Slave In
    pub const MOSI: u8 = 11;
    /// SPI Master In Slave Out
    pub const MISO: u8 = 13;
}
