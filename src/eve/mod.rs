//! EVE / BT81X display controller driver
//!
//! Brings an EVE graphics controller up over SPI: power sequencing, host
//! commands, readiness polling, clock and timing registers, a first display
//! list and display enable.
//!
//! ### Layers
//!
//! 1. [`interface`] frames register accesses and host commands into
//!    chip-select windows on an `embedded-hal` [`SpiDevice`](embedded_hal::spi::SpiDevice)
//! 1. [`device`] adds typed 8/16/32-bit register access and power control
//! 1. [`registry`] owns a bounded pool of devices and their control pins
//! 1. [`driver`] runs the bring-up sequence
//!
//! ### Usage
//!
//! 1. open a device through [`registry::Registry::open`]
//! 1. run a [`driver::Sequencer`] against [`registry::Registry::device`]
//! 1. from then on, build display lists in RAM_DL and swap them in
//!
//! Nothing here locks: a device belongs to one thread.

pub mod cmd;
pub mod config;
pub mod device;
pub mod dl;
pub mod driver;
pub mod error;
pub mod flag;
pub mod interface;
pub mod pins;
pub mod reg;
pub mod registry;

#[cfg(target_os = "espidf")]
pub mod esp;
