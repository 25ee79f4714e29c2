//! Host-side driver for EVE/BT81X graphics controllers on ESP32

pub mod eve;

pub use crate::eve::cmd::{Cmd, HostCommand};
pub use crate::eve::config::{Config, SpiHost};
pub use crate::eve::device::Device;
pub use crate::eve::driver::{DisplayTimings, Poll, Sequencer, Step};
pub use crate::eve::error::{Error, Result};
pub use crate::eve::flag::Flag;
pub use crate::eve::interface::{Address, SpiInterface, Transport};
pub use crate::eve::pins::Pins;
pub use crate::eve::reg::{Reg, Region, Register};
pub use crate::eve::registry::{Handle, Platform, Registry};
