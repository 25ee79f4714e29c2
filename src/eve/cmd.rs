//! Host commands
//!
//! Host commands control power, clocking and reset. They travel as two bytes
//! `{code, param}` in their own chip-select window, with no address phase,
//! and the chip never answers them.

use crate::eve::error::Result;
use crate::eve::interface::Transport;

pub struct Cmd;

#[allow(missing_docs)]
impl Cmd {
    // Power modes
    pub const ACTIVE: u8 = 0x00;
    pub const STANDBY: u8 = 0x41;
    pub const SLEEP: u8 = 0x42;
    pub const PWRDOWN: u8 = 0x43;

    // Clock source
    pub const CLKEXT: u8 = 0x44;
    pub const CLKINT: u8 = 0x48;
    pub const CLKSEL: u8 = 0x61;

    // Reset and pins
    pub const RST_PULSE: u8 = 0x68;
    pub const PINDRIVE: u8 = 0x70;
    pub const PIN_PD_STAT: u8 = 0x71;
}

/// One host command ready to be dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCommand {
    pub code: u8,
    pub param: u8,
}

impl HostCommand {
    pub const fn new(code: u8, param: u8) -> Self {
        HostCommand { code, param }
    }

    /// Command without parameter
    pub const fn bare(code: u8) -> Self {
        HostCommand::new(code, 0)
    }

    /// Bytes on the wire
    pub const fn frame(self) -> [u8; 2] {
        [self.code, self.param]
    }

    /// Fire the command. Nothing is read back.
    pub fn send<T: Transport + ?Sized>(self, transport: &mut T) -> Result<()> {
        log::debug!("host command 0x{:02X} param 0x{:02X}", self.code, self.param);

        transport.transmit(&self.frame()).inspect_err(|e| {
            log::warn!("host command 0x{:02X} failed: {}", self.code, e);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_code_then_param() {
        assert_eq!(HostCommand::bare(Cmd::ACTIVE).frame(), [0x00, 0x00]);
        assert_eq!(HostCommand::new(Cmd::CLKSEL, 0x46).frame(), [0x61, 0x46]);
        assert_eq!(HostCommand::bare(Cmd::RST_PULSE).frame(), [0x68, 0x00]);
    }
}
