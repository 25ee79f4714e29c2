//! EVE bring-up sequence
//!
//! Takes a freshly opened device (held in reset) to a panel showing a
//! cleared frame. The steps run strictly in order:
//!
//! 1. [`Step::PowerUp`] - settle, release power-down, settle again
//! 2. [`Step::Activate`] - `RST_PULSE` then `ACTIVE` host commands
//! 3. [`Step::ChipId`] - poll `REG_ID` until it reads `0x7C`
//! 4. [`Step::CpuReset`] - poll `REG_CPURESET` until every engine is out of reset
//! 5. [`Step::Clock`] - program `REG_FREQUENCY`
//! 6. [`Step::Timing`] - program the horizontal/vertical timing registers
//! 7. [`Step::DisplayList`] - write a clear-screen list to RAM_DL and swap it in
//! 8. [`Step::Enable`] - raise the DISP GPIO and start the pixel clock
//!
//! ## Failure semantics
//!
//! A bus or pin failure in any step except the two polls aborts the
//! sequence with [`Error::Init`]. Inside a poll a failed read only counts as
//! "not ready yet". With [`Poll::Forever`] a chip that never answers blocks
//! the caller indefinitely; [`Poll::Attempts`] turns that into
//! [`Error::Timeout`] once the attempt budget is spent.
//!
//! After an error the device is in an unknown powered state; close it and
//! open it again before retrying.

use core::fmt;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::eve::cmd::Cmd;
use crate::eve::device::Device;
use crate::eve::dl;
use crate::eve::error::{Error, Result};
use crate::eve::flag::Flag;
use crate::eve::interface::Transport;
use crate::eve::reg::{Reg, Region};

/// Settle time before and after releasing power-down
const POWER_SETTLE_MS: u32 = 50;
/// Wait between two `REG_ID` reads
const ID_POLL_INTERVAL_MS: u32 = 500;
/// Wait between two `REG_CPURESET` reads
const CPURESET_POLL_INTERVAL_MS: u32 = 25;

/// Default `REG_ID` attempt budget, ~10 s
pub const DEFAULT_ID_ATTEMPTS: u32 = 20;
/// Default `REG_CPURESET` attempt budget, ~1 s
pub const DEFAULT_CPURESET_ATTEMPTS: u32 = 40;

/// Bring-up step, used to report where a sequence stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    PowerUp,
    Activate,
    ChipId,
    CpuReset,
    Clock,
    Timing,
    DisplayList,
    Enable,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::PowerUp => "power up",
            Step::Activate => "core activation",
            Step::ChipId => "chip id poll",
            Step::CpuReset => "cpu reset poll",
            Step::Clock => "clock configuration",
            Step::Timing => "timing configuration",
            Step::DisplayList => "display list",
            Step::Enable => "display enable",
        };
        f.write_str(name)
    }
}

/// How long a readiness poll keeps trying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// Retry until the chip answers, however long that takes
    Forever,
    /// Give up with [`Error::Timeout`] after this many reads
    Attempts(u32),
}

/// Panel timing and clock parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTimings {
    /// System clock in Hz, written to `REG_FREQUENCY`
    pub frequency: u32,
    pub hsize: u16,
    pub hcycle: u16,
    pub hoffset: u16,
    pub hsync0: u16,
    pub hsync1: u16,
    pub vsize: u16,
    pub vcycle: u16,
    pub voffset: u16,
    pub vsync0: u16,
    pub vsync1: u16,
    pub pclk_pol: u8,
    /// Pixel clock divisor, 0 keeps the clock stopped
    pub pclk: u8,
}

impl DisplayTimings {
    /// 800x480 WVGA panel (Adafruit 1680) at 60 MHz system clock
    pub const WVGA_800X480: DisplayTimings = DisplayTimings {
        frequency: 60_000_000,
        hsize: 800,
        hcycle: 928,
        hoffset: 88,
        hsync0: 0,
        hsync1: 48,
        vsize: 480,
        vcycle: 525,
        voffset: 32,
        vsync0: 0,
        vsync1: 3,
        pclk_pol: Flag::PCLK_POL_RISING,
        pclk: 2,
    };
}

/// Runs the bring-up sequence against one device
pub struct Sequencer<DELAY> {
    delay: DELAY,
    timings: DisplayTimings,
    id_poll: Poll,
    cpureset_poll: Poll,
    clear_color: Rgb888,
}

impl<DELAY: DelayNs> Sequencer<DELAY> {
    pub fn new(delay: DELAY, timings: DisplayTimings) -> Self {
        Sequencer {
            delay,
            timings,
            id_poll: Poll::Attempts(DEFAULT_ID_ATTEMPTS),
            cpureset_poll: Poll::Attempts(DEFAULT_CPURESET_ATTEMPTS),
            clear_color: Rgb888::BLUE,
        }
    }

    pub fn with_id_poll(mut self, poll: Poll) -> Self {
        self.id_poll = poll;
        self
    }

    pub fn with_cpureset_poll(mut self, poll: Poll) -> Self {
        self.cpureset_poll = poll;
        self
    }

    /// Colour of the first frame
    pub fn with_clear_color(mut self, color: Rgb888) -> Self {
        self.clear_color = color;
        self
    }

    /// Words of the bring-up display list, in RAM_DL order
    pub fn display_list(&self) -> [u32; 3] {
        [
            dl::clear_color_rgb(self.clear_color),
            dl::clear(true, true, true),
            dl::display(),
        ]
    }

    /// Take the device from reset to an enabled display
    pub fn run<T, PD>(&mut self, device: &mut Device<T, PD>) -> Result<()>
    where
        T: Transport,
        PD: OutputPin,
    {
        log::info!("Initializing EVE controller");

        self.power_up(device).map_err(Error::init(Step::PowerUp))?;
        self.activate(device).map_err(Error::init(Step::Activate))?;
        log::info!("Core activated, waiting for chip id");

        let attempts = self.wait_chip_id(device)?;
        log::info!("LCD ready after {} id reads", attempts);

        let attempts = self.wait_cpu_ready(device)?;
        log::info!("LCD CPU state ready after {} status reads", attempts);

        self.configure_clock(device).map_err(Error::init(Step::Clock))?;
        log::info!("System clock set to {} Hz", self.timings.frequency);

        self.configure_timing(device).map_err(Error::init(Step::Timing))?;
        log::info!("Display timing configured");

        self.load_display_list(device).map_err(Error::init(Step::DisplayList))?;
        log::info!("Initial display list swapped in");

        self.enable_output(device).map_err(Error::init(Step::Enable))?;

        log::info!(
            "Display enabled: {}x{}",
            self.timings.hsize,
            self.timings.vsize
        );
        Ok(())
    }

    fn power_up<T, PD>(&mut self, device: &mut Device<T, PD>) -> Result<()>
    where
        T: Transport,
        PD: OutputPin,
    {
        // PD is already low from open; give the rails time before releasing it
        self.delay.delay_ms(POWER_SETTLE_MS);
        device.set_power(true)?;
        self.delay.delay_ms(POWER_SETTLE_MS);
        Ok(())
    }

    fn activate<T, PD>(&mut self, device: &mut Device<T, PD>) -> Result<()>
    where
        T: Transport,
        PD: OutputPin,
    {
        device.command(Cmd::RST_PULSE, 0)?;
        device.command(Cmd::ACTIVE, 0)
    }

    fn wait_chip_id<T, PD>(&mut self, device: &mut Device<T, PD>) -> Result<u32>
    where
        T: Transport,
        PD: OutputPin,
    {
        poll(
            &mut self.delay,
            Step::ChipId,
            self.id_poll,
            ID_POLL_INTERVAL_MS,
            || Ok(device.rd(Reg::ID)? == Flag::CHIP_ID),
        )
    }

    fn wait_cpu_ready<T, PD>(&mut self, device: &mut Device<T, PD>) -> Result<u32>
    where
        T: Transport,
        PD: OutputPin,
    {
        poll(
            &mut self.delay,
            Step::CpuReset,
            self.cpureset_poll,
            CPURESET_POLL_INTERVAL_MS,
            || Ok(device.rd(Reg::CPURESET)? == Flag::CPURESET_READY),
        )
    }

    fn configure_clock<T, PD>(&mut self, device: &mut Device<T, PD>) -> Result<()>
    where
        T: Transport,
        PD: OutputPin,
    {
        device.wr(Reg::FREQUENCY, self.timings.frequency)
    }

    fn configure_timing<T, PD>(&mut self, device: &mut Device<T, PD>) -> Result<()>
    where
        T: Transport,
        PD: OutputPin,
    {
        let t = &self.timings;

        device.wr(Reg::HSIZE, t.hsize)?;
        device.wr(Reg::HCYCLE, t.hcycle)?;
        device.wr(Reg::HOFFSET, t.hoffset)?;
        device.wr(Reg::HSYNC0, t.hsync0)?;
        device.wr(Reg::HSYNC1, t.hsync1)?;
        device.wr(Reg::VSIZE, t.vsize)?;
        device.wr(Reg::VCYCLE, t.vcycle)?;
        device.wr(Reg::VOFFSET, t.voffset)?;
        device.wr(Reg::VSYNC0, t.vsync0)?;
        device.wr(Reg::VSYNC1, t.vsync1)?;
        device.wr(Reg::PCLK_POL, t.pclk_pol)
    }

    fn load_display_list<T, PD>(&mut self, device: &mut Device<T, PD>) -> Result<()>
    where
        T: Transport,
        PD: OutputPin,
    {
        for (index, word) in self.display_list().into_iter().enumerate() {
            device.write32(Region::RamDl.at(4 * index as u32), word)?;
        }
        device.wr(Reg::DLSWAP, Flag::DLSWAP_FRAME)
    }

    fn enable_output<T, PD>(&mut self, device: &mut Device<T, PD>) -> Result<()>
    where
        T: Transport,
        PD: OutputPin,
    {
        device.wr(Reg::GPIO, Flag::GPIO_DISP)?;
        device.wr(Reg::PCLK, self.timings.pclk)
    }
}

/// Re-run `ready` until it reports true, waiting `interval_ms` in between.
///
/// Returns the number of attempts it took. Errors from `ready` are retried.
fn poll<DELAY, F>(
    delay: &mut DELAY,
    step: Step,
    policy: Poll,
    interval_ms: u32,
    mut ready: F,
) -> Result<u32>
where
    DELAY: DelayNs,
    F: FnMut() -> Result<bool>,
{
    let mut attempts = 0u32;

    loop {
        attempts = attempts.saturating_add(1);

        match ready() {
            Ok(true) => return Ok(attempts),
            Ok(false) => {}
            Err(e) => log::debug!("{} attempt {} failed: {}", step, attempts, e),
        }

        if let Poll::Attempts(max) = policy {
            if attempts >= max {
                log::warn!("{}: giving up after {} attempts", step, attempts);
                return Err(Error::Timeout { step, attempts });
            }
        }

        delay.delay_ms(interval_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wvga_preset_matches_panel() {
        let t = DisplayTimings::WVGA_800X480;
        assert_eq!(t.frequency, 0x0393_8700);
        assert_eq!((t.hsize, t.vsize), (800, 480));
        assert_eq!((t.hcycle, t.vcycle), (928, 525));
        assert_eq!(t.pclk, 2);
    }

    #[test]
    fn step_names() {
        assert_eq!(Step::ChipId.to_string(), "chip id poll");
        assert_eq!(Step::Timing.to_string(), "timing configuration");
    }
}
