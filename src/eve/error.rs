//! Error type shared by the transport, registry and bring-up sequencer

use embedded_hal::{digital, spi};

use crate::eve::driver::Step;

/// Convenience alias used throughout the driver
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors reported by the EVE driver
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Pin configuration or bus attachment was refused by the platform.
    #[error("platform error: {0}")]
    Platform(String),

    /// An address, data or command phase failed on the bus.
    #[error("bus transaction failed: {0}")]
    Bus(spi::ErrorKind),

    /// Every device slot of the registry is in use.
    #[error("no more devices available (capacity {0})")]
    ResourceExhausted(usize),

    /// Zero-width access, malformed configuration or a stale handle.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A fatal bring-up step failed; the device is in an unknown powered state.
    #[error("initialization failed at {step}: {source}")]
    Init {
        /// Step that was executing
        step: Step,
        /// Underlying transport or pin failure
        source: Box<Error>,
    },

    /// A readiness poll gave up after its attempt budget.
    #[error("{step} not ready after {attempts} attempts")]
    Timeout {
        /// Poll that timed out
        step: Step,
        /// Number of reads issued
        attempts: u32,
    },
}

impl Error {
    /// Wraps a failure of `step` into a fatal [`Error::Init`].
    pub(crate) fn init(step: Step) -> impl FnOnce(Error) -> Error {
        move |source| Error::Init {
            step,
            source: Box::new(source),
        }
    }

    /// Maps a pin driver failure to a platform error.
    pub(crate) fn pin<E: digital::Error>(line: &'static str) -> impl FnOnce(E) -> Error {
        move |e| Error::Platform(format!("{} line: {}", line, e.kind()))
    }

    /// Maps an SPI driver failure to a bus error.
    pub(crate) fn bus<E: spi::Error>(e: E) -> Error {
        Error::Bus(e.kind())
    }
}
