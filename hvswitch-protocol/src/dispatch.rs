//! Register command dispatcher
//!
//! Applies decoded register commands to a [`WindowScheduler`]. Output-port
//! registers are active-low, as on the emulated expander: a 0 bit turns the
//! channel on. The dispatcher inverts at this boundary so the scheduler's
//! base bitmap stays active-high.
//!
//! Transfer rules for register blocks:
//!
//! - empty payload: read the addressed register;
//! - one byte: write the addressed register;
//! - several bytes: write consecutive registers, only with auto-increment
//!   and without running past the last port.
//!
//! The reply is the (last) register touched.

use heapless::Vec;

use hvswitch_core::config::SchedulerConfig;
use hvswitch_core::WindowScheduler;

use crate::register::Command;

/// Largest port count the register map can address
pub const MAX_PORTS: usize = 8;

/// Reply bytes
pub type Reply = Vec<u8, MAX_PORTS>;

/// Return codes of the base node protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ReturnCode {
    Ok = 0x00,
    GeneralError = 0x01,
    UnknownCommand = 0x02,
}

/// Dispatch failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// Malformed transfer (bad payload length, missing auto-increment)
    GeneralError,
    /// Command byte not handled here
    UnknownCommand(u8),
}

impl DispatchError {
    /// Protocol return code for this error
    pub const fn return_code(&self) -> ReturnCode {
        match self {
            Self::GeneralError => ReturnCode::GeneralError,
            Self::UnknownCommand(_) => ReturnCode::UnknownCommand,
        }
    }
}

/// Follow-up the firmware must perform after replying
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Reboot into the bootloader
    Reboot,
    /// Configuration was reset; restore the default bus address
    ConfigReset,
}

/// Successful dispatch result
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    /// Bytes to send back
    pub reply: Reply,
    /// Deferred action, if any
    pub action: Option<Action>,
}

impl Response {
    fn reply(bytes: &[u8]) -> Result<Self, DispatchError> {
        let reply = Vec::from_slice(bytes).map_err(|_| DispatchError::GeneralError)?;
        Ok(Self {
            reply,
            action: None,
        })
    }

    fn empty() -> Self {
        Self {
            reply: Vec::new(),
            action: None,
        }
    }

    fn action(action: Action) -> Self {
        Self {
            reply: Vec::new(),
            action: Some(action),
        }
    }

    /// Return code to report
    pub const fn return_code(&self) -> ReturnCode {
        ReturnCode::Ok
    }
}

/// Emulated register state that does not live in the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBank<const PORTS: usize> {
    config_io: [u8; PORTS],
}

impl<const PORTS: usize> Default for RegisterBank<PORTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const PORTS: usize> RegisterBank<PORTS> {
    const PORTS_OK: () = assert!(
        PORTS > 0 && PORTS <= MAX_PORTS,
        "register map addresses 1 to 8 ports"
    );

    /// Registers at power-on values
    pub const fn new() -> Self {
        let () = Self::PORTS_OK;
        Self {
            config_io: [0; PORTS],
        }
    }

    /// I/O-configuration registers
    pub fn config_io(&self) -> &[u8; PORTS] {
        &self.config_io
    }

    /// Handle one command byte and its payload
    pub fn dispatch(
        &mut self,
        scheduler: &mut WindowScheduler<PORTS>,
        command: u8,
        payload: &[u8],
    ) -> Result<Response, DispatchError> {
        let result = self.handle(scheduler, Command::decode(command, PORTS), payload);

        #[cfg(feature = "defmt")]
        if let Err(err) = &result {
            defmt::warn!("command {=u8:#x} rejected: {}", command, err);
        }

        result
    }

    fn handle(
        &mut self,
        scheduler: &mut WindowScheduler<PORTS>,
        command: Command,
        payload: &[u8],
    ) -> Result<Response, DispatchError> {
        match command {
            Command::ConfigIo {
                port,
                auto_increment,
            } => {
                let last = write_block(&mut self.config_io, port.into(), payload, auto_increment)?;
                Response::reply(&[self.config_io[last]])
            }
            Command::OutputPort {
                port,
                auto_increment,
            } => {
                let mut registers = invert(scheduler.get_base_states());
                let last = write_block(&mut registers, port.into(), payload, auto_increment)?;
                if !payload.is_empty() {
                    scheduler.set_base_states(invert(registers));

                    #[cfg(feature = "defmt")]
                    defmt::debug!(
                        "base states updated, {} active, period {}",
                        scheduler.active_count(),
                        scheduler.period()
                    );
                }
                Response::reply(&[registers[last]])
            }
            Command::SetAllChannels => {
                let registers: [u8; PORTS] =
                    payload.try_into().map_err(|_| DispatchError::GeneralError)?;
                scheduler.set_base_states(invert(registers));
                Ok(Response::empty())
            }
            Command::GetAllChannels => Response::reply(&invert(scheduler.get_base_states())),
            Command::Reboot => Ok(Response::action(Action::Reboot)),
            Command::ResetConfig => {
                SchedulerConfig::default().apply(scheduler);
                Ok(Response::action(Action::ConfigReset))
            }
            Command::Other(byte) => Err(DispatchError::UnknownCommand(byte)),
        }
    }
}

/// Apply a register-block transfer; returns the index of the last register
fn write_block<const PORTS: usize>(
    registers: &mut [u8; PORTS],
    port: usize,
    payload: &[u8],
    auto_increment: bool,
) -> Result<usize, DispatchError> {
    match payload.len() {
        0 => Ok(port),
        1 => {
            registers[port] = payload[0];
            Ok(port)
        }
        n if auto_increment && port + n <= PORTS => {
            registers[port..port + n].copy_from_slice(payload);
            Ok(port + n - 1)
        }
        _ => Err(DispatchError::GeneralError),
    }
}

fn invert<const PORTS: usize>(ports: [u8; PORTS]) -> [u8; PORTS] {
    ports.map(|byte| !byte)
}
