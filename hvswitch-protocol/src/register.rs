//! Register map of the emulated GPIO expander
//!
//! The control board talks to the switching board as if it were a
//! PCA9505-style 40-bit I/O expander. A command byte selects a register:
//!
//! ```text
//!  bit 7      bits 6..0
//! ┌──────┬──────────────────┐
//! │  AI  │ register address │   AI = auto-increment (multi-byte writes)
//! └──────┴──────────────────┘
//! ```
//!
//! Only the low 6 bits take part in register matching. Vendor commands
//! (`0xA0..=0xA3`) are matched on the full byte.

/// First output-port register (one register per port)
pub const OUTPUT_PORT_REGISTER: u8 = 0x08;

/// First I/O-configuration register (one register per port)
pub const CONFIG_IO_REGISTER: u8 = 0x18;

/// Auto-increment flag in the command byte
pub const AUTO_INCREMENT: u8 = 1 << 7;

/// Bits of the command byte that address a register
pub const REGISTER_MASK: u8 = 0x3F;

/// Set every channel from one inverted byte per port
pub const CMD_SET_STATE_OF_ALL_CHANNELS: u8 = 0xA0;

/// Read every channel as one inverted byte per port
pub const CMD_GET_STATE_OF_ALL_CHANNELS: u8 = 0xA1;

/// Reboot into the bootloader
pub const CMD_REBOOT: u8 = 0xA2;

/// Restore the default configuration
pub const CMD_RESET_CONFIG: u8 = 0xA3;

/// Decoded command byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Output-port register of `port`
    OutputPort {
        /// Port addressed by the register
        port: u8,
        /// Multi-byte writes advance to the next port
        auto_increment: bool,
    },
    /// I/O-configuration register of `port`
    ConfigIo {
        /// Port addressed by the register
        port: u8,
        /// Multi-byte writes advance to the next port
        auto_increment: bool,
    },
    /// [`CMD_SET_STATE_OF_ALL_CHANNELS`]
    SetAllChannels,
    /// [`CMD_GET_STATE_OF_ALL_CHANNELS`]
    GetAllChannels,
    /// [`CMD_REBOOT`]
    Reboot,
    /// [`CMD_RESET_CONFIG`]
    ResetConfig,
    /// Anything else, left to the base node protocol
    Other(u8),
}

impl Command {
    /// Decode a command byte for a board with `ports` ports
    pub fn decode(byte: u8, ports: usize) -> Self {
        let register = byte & REGISTER_MASK;
        let auto_increment = byte & AUTO_INCREMENT != 0;

        if let Some(port) = port_in_block(register, CONFIG_IO_REGISTER, ports) {
            return Self::ConfigIo {
                port,
                auto_increment,
            };
        }
        if let Some(port) = port_in_block(register, OUTPUT_PORT_REGISTER, ports) {
            return Self::OutputPort {
                port,
                auto_increment,
            };
        }

        match byte {
            CMD_SET_STATE_OF_ALL_CHANNELS => Self::SetAllChannels,
            CMD_GET_STATE_OF_ALL_CHANNELS => Self::GetAllChannels,
            CMD_REBOOT => Self::Reboot,
            CMD_RESET_CONFIG => Self::ResetConfig,
            other => Self::Other(other),
        }
    }
}

fn port_in_block(register: u8, first: u8, ports: usize) -> Option<u8> {
    let port = register.checked_sub(first)?;
    (usize::from(port) < ports).then_some(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_output_ports() {
        assert_eq!(
            Command::decode(0x08, 5),
            Command::OutputPort {
                port: 0,
                auto_increment: false
            }
        );
        assert_eq!(
            Command::decode(0x8C, 5),
            Command::OutputPort {
                port: 4,
                auto_increment: true
            }
        );
        // One past the last port
        assert_eq!(Command::decode(0x0D, 5), Command::Other(0x0D));
    }

    #[test]
    fn test_decode_config_io() {
        assert_eq!(
            Command::decode(0x1A, 5),
            Command::ConfigIo {
                port: 2,
                auto_increment: false
            }
        );
        assert_eq!(Command::decode(0x1A, 2), Command::Other(0x1A));
    }

    #[test]
    fn test_decode_vendor_commands() {
        assert_eq!(Command::decode(0xA0, 5), Command::SetAllChannels);
        assert_eq!(Command::decode(0xA1, 5), Command::GetAllChannels);
        assert_eq!(Command::decode(0xA2, 5), Command::Reboot);
        assert_eq!(Command::decode(0xA3, 5), Command::ResetConfig);
        assert_eq!(Command::decode(0x01, 5), Command::Other(0x01));
    }
}
