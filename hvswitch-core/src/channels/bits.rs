//! Packed one-bit-per-channel state
//!
//! Channels are grouped in byte-wide ports to match the output register
//! width. Channel `c` lives in port `c / 8` at bit `c % 8`, where bit 0 is
//! the least significant bit of the port byte.

use core::fmt;

/// Number of channels per port
pub const CHANNELS_PER_PORT: usize = 8;

/// Index errors for port/channel addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Port index is not below the port count
    PortOutOfRange(usize),
    /// Channel index is not below the channel count
    ChannelOutOfRange(usize),
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PortOutOfRange(port) => write!(f, "port {} out of range", port),
            Self::ChannelOutOfRange(channel) => write!(f, "channel {} out of range", channel),
        }
    }
}

/// Fixed-capacity bit-set of `8 * PORTS` channels
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelBits<const PORTS: usize> {
    ports: [u8; PORTS],
}

impl<const PORTS: usize> Default for ChannelBits<PORTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const PORTS: usize> ChannelBits<PORTS> {
    /// Total number of addressable channels
    pub const CHANNELS: usize = PORTS * CHANNELS_PER_PORT;

    /// Create a bit-set with every channel off
    pub const fn new() -> Self {
        Self { ports: [0; PORTS] }
    }

    /// Create a bit-set from raw port bytes
    pub const fn from_ports(ports: [u8; PORTS]) -> Self {
        Self { ports }
    }

    /// Build a bit-set by evaluating `f` for every channel index
    pub fn from_fn(mut f: impl FnMut(usize) -> bool) -> Self {
        let mut ports = [0u8; PORTS];
        for (port, byte) in ports.iter_mut().enumerate() {
            for bit in 0..CHANNELS_PER_PORT {
                if f(port * CHANNELS_PER_PORT + bit) {
                    *byte |= 1 << bit;
                }
            }
        }
        Self { ports }
    }

    /// Raw port bytes
    pub const fn ports(&self) -> &[u8; PORTS] {
        &self.ports
    }

    /// Consume into raw port bytes
    pub const fn into_ports(self) -> [u8; PORTS] {
        self.ports
    }

    /// Read one port byte
    pub fn port(&self, port: usize) -> Option<u8> {
        self.ports.get(port).copied()
    }

    /// Overwrite one port byte
    pub fn set_port(&mut self, port: usize, value: u8) -> Result<(), ChannelError> {
        let slot = self
            .ports
            .get_mut(port)
            .ok_or(ChannelError::PortOutOfRange(port))?;
        *slot = value;
        Ok(())
    }

    /// Read a channel bit, `None` if the channel does not exist
    pub fn get(&self, channel: usize) -> Option<bool> {
        let (port, bit) = split(channel);
        self.ports.get(port).map(|byte| byte & (1 << bit) != 0)
    }

    /// Check whether a channel is on (out-of-range channels read as off)
    pub fn is_on(&self, channel: usize) -> bool {
        self.get(channel).unwrap_or(false)
    }

    /// Write a channel bit
    pub fn set(&mut self, channel: usize, on: bool) -> Result<(), ChannelError> {
        let (port, bit) = split(channel);
        let byte = self
            .ports
            .get_mut(port)
            .ok_or(ChannelError::ChannelOutOfRange(channel))?;
        if on {
            *byte |= 1 << bit;
        } else {
            *byte &= !(1 << bit);
        }
        Ok(())
    }

    /// Turn every channel off
    pub fn clear(&mut self) {
        self.ports = [0; PORTS];
    }

    /// Number of channels that are on
    pub fn count_ones(&self) -> usize {
        self.ports.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Check whether every channel is off
    pub fn is_empty(&self) -> bool {
        self.ports.iter().all(|&b| b == 0)
    }

    /// Every channel index in scan order
    ///
    /// Ports are visited in ascending order, bits within a port from the
    /// most significant down, matching the hardware bit weight.
    pub fn scan_order() -> ScanOrder<PORTS> {
        ScanOrder { next: 0 }
    }

    /// Channels that are on, in scan order
    pub fn iter_on(&self) -> impl Iterator<Item = usize> + '_ {
        Self::scan_order().filter(move |&channel| self.is_on(channel))
    }
}

impl<const PORTS: usize> From<[u8; PORTS]> for ChannelBits<PORTS> {
    fn from(ports: [u8; PORTS]) -> Self {
        Self::from_ports(ports)
    }
}

impl<const PORTS: usize> From<ChannelBits<PORTS>> for [u8; PORTS] {
    fn from(bits: ChannelBits<PORTS>) -> Self {
        bits.ports
    }
}

impl<const PORTS: usize> fmt::Debug for ChannelBits<PORTS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for byte in &self.ports {
            list.entry(&format_args!("{:#010b}", byte));
        }
        list.finish()
    }
}

#[cfg(feature = "defmt")]
impl<const PORTS: usize> defmt::Format for ChannelBits<PORTS> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:#04x}", &self.ports[..])
    }
}

/// Iterator over channel indices in hardware scan order
#[derive(Debug, Clone)]
pub struct ScanOrder<const PORTS: usize> {
    next: usize,
}

impl<const PORTS: usize> Iterator for ScanOrder<PORTS> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next >= ChannelBits::<PORTS>::CHANNELS {
            return None;
        }
        let port = self.next / CHANNELS_PER_PORT;
        let bit = CHANNELS_PER_PORT - 1 - self.next % CHANNELS_PER_PORT;
        self.next += 1;
        Some(port * CHANNELS_PER_PORT + bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = ChannelBits::<PORTS>::CHANNELS.saturating_sub(self.next);
        (left, Some(left))
    }
}

impl<const PORTS: usize> ExactSizeIterator for ScanOrder<PORTS> {}

#[inline]
const fn split(channel: usize) -> (usize, usize) {
    (channel / CHANNELS_PER_PORT, channel % CHANNELS_PER_PORT)
}
