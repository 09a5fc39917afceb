//! Opcodes, sub-opcodes and frame lengths of the SIO bus.
//!
//! Lengths are in bits and include the trailing stop bit,
//! so a frame of `n` bytes is `n * 8 + 1` bits long.

use crate::frame::FRAME_LEN;

/// Nothing shorter than one opcode byte is a frame.
pub const MIN_FRAME_BITS: usize = 9;

/// Longest frame the buffer can capture.
pub const MAX_FRAME_BITS: usize = FRAME_LEN * 8 + 1;

/// `RESET` / `ID`: opcode only.
pub const ID_FRAME_BITS: usize = 9;

/// `GBREAD`: opcode, channel, one argument byte.
pub const GBREAD_FRAME_BITS: usize = 25;

/// `GBWRITE`: opcode, action, one argument byte, 32 payload bytes.
pub const GBWRITE_FRAME_BITS: usize = 281;

/// Value staged in the status slot by a configuration write.
pub const STATUS_READY: u8 = 0x02;

/// Marker staged in the link slot by a link send.
pub const LINK_COMPLETE: u8 = 0x81;

/// Where [`LINK_COMPLETE`] lands in the link window.
pub const LINK_COMPLETE_OFFSET: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    Id = 0x00,
    Status = 0x01,
    Read = 0x02,
    Write = 0x03,
    GbRead = 0x13,
    GbWrite = 0x14,
    Reset = 0xff,
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => Self::Id,
            0x01 => Self::Status,
            0x02 => Self::Read,
            0x03 => Self::Write,
            0x13 => Self::GbRead,
            0x14 => Self::GbWrite,
            0xff => Self::Reset,
            other => Err(other)?,
        })
    }
}

impl Opcode {
    /// The exact length this opcode is answered at,
    /// `None` for opcodes this cable never answers.
    pub const fn frame_bits(self) -> Option<usize> {
        match self {
            Self::Id | Self::Reset => Some(ID_FRAME_BITS),
            Self::GbRead => Some(GBREAD_FRAME_BITS),
            Self::GbWrite => Some(GBWRITE_FRAME_BITS),
            Self::Status | Self::Read | Self::Write => None,
        }
    }
}

/// `GBREAD` sub-opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ReadChannel {
    /// Communication status.
    Status = 0xc0,
    /// Data received over the link.
    Link = 0xf0,
}

impl TryFrom<u8> for ReadChannel {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0xc0 => Ok(Self::Status),
            0xf0 => Ok(Self::Link),
            other => Err(other),
        }
    }
}

/// `GBWRITE` sub-opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteAction {
    /// Full session reset.
    Initialize,
    /// Communication configuration.
    Configure,
    /// Send over the link.
    LinkSend,
    /// Checksummed but otherwise ignored.
    Other(u8),
}

impl From<u8> for WriteAction {
    fn from(value: u8) -> Self {
        match value {
            0x80 => Self::Initialize,
            0xc0 => Self::Configure,
            0xe0 => Self::LinkSend,
            other => Self::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcodes() {
        assert_eq!(Ok(Opcode::Reset), Opcode::try_from(0xff));
        assert_eq!(Ok(Opcode::GbWrite), Opcode::try_from(0x14));
        assert_eq!(Err(0x15), Opcode::try_from(0x15));

        for op in [
            Opcode::Id,
            Opcode::Status,
            Opcode::Read,
            Opcode::Write,
            Opcode::GbRead,
            Opcode::GbWrite,
            Opcode::Reset,
        ] {
            assert_eq!(Ok(op), Opcode::try_from(op as u8));
        }
    }

    #[test]
    fn frame_lengths() {
        assert_eq!(Some(3 * 8 + 1), Opcode::GbRead.frame_bits());
        assert_eq!(Some(35 * 8 + 1), Opcode::GbWrite.frame_bits());
        assert_eq!(None, Opcode::Status.frame_bits());
        assert_eq!(1025, MAX_FRAME_BITS);
    }

    #[test]
    fn sub_opcodes() {
        assert_eq!(Ok(ReadChannel::Link), ReadChannel::try_from(0xf0));
        assert_eq!(Err(0xe0), ReadChannel::try_from(0xe0));
        assert_eq!(WriteAction::Initialize, WriteAction::from(0x80));
        assert_eq!(WriteAction::Other(0x00), WriteAction::from(0x00));
    }
}
