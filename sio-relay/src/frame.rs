use crate::crc::{Crc8, CrcProvider, WINDOW_LEN};

pub mod error {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Overflow;
}

/// Size of the frame buffer in bytes.
pub const FRAME_LEN: usize = 128;

/// A staging window followed by its checksum byte.
pub const SLOT_LEN: usize = WINDOW_LEN + 1;

/// Fixed regions of the frame buffer that carry
/// a 32 byte window and a trailing checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// Payload of an inbound link write.
    Send,
    /// Communication status, surfaced by a status read.
    Status,
    /// Data received from the peripheral, surfaced by a link read.
    Link,
}

impl Slot {
    /// Offset of the first window byte.
    pub const fn offset(self) -> usize {
        match self {
            Self::Send => 0x03,
            Self::Status => 0x30,
            Self::Link => 0x51,
        }
    }

    /// Offset of the checksum byte.
    pub const fn checksum_offset(self) -> usize {
        self.offset() + WINDOW_LEN
    }
}

const _: () = assert!(Slot::Link.offset() + SLOT_LEN <= FRAME_LEN);

/// The one piece of mutable state: inbound frames land here
/// and staged replies are read back out.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameBuffer {
    buf: [u8; FRAME_LEN],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub const fn new() -> Self {
        Self {
            buf: [0; FRAME_LEN],
        }
    }

    /// Load an inbound frame at the start of the buffer.
    ///
    /// Bytes past the end of the frame keep their previous
    /// contents, staged slots included.
    pub fn ingest<'a>(
        &mut self,
        src: impl IntoIterator<Item = &'a u8>,
    ) -> Result<(), error::Overflow> {
        let mut dst = self.buf.iter_mut();

        src.into_iter().try_for_each(|&byte| {
            *dst.next().ok_or(error::Overflow)? = byte;

            Ok(())
        })
    }

    /// The command byte.
    #[inline]
    pub fn opcode(&self) -> u8 {
        self.buf[0]
    }

    /// The byte selecting the tunneled action.
    #[inline]
    pub fn sub_opcode(&self) -> u8 {
        self.buf[1]
    }

    /// Borrow the 32 byte window of a slot.
    pub fn window(&self, slot: Slot) -> &[u8] {
        &self.buf[slot.offset()..slot.checksum_offset()]
    }

    /// Borrow a slot's window together with its checksum byte.
    pub fn slot(&self, slot: Slot) -> &[u8] {
        &self.buf[slot.offset()..slot.offset() + SLOT_LEN]
    }

    /// Write `value` at `index` bytes into a slot's window.
    ///
    /// Indices past the window are ignored.
    pub fn stage(&mut self, slot: Slot, index: usize, value: u8) {
        if index < WINDOW_LEN {
            self.buf[slot.offset() + index] = value;
        }
    }

    /// Recompute a slot's checksum and store it after the window.
    pub fn seal(&mut self, slot: Slot) -> u8 {
        let mut crc = Crc8::new();

        self.window(slot).iter().for_each(|byte| crc.update(byte));

        let checksum = crc.finalize();
        self.buf[slot.checksum_offset()] = checksum;

        checksum
    }

    /// Zero the whole buffer.
    pub fn clear(&mut self) {
        self.buf.fill(0);
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.buf
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8; FRAME_LEN] {
        &mut self.buf
    }
}
