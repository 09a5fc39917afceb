use crate::{
    command::{
        Opcode, ReadChannel, WriteAction, LINK_COMPLETE, LINK_COMPLETE_OFFSET, MAX_FRAME_BITS,
        MIN_FRAME_BITS, STATUS_READY,
    },
    frame::{FrameBuffer, Slot},
    hardware::Hardware,
    identity::IDENTITY,
    transport::{Reply, Transport},
};

pub mod error {
    use crate::command::Opcode;

    /// Why a frame went unanswered.
    ///
    /// Never reported on the bus: the remote side
    /// sees a missing reply and times out.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Discard {
        /// Noise or a partial transfer.
        Short { bits: usize },
        /// A known opcode at the wrong length.
        Length { opcode: Opcode, bits: usize },
        UnknownOpcode(u8),
        /// A known opcode this cable does not answer.
        Unsupported(Opcode),
        /// A read of a channel that does not exist.
        UnknownChannel(u8),
    }
}

use error::Discard;

/// Owns the frame buffer and answers every frame the
/// transport captures into it.
pub struct CommandDispatcher<T: Transport> {
    transport: T,
    frame: FrameBuffer,
}

impl<T: Transport> CommandDispatcher<T> {
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            frame: FrameBuffer::new(),
        }
    }

    #[inline]
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    #[inline]
    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_parts(self) -> (T, FrameBuffer) {
        (self.transport, self.frame)
    }

    /// Act on the frame currently in the buffer.
    ///
    /// The reply is captured before any staging happens,
    /// so an initialization write still answers with the
    /// checksum of the payload it wipes.
    ///
    /// Incoming write payloads are checksummed, never verified.
    pub fn dispatch(&mut self, bits: usize) -> Result<Reply, Discard> {
        if bits < MIN_FRAME_BITS {
            Err(Discard::Short { bits })?;
        }

        let opcode = Opcode::try_from(self.frame.opcode()).map_err(Discard::UnknownOpcode)?;

        match opcode.frame_bits() {
            None => Err(Discard::Unsupported(opcode))?,
            Some(expected) if expected != bits => Err(Discard::Length { opcode, bits })?,
            Some(_) => {}
        }

        match opcode {
            Opcode::Id | Opcode::Reset => Ok(Reply::identity(&IDENTITY)),
            Opcode::GbRead => self.read(),
            Opcode::GbWrite => Ok(self.write()),
            Opcode::Status | Opcode::Read | Opcode::Write => Err(Discard::Unsupported(opcode)),
        }
    }

    fn read(&self) -> Result<Reply, Discard> {
        let slot = match ReadChannel::try_from(self.frame.sub_opcode()) {
            Ok(ReadChannel::Status) => Slot::Status,
            Ok(ReadChannel::Link) => Slot::Link,
            Err(channel) => Err(Discard::UnknownChannel(channel))?,
        };

        Ok(Reply::slot(self.frame.slot(slot)))
    }

    fn write(&mut self) -> Reply {
        let reply = Reply::checksum(self.frame.seal(Slot::Send));

        match WriteAction::from(self.frame.sub_opcode()) {
            WriteAction::Initialize => {
                debug!("link session reset");
                self.frame.clear();
            }
            WriteAction::Configure => {
                self.frame.stage(Slot::Status, 0, STATUS_READY);
                self.frame.seal(Slot::Status);
            }
            WriteAction::LinkSend => {
                self.frame.stage(Slot::Link, LINK_COMPLETE_OFFSET, LINK_COMPLETE);
                self.frame.seal(Slot::Link);
            }
            WriteAction::Other(action) => {
                trace!("write action {=u8:#x} not staged", action);
            }
        }

        reply
    }

    /// Wait for one frame, answer it if it deserves an answer.
    pub async fn service(&mut self) -> Result<Reply, Discard> {
        let bits = self.transport.receive(&mut self.frame, MAX_FRAME_BITS).await;

        let outcome = self.dispatch(bits);

        match &outcome {
            Ok(reply) => self.transport.transmit(reply),
            Err(discard) => trace!("frame dropped: {}", discard),
        }

        outcome
    }

    pub async fn run(&mut self) {
        loop {
            // discards are already logged
            let _ = self.service().await;
        }
    }
}

/// Bring the hardware up and hand back a dispatcher
/// with an empty frame buffer.
pub fn bring_up<H: Hardware, T: Transport>(hardware: &mut H, transport: T) -> CommandDispatcher<T> {
    hardware.init();

    CommandDispatcher::new(transport)
}
