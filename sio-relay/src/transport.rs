//! The boundary to the bit-level SIO driver.

use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Receiver, Sender},
};
use heapless::Vec;

use crate::{
    crc::WINDOW_LEN,
    frame::{FrameBuffer, FRAME_LEN, SLOT_LEN},
    identity::Identity,
};

/// Longest reply any command produces.
pub const MAX_REPLY_LEN: usize = SLOT_LEN;

/// A reply, captured by value before it is handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reply {
    buf: [u8; MAX_REPLY_LEN],
    len: usize,
}

impl Reply {
    pub const fn identity(identity: &Identity) -> Self {
        let [a, b, c] = identity.encode();
        let mut buf = [0; MAX_REPLY_LEN];

        buf[0] = a;
        buf[1] = b;
        buf[2] = c;

        Self { buf, len: 3 }
    }

    pub const fn checksum(crc: u8) -> Self {
        let mut buf = [0; MAX_REPLY_LEN];
        buf[0] = crc;

        Self { buf, len: 1 }
    }

    /// A staged window and its checksum.
    ///
    /// Short slices are zero padded.
    pub fn slot(slot: &[u8]) -> Self {
        let mut buf = [0; MAX_REPLY_LEN];

        buf.iter_mut().zip(slot).for_each(|(dst, src)| *dst = *src);

        Self {
            buf,
            len: MAX_REPLY_LEN,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Length on the wire. Replies carry no stop bit.
    #[inline]
    pub fn bits(&self) -> usize {
        self.len * 8
    }
}

const _: () = assert!(MAX_REPLY_LEN == WINDOW_LEN + 1);

/// Moves frames between the bus and the frame buffer.
///
/// The transport only touches the frame buffer while
/// `receive` holds it.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Wait for the next inbound frame, capture it into `frame` and
    /// return its length in bits. At most `max_bits` are captured.
    async fn receive(&mut self, frame: &mut FrameBuffer, max_bits: usize) -> usize;

    /// Queue a reply for the bus to clock out.
    fn transmit(&mut self, reply: &Reply);
}

/// An inbound frame for [`SimulatedSio`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimFrame {
    pub bytes: Vec<u8, FRAME_LEN>,
    pub bits: usize,
}

impl SimFrame {
    /// A frame of `bits` bits carrying `bytes`.
    ///
    /// Bytes past the frame buffer are dropped.
    pub fn new(bytes: &[u8], bits: usize) -> Self {
        let bytes = &bytes[..bytes.len().min(FRAME_LEN)];

        Self {
            bytes: Vec::from_slice(bytes).unwrap_or_default(),
            bits,
        }
    }

    /// A well formed frame: every byte plus the stop bit.
    pub fn command(bytes: &[u8]) -> Self {
        Self::new(bytes, bytes.len() * 8 + 1)
    }
}

/// An in-memory bus, fed and drained over channels.
pub struct SimulatedSio<'a, M: RawMutex, const N: usize> {
    inbound: Receiver<'a, M, SimFrame, N>,
    outbound: Sender<'a, M, Reply, N>,
}

impl<'a, M: RawMutex, const N: usize> SimulatedSio<'a, M, N> {
    pub const fn new(inbound: Receiver<'a, M, SimFrame, N>, outbound: Sender<'a, M, Reply, N>) -> Self {
        Self { inbound, outbound }
    }
}

impl<'a, M: RawMutex, const N: usize> Transport for SimulatedSio<'a, M, N> {
    async fn receive(&mut self, frame: &mut FrameBuffer, max_bits: usize) -> usize {
        let inbound = self.inbound.receive().await;
        let bits = inbound.bits.min(max_bits);

        // only whole bytes are latched, the stop bit is not stored
        let bytes = inbound.bytes.iter().take(bits / 8);
        if frame.ingest(bytes).is_err() {
            warn!("simulated frame truncated to buffer");
        }

        bits
    }

    fn transmit(&mut self, reply: &Reply) {
        if self.outbound.try_send(*reply).is_err() {
            warn!("reply queue full, {} bits dropped", reply.bits());
        }
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;
    use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};

    use super::*;
    use crate::identity::IDENTITY;

    mod reply {
        use super::*;

        #[test]
        fn identity() {
            let reply = Reply::identity(&IDENTITY);

            assert_eq!(&[0x00, 0x03, 0x00], reply.as_bytes());
            assert_eq!(24, reply.bits());
        }

        #[test]
        fn checksum() {
            let reply = Reply::checksum(0x5a);

            assert_eq!(&[0x5a], reply.as_bytes());
            assert_eq!(8, reply.bits());
        }

        #[test]
        fn slot() {
            let bytes = [0x11; SLOT_LEN];
            let reply = Reply::slot(&bytes);

            assert_eq!(&bytes, reply.as_bytes());
            assert_eq!(264, reply.bits());
        }
    }

    mod simulated {
        use super::*;

        #[test]
        fn receive_latches_whole_bytes() {
            let inbound = Channel::<NoopRawMutex, SimFrame, 2>::new();
            let outbound = Channel::<NoopRawMutex, Reply, 2>::new();
            let mut sio = SimulatedSio::new(inbound.receiver(), outbound.sender());
            let mut frame = FrameBuffer::new();

            frame.as_bytes_mut()[1] = 0xee;
            inbound.try_send(SimFrame::new(&[0x13, 0xf0], 9)).unwrap();

            assert_eq!(9, block_on(sio.receive(&mut frame, 1025)));
            assert_eq!(0x13, frame.opcode());
            // only one byte fits in nine bits
            assert_eq!(0xee, frame.sub_opcode());
        }

        #[test]
        fn receive_clamps_length() {
            let inbound = Channel::<NoopRawMutex, SimFrame, 2>::new();
            let outbound = Channel::<NoopRawMutex, Reply, 2>::new();
            let mut sio = SimulatedSio::new(inbound.receiver(), outbound.sender());
            let mut frame = FrameBuffer::new();

            inbound.try_send(SimFrame::command(&[0x14; 3])).unwrap();

            assert_eq!(17, block_on(sio.receive(&mut frame, 17)));
            assert_eq!(&[0x14, 0x14, 0x00], &frame.as_bytes()[..3]);
        }

        #[test]
        fn transmit_drops_when_full() {
            let inbound = Channel::<NoopRawMutex, SimFrame, 1>::new();
            let outbound = Channel::<NoopRawMutex, Reply, 1>::new();
            let mut sio = SimulatedSio::new(inbound.receiver(), outbound.sender());

            sio.transmit(&Reply::checksum(1));
            sio.transmit(&Reply::checksum(2));

            assert_eq!(Some(Reply::checksum(1)), outbound.try_receive().ok());
            assert!(outbound.try_receive().is_err());
        }
    }
}
