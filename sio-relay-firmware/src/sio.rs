use core::ffi::{c_int, c_uint, c_void};

use sio_relay::{command::MAX_FRAME_BITS, FrameBuffer, Reply, Transport};

// Provided by the SIO interrupt handlers linked into the image.
extern "C" {
    /// Sleep until a complete frame has been shifted into `buf`,
    /// returning its length in bits.
    fn SIGetCommand(buf: *mut c_void, bits: c_uint) -> c_int;
    /// Arm the shifter to clock `bits` bits out of `buf` on the
    /// next poll. The buffer is read while the reply is on the wire.
    fn SISetResponse(buf: *const c_void, bits: c_uint);
}

/// The interrupt driven SIO driver.
pub struct SerialDriver {
    // read by the shifter after `transmit` returns
    staged: Reply,
}

impl SerialDriver {
    /// # Safety
    ///
    /// The driver owns the SIO interrupt handlers,
    /// only one instance may exist.
    pub const unsafe fn take() -> Self {
        Self {
            staged: Reply::checksum(0),
        }
    }
}

impl Transport for SerialDriver {
    async fn receive(&mut self, frame: &mut FrameBuffer, max_bits: usize) -> usize {
        let max_bits = max_bits.min(MAX_FRAME_BITS) as c_uint;

        // SAFETY:
        // 1. `frame` is exclusively borrowed for the duration of the call
        // 2. the shifter stores at most one frame buffer of bytes,
        //    the stop bit is not stored
        let bits = unsafe { SIGetCommand(frame.as_bytes_mut().as_mut_ptr().cast(), max_bits) };

        usize::try_from(bits).unwrap_or(0)
    }

    fn transmit(&mut self, reply: &Reply) {
        self.staged = *reply;

        // SAFETY: `staged` lives as long as the driver and is only
        // rewritten by the next transmit, which follows the next
        // received frame, by which point this reply is off the wire.
        unsafe {
            SISetResponse(
                self.staged.as_bytes().as_ptr().cast(),
                self.staged.bits() as c_uint,
            )
        };
    }
}
