/// Serialized length of an [`Identity`].
pub const IDENTITY_LEN: usize = 3;

/// The record a device answers enumeration with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity {
    pub device_type: u16,
    pub status: u8,
}

/// Printer cable, status at reset.
pub const IDENTITY: Identity = Identity {
    device_type: 0x0300,
    status: 0x00,
};

impl Identity {
    /// Little endian device type, then status.
    pub const fn encode(&self) -> [u8; IDENTITY_LEN] {
        let [lo, hi] = self.device_type.to_le_bytes();

        [lo, hi, self.status]
    }

    pub const fn decode(bytes: [u8; IDENTITY_LEN]) -> Self {
        let [lo, hi, status] = bytes;

        Self {
            device_type: u16::from_le_bytes([lo, hi]),
            status,
        }
    }
}
