//! Command engine of a serial-port printer cable that
//! tunnels a link-cable session to an attached peripheral.

#![no_std]

#[macro_use]
mod fmt;

pub mod command;
pub mod crc;
pub mod dispatcher;
pub mod frame;
pub mod hardware;
pub mod identity;
pub mod transport;

pub use dispatcher::{bring_up, error::Discard, CommandDispatcher};
pub use frame::{FrameBuffer, Slot};
pub use hardware::Hardware;
pub use identity::{Identity, IDENTITY};
pub use transport::{Reply, Transport};
