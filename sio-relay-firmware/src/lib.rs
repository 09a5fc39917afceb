//! Device side of the cable: register bring-up and the
//! binding to the interrupt driven SIO bit shifter.

#![no_std]

#[cfg(target_arch = "arm")]
pub mod console;
pub mod sio;
