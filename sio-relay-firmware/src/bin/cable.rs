#![no_std]
#![no_main]

use panic_halt as _;

use sio_relay::{bring_up, Hardware};
use sio_relay_firmware::{console::Console, sio::SerialDriver};

#[no_mangle]
pub extern "C" fn main() -> ! {
    // SAFETY: nothing else touches the registers or the SIO handlers
    let (mut console, driver) = unsafe { (Console::steal(), SerialDriver::take()) };

    let mut dispatcher = bring_up(&mut console, driver);

    embassy_futures::block_on(dispatcher.run());

    loop {
        console.halt();
    }
}
