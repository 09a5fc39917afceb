//! Register level bring-up of the handheld.

use core::{arch::asm, ptr::write_volatile};

use sio_relay::Hardware;

mod reg {
    pub const TM0CNT_L: *mut u16 = 0x0400_0100 as _;
    pub const TM0CNT_H: *mut u16 = 0x0400_0102 as _;
    pub const TM1CNT_H: *mut u16 = 0x0400_0106 as _;
    pub const RCNT: *mut u16 = 0x0400_0134 as _;
    pub const IE: *mut u16 = 0x0400_0200 as _;
    pub const IF: *mut u16 = 0x0400_0202 as _;
}

const IRQ_TIMER0: u16 = 1 << 3;
const IRQ_TIMER1: u16 = 1 << 4;
const IRQ_SERIAL: u16 = 1 << 7;

const RCNT_GPIO: u16 = 0x8000;
const RCNT_SI_IRQ: u16 = 0x0100;
const RCNT_SO_OUTPUT: u16 = 0x0080;
const RCNT_SO_HIGH: u16 = 0x0008;

const TIMER_CASCADE: u16 = 0x0004;
const TIMER_IRQ: u16 = 0x0040;
const TIMER_START: u16 = 0x0080;

/// Reference timer reload, one overflow per bit period.
const TM0_RELOAD: i16 = -67;

/// Clear SIO, sound and every other register block.
const RESET_ALL_REGISTERS: u32 = 0x20 | 0x40 | 0x80;

pub struct Console {
    _private: (),
}

impl Console {
    /// # Safety
    ///
    /// Only one instance may drive the registers.
    pub const unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

// BIOS calls take their number from the thumb `swi` comment field
// and may clobber any caller saved register.

fn register_ram_reset(flags: u32) {
    // SAFETY: BIOS call, touches only the register blocks named by `flags`
    unsafe {
        asm!(
            "swi #0x01",
            inout("r0") flags => _,
            clobber_abi("C"),
        )
    };
}

fn sound_bias(level: u32) {
    // SAFETY: BIOS call, ramps SOUNDBIAS only
    unsafe {
        asm!(
            "swi #0x19",
            inout("r0") level => _,
            clobber_abi("C"),
        )
    };
}

impl Hardware for Console {
    fn reset_state(&mut self) {
        register_ram_reset(RESET_ALL_REGISTERS);
    }

    fn enable_interrupts(&mut self) {
        // SAFETY: fixed, aligned I/O registers
        unsafe {
            write_volatile(reg::IE, IRQ_SERIAL | IRQ_TIMER1 | IRQ_TIMER0);
            // acknowledge anything already pending
            write_volatile(reg::IF, reg::IF.read_volatile());
        }
    }

    fn configure_serial(&mut self) {
        // SAFETY: fixed, aligned I/O register
        unsafe {
            write_volatile(
                reg::RCNT,
                RCNT_GPIO | RCNT_SI_IRQ | RCNT_SO_OUTPUT | RCNT_SO_HIGH,
            )
        };
    }

    fn configure_timers(&mut self) {
        // SAFETY: fixed, aligned I/O registers
        unsafe {
            write_volatile(reg::TM0CNT_L, TM0_RELOAD as u16);
            write_volatile(reg::TM1CNT_H, TIMER_START | TIMER_IRQ | TIMER_CASCADE);
            write_volatile(reg::TM0CNT_H, TIMER_START);
        }
    }

    fn quiet_audio(&mut self) {
        sound_bias(0);
    }

    fn halt(&mut self) {
        // SAFETY: BIOS call, returns on the next enabled interrupt
        unsafe {
            asm!(
                "swi #0x02",
                clobber_abi("C"),
            )
        };
    }
}
