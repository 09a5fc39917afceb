//! One-time bring-up of the console side hardware.

use heapless::Vec;

/// Bring-up steps, in the order [`Hardware::init`] runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    ResetState,
    EnableInterrupts,
    ConfigureSerial,
    ConfigureTimers,
    QuietAudio,
    Halt,
}

/// Register level access to the device.
///
/// After `init` returns the transport is expected to be
/// ready to capture and send frames on its own.
pub trait Hardware {
    /// Reset volatile device state.
    fn reset_state(&mut self);
    /// Enable the serial and both timer interrupt sources.
    fn enable_interrupts(&mut self);
    /// Put the serial port in general purpose bit mode with
    /// edge triggered notification.
    fn configure_serial(&mut self);
    /// Start the free running reference timer and its cascade.
    fn configure_timers(&mut self);
    /// Quiet the audio output.
    fn quiet_audio(&mut self);
    /// Sleep until the next interrupt.
    fn halt(&mut self);

    fn init(&mut self) {
        self.reset_state();
        self.enable_interrupts();
        self.configure_serial();
        self.configure_timers();
        self.quiet_audio();
        self.halt();
    }
}

/// Records bring-up instead of touching registers.
#[derive(Debug, Default)]
pub struct SimulatedHardware {
    steps: Vec<Step, 16>,
}

impl SimulatedHardware {
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Every step run so far, oldest first.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn record(&mut self, step: Step) {
        if self.steps.push(step).is_err() {
            warn!("bring-up log full");
        }
    }
}

impl Hardware for SimulatedHardware {
    fn reset_state(&mut self) {
        self.record(Step::ResetState);
    }

    fn enable_interrupts(&mut self) {
        self.record(Step::EnableInterrupts);
    }

    fn configure_serial(&mut self) {
        self.record(Step::ConfigureSerial);
    }

    fn configure_timers(&mut self) {
        self.record(Step::ConfigureTimers);
    }

    fn quiet_audio(&mut self) {
        self.record(Step::QuietAudio);
    }

    fn halt(&mut self) {
        self.record(Step::Halt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_order() {
        let mut hw = SimulatedHardware::new();

        hw.init();

        assert_eq!(
            &[
                Step::ResetState,
                Step::EnableInterrupts,
                Step::ConfigureSerial,
                Step::ConfigureTimers,
                Step::QuietAudio,
                Step::Halt,
            ],
            hw.steps()
        );
    }
}
