//! Output pins

use embassy_rp::gpio::Output;
use tubeclock_hal::OutputPin;

/// Push-pull output implementing the shared pin trait
pub struct PushPull<'d> {
    output: Output<'d>,
}

impl<'d> PushPull<'d> {
    pub fn new(output: Output<'d>) -> Self {
        Self { output }
    }
}

impl OutputPin for PushPull<'_> {
    fn set_high(&mut self) {
        self.output.set_high();
    }

    fn set_low(&mut self) {
        self.output.set_low();
    }

    fn toggle(&mut self) {
        self.output.toggle();
    }

    fn is_set_high(&self) -> bool {
        self.output.is_set_high()
    }
}
