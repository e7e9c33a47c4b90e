//! GPIO pin abstractions
//!
//! Output lines used by the clock: one active-low chip select per tube
//! driver and the fix-status indicator.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Active-low select line
///
/// Wraps an output pin so callers speak in terms of asserting and
/// releasing a device rather than pin levels.
pub struct ActiveLow<P> {
    pin: P,
}

impl<P: OutputPin> ActiveLow<P> {
    /// Wrap a pin and drive it to the released (high) level
    pub fn new(mut pin: P) -> Self {
        pin.set_high();
        Self { pin }
    }

    /// Assert the line (drive low)
    pub fn assert(&mut self) {
        self.pin.set_low();
    }

    /// Release the line (drive high)
    pub fn release(&mut self) {
        self.pin.set_high();
    }

    /// Check whether the line is currently asserted
    pub fn is_asserted(&self) -> bool {
        self.pin.is_set_low()
    }

    /// Borrow the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }
}
