//! Brightness input

/// Source of the global brightness divisor
///
/// Read once per render cycle, after all tubes have been sent; the value
/// applies to the next cycle. Implementations return the raw divisor and
/// the renderer rejects anything that is not finite and positive.
pub trait BrightnessSource {
    /// Current brightness divisor
    fn brightness(&mut self) -> f64;
}

/// Fixed brightness
impl BrightnessSource for f64 {
    fn brightness(&mut self) -> f64 {
        *self
    }
}
