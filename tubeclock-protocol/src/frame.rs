//! Command frame encoding for the tube drivers.
//!
//! Frame format (fixed size for a given layout):
//! - OPCODE (1 byte): `CMD_UPDATE`, bit 0 set for the alternate addressing variant
//! - DIGITS (D bytes): digit intensity, halved, divided by the brightness scale, bit 7 set
//! - DOTS (S bytes): dot intensity, halved, bit 7 set
//! - LEDS (L bytes): LED intensity, halved, bit 7 set

use heapless::Vec;

/// Update-all command opcode
pub const CMD_UPDATE: u8 = 0xAA;

/// Opcode bit selecting the alternate digit addressing variant
pub const ALTERNATE_ADDRESSING: u8 = 0x01;

/// Framing marker carried by every data byte
pub const DATA_MARKER: u8 = 0x80;

/// Maximum digit + dot channels per tube
pub const MAX_TUBE_CHANNELS: usize = 12;

/// Maximum LED channels per tube
pub const MAX_LED_CHANNELS: usize = 3;

/// Maximum complete frame size (OPCODE + tube channels + LED channels)
pub const MAX_FRAME_SIZE: usize = 1 + MAX_TUBE_CHANNELS + MAX_LED_CHANNELS;

/// Errors that can occur while building frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Layout does not fit in `MAX_FRAME_SIZE`
    LayoutTooLarge,
    /// Layout has no digit channels
    NoDigits,
    /// Fewer intensity values supplied than the layout requires
    MissingChannels,
}

/// Channel counts of one tube driver's frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameLayout {
    digits: u8,
    dots: u8,
    leds: u8,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self::TUBE_DRIVER
    }
}

impl FrameLayout {
    /// Ten digit cathodes, two dots and one RGB LED (16-byte frames)
    pub const TUBE_DRIVER: Self = Self {
        digits: 10,
        dots: 2,
        leds: 3,
    };

    /// Create a layout, rejecting counts that do not fit a frame
    pub const fn new(digits: u8, dots: u8, leds: u8) -> Result<Self, FrameError> {
        if digits == 0 {
            return Err(FrameError::NoDigits);
        }
        if digits as usize + dots as usize > MAX_TUBE_CHANNELS
            || leds as usize > MAX_LED_CHANNELS
        {
            return Err(FrameError::LayoutTooLarge);
        }
        Ok(Self { digits, dots, leds })
    }

    /// Number of digit channels (D)
    pub const fn digits(&self) -> usize {
        self.digits as usize
    }

    /// Number of dot channels (S)
    pub const fn dots(&self) -> usize {
        self.dots as usize
    }

    /// Number of LED channels (L)
    pub const fn leds(&self) -> usize {
        self.leds as usize
    }

    /// Digit plus dot channels
    pub const fn tube_channels(&self) -> usize {
        self.digits() + self.dots()
    }

    /// Total frame size in bytes (1 + D + S + L)
    pub const fn size(&self) -> usize {
        1 + self.tube_channels() + self.leds()
    }

    /// Channel index lighting the given digit value
    ///
    /// Drivers order their cathodes 1, 2, ..., 9, 0, so digit `d` sits at
    /// `(d + D - 1) % D`. Returns `None` for values the tube cannot show.
    pub fn digit_channel(&self, digit: u8) -> Option<usize> {
        let digits = self.digits();
        let digit = digit as usize;
        if digit >= digits {
            return None;
        }
        Some((digit + digits - 1) % digits)
    }

    /// Channel index of the given dot
    pub fn dot_channel(&self, dot: u8) -> Option<usize> {
        if (dot as usize) < self.dots() {
            Some(self.digits() + dot as usize)
        } else {
            None
        }
    }
}

/// Which physical digit position the frame addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Addressing {
    #[default]
    Primary,
    Alternate,
}

impl Addressing {
    /// Opcode byte for this addressing variant
    pub const fn opcode(self) -> u8 {
        match self {
            Addressing::Primary => CMD_UPDATE,
            Addressing::Alternate => CMD_UPDATE | ALTERNATE_ADDRESSING,
        }
    }
}

/// Global divisor applied to digit intensities
///
/// Always finite and strictly positive. Values above 1.0 dim the tubes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BrightnessScale(f64);

impl Default for BrightnessScale {
    fn default() -> Self {
        Self::UNITY
    }
}

impl BrightnessScale {
    /// No scaling
    pub const UNITY: Self = Self(1.0);

    /// Create a scale, rejecting zero, negative and non-finite values
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value > 0.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Raw divisor
    pub const fn value(self) -> f64 {
        self.0
    }
}

/// Encode a brightness-scaled intensity byte
///
/// `((v >> 1) / scale)` truncated to 8 bits, with the data marker set.
/// Scales below 1.0 can push the quotient past 8 bits; the high bits are
/// dropped rather than saturated.
pub fn encode_scaled(raw: u8, scale: BrightnessScale) -> u8 {
    let halved = f64::from(raw >> 1);
    let scaled = (halved / scale.value()) as u32;
    (scaled as u8) | DATA_MARKER
}

/// Encode an unscaled intensity byte (dots and LEDs)
pub const fn encode_plain(raw: u8) -> u8 {
    (raw >> 1) | DATA_MARKER
}

/// A complete frame for one tube driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    bytes: Vec<u8, MAX_FRAME_SIZE>,
}

impl CommandFrame {
    /// Raw bytes to put on the wire
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Opcode byte
    pub fn opcode(&self) -> u8 {
        self.bytes.first().copied().unwrap_or(0)
    }

    /// Addressing variant encoded in the opcode
    pub fn addressing(&self) -> Addressing {
        if self.opcode() & ALTERNATE_ADDRESSING != 0 {
            Addressing::Alternate
        } else {
            Addressing::Primary
        }
    }
}

/// Serializes per-tube intensities into command frames
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameEncoder {
    layout: FrameLayout,
}

impl FrameEncoder {
    /// Create an encoder for a layout
    pub const fn new(layout: FrameLayout) -> Self {
        Self { layout }
    }

    /// Layout this encoder produces
    pub const fn layout(&self) -> FrameLayout {
        self.layout
    }

    /// Encode one tube's state
    ///
    /// `tube_channels` holds digit channels followed by dot channels,
    /// `leds` the LED channels. Extra trailing values are ignored.
    pub fn encode(
        &self,
        addressing: Addressing,
        tube_channels: &[u8],
        leds: &[u8],
        scale: BrightnessScale,
    ) -> Result<CommandFrame, FrameError> {
        let layout = self.layout;
        if tube_channels.len() < layout.tube_channels() || leds.len() < layout.leds() {
            return Err(FrameError::MissingChannels);
        }

        let mut bytes = Vec::new();
        let mut push = |byte: u8| bytes.push(byte).map_err(|_| FrameError::LayoutTooLarge);

        push(addressing.opcode())?;

        let (digits, rest) = tube_channels.split_at(layout.digits());
        for &level in digits {
            push(encode_scaled(level, scale))?;
        }
        for &level in &rest[..layout.dots()] {
            push(encode_plain(level))?;
        }
        for &level in &leds[..layout.leds()] {
            push(encode_plain(level))?;
        }

        Ok(CommandFrame { bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small_layout() -> FrameLayout {
        FrameLayout::new(7, 2, 3).unwrap()
    }

    #[test]
    fn test_layout_size() {
        assert_eq!(small_layout().size(), 13);
        assert_eq!(FrameLayout::TUBE_DRIVER.size(), 16);
        assert_eq!(FrameLayout::TUBE_DRIVER.size(), MAX_FRAME_SIZE);
    }

    #[test]
    fn test_layout_rejects_oversize() {
        assert_eq!(FrameLayout::new(11, 2, 3), Err(FrameError::LayoutTooLarge));
        assert_eq!(FrameLayout::new(10, 2, 4), Err(FrameError::LayoutTooLarge));
        assert_eq!(FrameLayout::new(0, 2, 3), Err(FrameError::NoDigits));
    }

    #[test]
    fn test_digit_channel_order() {
        let layout = FrameLayout::TUBE_DRIVER;
        assert_eq!(layout.digit_channel(1), Some(0));
        assert_eq!(layout.digit_channel(9), Some(8));
        assert_eq!(layout.digit_channel(0), Some(9));
        assert_eq!(layout.digit_channel(10), None);
        assert_eq!(layout.dot_channel(0), Some(10));
        assert_eq!(layout.dot_channel(1), Some(11));
        assert_eq!(layout.dot_channel(2), None);
    }

    #[test]
    fn test_steady_frame() {
        let encoder = FrameEncoder::new(small_layout());
        let channels = [200u8; 9];
        let leds = [200u8; 3];

        let frame = encoder
            .encode(Addressing::Primary, &channels, &leds, BrightnessScale::UNITY)
            .unwrap();

        assert_eq!(frame.as_bytes().len(), 13);
        assert_eq!(frame.opcode(), CMD_UPDATE);
        for &byte in &frame.as_bytes()[1..] {
            assert_eq!(byte, 0xE4);
        }
    }

    #[test]
    fn test_alternate_addressing_opcode() {
        let encoder = FrameEncoder::new(small_layout());
        let frame = encoder
            .encode(Addressing::Alternate, &[0; 9], &[0; 3], BrightnessScale::UNITY)
            .unwrap();

        assert_eq!(frame.opcode(), CMD_UPDATE | 0x01);
        assert_eq!(frame.addressing(), Addressing::Alternate);
        // Zero intensity still carries the marker
        assert!(frame.as_bytes()[1..].iter().all(|&b| b == DATA_MARKER));
    }

    #[test]
    fn test_scale_applies_to_digits_only() {
        let encoder = FrameEncoder::new(small_layout());
        let scale = BrightnessScale::new(2.0).unwrap();
        let frame = encoder
            .encode(Addressing::Primary, &[200; 9], &[255; 3], scale)
            .unwrap();
        let bytes = frame.as_bytes();

        // digits: (100 / 2) | 0x80
        assert!(bytes[1..8].iter().all(|&b| b == 0xB2));
        // dots: unscaled
        assert!(bytes[8..10].iter().all(|&b| b == 0xE4));
        // LEDs: 127 | 0x80
        assert!(bytes[10..13].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_missing_channels() {
        let encoder = FrameEncoder::new(small_layout());
        assert_eq!(
            encoder.encode(Addressing::Primary, &[0; 8], &[0; 3], BrightnessScale::UNITY),
            Err(FrameError::MissingChannels)
        );
        assert_eq!(
            encoder.encode(Addressing::Primary, &[0; 9], &[0; 2], BrightnessScale::UNITY),
            Err(FrameError::MissingChannels)
        );
    }

    #[test]
    fn test_scaled_truncates_not_saturates() {
        // 127 / 0.25 = 508 = 0x1FC, low byte 0xFC
        let scale = BrightnessScale::new(0.25).unwrap();
        assert_eq!(encode_scaled(255, scale), 0xFC);
    }

    #[test]
    fn test_brightness_scale_validation() {
        assert!(BrightnessScale::new(0.0).is_none());
        assert!(BrightnessScale::new(-1.0).is_none());
        assert!(BrightnessScale::new(f64::NAN).is_none());
        assert!(BrightnessScale::new(f64::INFINITY).is_none());
        assert_eq!(BrightnessScale::new(1.5).map(|s| s.value()), Some(1.5));
    }

    proptest! {
        #[test]
        fn prop_scaled_byte_matches_formula(v in any::<u8>(), s in 0.01f64..=4.0) {
            let scale = BrightnessScale::new(s).unwrap();
            let encoded = encode_scaled(v, scale);
            let expected = ((f64::from(v >> 1) / s) as u32 as u8) | 0x80;
            prop_assert_eq!(encoded, expected);
            prop_assert!(encoded & DATA_MARKER != 0);
        }

        #[test]
        fn prop_dimming_never_brightens(v in any::<u8>(), s in 1.0f64..=4.0) {
            let scale = BrightnessScale::new(s).unwrap();
            prop_assert!(encode_scaled(v, scale) & 0x7F <= v >> 1);
        }

        #[test]
        fn prop_plain_byte_marked(v in any::<u8>()) {
            let encoded = encode_plain(v);
            prop_assert_eq!(encoded, (v >> 1) | 0x80);
            prop_assert_eq!(encoded, encode_scaled(v, BrightnessScale::UNITY));
        }
    }
}
