//! Simple TOML parser for clock configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `clock.toml`. It does NOT support the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - [section] headers
//! - Inline integer arrays: end_digits = [0, 0, 2, 0, 2, 0]
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings or arrays
//! - Datetime values
//! - Inline tables
//! - Dotted keys
//! - Underscores in numbers

use crate::animation::{DisplayMode, EndDigit, TransitionPolicy};
use crate::tube::TUBE_COUNT;

use super::types::ClockConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    MalformedLine,
    /// Key not valid in its section
    UnknownKey,
    /// Invalid value type or out of range
    InvalidValue,
    /// Digit/dot/LED counts do not fit a frame
    InvalidLayout,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Timing,
    Spi,
    Time,
}

/// Transition kind before its frame count is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionKind {
    Cut,
    Crossfade,
    FadeOutIn,
}

/// Parse TOML configuration into ClockConfig
///
/// Keys that are not present keep their defaults.
pub fn parse_config(input: &str) -> Result<ClockConfig, ParseError> {
    let mut config = ClockConfig::default();
    let mut section = Section::Root;

    let (mut kind, mut frames) = match config.display.transition {
        TransitionPolicy::Cut => (TransitionKind::Cut, 0),
        TransitionPolicy::Crossfade { frames } => (TransitionKind::Crossfade, frames),
        TransitionPolicy::FadeOutIn { frames } => (TransitionKind::FadeOutIn, frames),
    };

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::MalformedLine)?;

        match (section, key) {
            (Section::Display, "transition") => kind = parse_transition_kind(value)?,
            (Section::Display, "transition_frames") => frames = parse_int(value)?,
            _ => apply_value(section, key, value, &mut config)?,
        }
    }

    config.display.transition = match kind {
        TransitionKind::Cut => TransitionPolicy::Cut,
        TransitionKind::Crossfade => TransitionPolicy::Crossfade { frames },
        TransitionKind::FadeOutIn => TransitionPolicy::FadeOutIn { frames },
    };

    config
        .display
        .layout
        .frame_layout()
        .map_err(|_| ParseError::InvalidLayout)?;

    Ok(config)
}

/// Parse a `[name]` header line
fn parse_section_header(line: &str) -> Result<Section, ParseError> {
    let name = line
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or(ParseError::InvalidSection)?;

    match name.trim() {
        "display" => Ok(Section::Display),
        "timing" => Ok(Section::Timing),
        "spi" => Ok(Section::Spi),
        "time" => Ok(Section::Time),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a float value; integers are accepted
fn parse_float(value: &str) -> Result<f64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_transition_kind(value: &str) -> Result<TransitionKind, ParseError> {
    match parse_string(value) {
        "cut" => Ok(TransitionKind::Cut),
        "crossfade" => Ok(TransitionKind::Crossfade),
        "fade_out_in" => Ok(TransitionKind::FadeOutIn),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a display mode by name or persisted number
fn parse_mode(value: &str) -> Result<DisplayMode, ParseError> {
    match parse_string(value) {
        "plain" => Ok(DisplayMode::Plain),
        "fix_status" => Ok(DisplayMode::FixStatus),
        "breathe" => Ok(DisplayMode::Breathe),
        "cut" => Ok(DisplayMode::Cut),
        other => {
            let n: u8 = parse_int(other)?;
            if n < DisplayMode::COUNT {
                Ok(DisplayMode::from_persisted(n))
            } else {
                Err(ParseError::InvalidValue)
            }
        }
    }
}

/// Parse `[a, b, c, d, e, f]` into per-tube end-digit markers
fn parse_end_digits(value: &str) -> Result<[EndDigit; TUBE_COUNT], ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut out = [EndDigit::Digit0; TUBE_COUNT];
    let mut count = 0;
    for item in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let slot = out.get_mut(count).ok_or(ParseError::InvalidValue)?;
        let position: u8 = parse_int(item)?;
        *slot = EndDigit::from_position(position).ok_or(ParseError::InvalidValue)?;
        count += 1;
    }

    if count != TUBE_COUNT {
        return Err(ParseError::InvalidValue);
    }
    Ok(out)
}

/// Apply one key to the config
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut ClockConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => return Err(ParseError::UnknownKey),
        Section::Display => {
            let display = &mut config.display;
            match key {
                "digits" => display.layout.digits = parse_int(value)?,
                "dots" => display.layout.dots = parse_int(value)?,
                "leds" => display.layout.leds = parse_int(value)?,
                "end_digits" => display.end_digits = parse_end_digits(value)?,
                "mode" => display.mode = parse_mode(value)?,
                "brightness" => {
                    let brightness = parse_float(value)?;
                    if !(brightness.is_finite() && brightness > 0.0) {
                        return Err(ParseError::InvalidValue);
                    }
                    display.brightness = brightness;
                }
                "lamp_test" => display.lamp_test = parse_bool(value)?,
                "lamp_test_level" => display.lamp_test_level = parse_int(value)?,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Timing => {
            let timing = &mut config.timing;
            let field = match key {
                "render_period_ms" => &mut timing.render_period_ms,
                "dispatch_period_ms" => &mut timing.dispatch_period_ms,
                "ambient_period_ms" => &mut timing.ambient_period_ms,
                "lamp_test_ms" => &mut timing.lamp_test_ms,
                _ => return Err(ParseError::UnknownKey),
            };
            let period: u32 = parse_int(value)?;
            if period == 0 && key != "lamp_test_ms" {
                return Err(ParseError::InvalidValue);
            }
            *field = period;
        }
        Section::Spi => match key {
            "frequency" => config.spi.frequency = parse_int(value)?,
            "timeout_ms" => config.spi.timeout_ms = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Time => match key {
            "utc_offset_minutes" => {
                let offset: i16 = parse_int(value)?;
                // UTC-12:00 to UTC+14:00
                if !(-720..=840).contains(&offset) {
                    return Err(ParseError::InvalidValue);
                }
                config.time.utc_offset_minutes = offset;
            }
            "initial_time" => config.time.initial_time = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        assert_eq!(parse_config(""), Ok(ClockConfig::default()));
        assert_eq!(parse_config("# just a comment\n\n"), Ok(ClockConfig::default()));
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
# Six-tube clock
[display]
digits = 10
dots = 2
leds = 3
transition = "fade_out_in"
transition_frames = 30   # half a second
end_digits = [0, 0, 2, 0, 3, 1]
mode = "breathe"
brightness = 1.5
lamp_test = false
lamp_test_level = 128

[timing]
render_period_ms = 20
dispatch_period_ms = 50

[spi]
frequency = 2000000
timeout_ms = 3

[time]
utc_offset_minutes = -300
initial_time = 1700000000
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(
            config.display.transition,
            TransitionPolicy::FadeOutIn { frames: 30 }
        );
        assert_eq!(config.display.end_digits[2], EndDigit::Digit2);
        assert_eq!(config.display.end_digits[4], EndDigit::Digit3);
        assert_eq!(config.display.end_digits[5], EndDigit::Digit1);
        assert_eq!(config.display.mode, DisplayMode::Breathe);
        assert_eq!(config.display.brightness, 1.5);
        assert!(!config.display.lamp_test);
        assert_eq!(config.display.lamp_test_level, 128);
        assert_eq!(config.timing.render_period_ms, 20);
        assert_eq!(config.timing.dispatch_period_ms, 50);
        assert_eq!(config.timing.ambient_period_ms, 500);
        assert_eq!(config.spi.frequency, 2_000_000);
        assert_eq!(config.spi.timeout_ms, 3);
        assert_eq!(config.time.utc_offset_minutes, -300);
        assert_eq!(config.time.initial_time, 1_700_000_000);
    }

    #[test]
    fn test_transition_order_independent() {
        let config = parse_config("[display]\ntransition_frames = 8\ntransition = \"crossfade\"\n").unwrap();
        assert_eq!(config.display.transition, TransitionPolicy::Crossfade { frames: 8 });

        let config = parse_config("[display]\ntransition = \"cut\"\n").unwrap();
        assert_eq!(config.display.transition, TransitionPolicy::Cut);
    }

    #[test]
    fn test_mode_by_number() {
        let config = parse_config("[display]\nmode = 1\n").unwrap();
        assert_eq!(config.display.mode, DisplayMode::FixStatus);
        assert_eq!(
            parse_config("[display]\nmode = 4\n"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert_eq!(
            parse_config("[display]\ncolour = 3\n"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(parse_config("digits = 10\n"), Err(ParseError::UnknownKey));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(parse_config("[gps]\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[display\n"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[display]\ndigits\n"), Err(ParseError::MalformedLine));
        assert_eq!(
            parse_config("[display]\nbrightness = 0\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[timing]\nrender_period_ms = 0\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[time]\nutc_offset_minutes = 900\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_config("[display]\ndigits = 11\ndots = 2\n"),
            Err(ParseError::InvalidLayout)
        );
    }

    #[test]
    fn test_parse_end_digits() {
        assert_eq!(
            parse_end_digits("[0,1,2,3,0,1]").unwrap()[3],
            EndDigit::Digit3
        );
        assert_eq!(parse_end_digits("[0, 1]"), Err(ParseError::InvalidValue));
        assert_eq!(
            parse_end_digits("[0, 0, 0, 0, 0, 0, 0]"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_end_digits("[0, 0, 0, 0, 0, 4]"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(parse_end_digits("0, 0"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("1"), Err(ParseError::InvalidValue));
        assert_eq!(parse_bool("\"true\""), Err(ParseError::InvalidValue));

        assert!(parse_config("[display]\nlamp_test = true\n").unwrap().display.lamp_test);
        assert_eq!(
            parse_config("[display]\nlamp_test = yes\n"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(parse_string("\"cut\""), "cut");
        assert_eq!(parse_string("cut"), "cut");
    }
}
