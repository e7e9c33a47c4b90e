//! Build script for tubeclock-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates clock.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sections the firmware's parser understands, with their keys
const SECTIONS: &[(&str, &[&str])] = &[
    (
        "display",
        &[
            "digits",
            "dots",
            "leds",
            "transition",
            "transition_frames",
            "end_digits",
            "mode",
            "brightness",
            "lamp_test",
            "lamp_test_level",
        ],
    ),
    (
        "timing",
        &[
            "render_period_ms",
            "dispatch_period_ms",
            "ambient_period_ms",
            "lamp_test_ms",
        ],
    ),
    ("spi", &["frequency", "timeout_ms"]),
    ("time", &["utc_offset_minutes", "initial_time"]),
];

const TUBE_COUNT: usize = 6;
const MAX_TUBE_CHANNELS: i64 = 12;
const MAX_LED_CHANNELS: i64 = 3;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate clock.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=clock.toml");

    let config_path = Path::new("clock.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: clock.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a clock.toml configuration file.            ║\n\
            ║  Please create one in the tubeclock-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read clock.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in clock.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_keys(&config);
    validate_display(&config);
    validate_timing(&config);
    validate_time(&config);

    println!("cargo:warning=clock.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build with a boxed list of errors
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Reject sections and keys the firmware parser would refuse
fn validate_keys(config: &toml::Value) {
    let mut errors = Vec::new();

    let Some(root) = config.as_table() else {
        return;
    };

    for (name, section) in root {
        let Some((_, keys)) = SECTIONS.iter().find(|(s, _)| s == name) else {
            errors.push(format!("Unknown section [{}]", name));
            continue;
        };
        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }

    report("Unknown configuration in clock.toml", &errors);
}

/// Check an optional integer field against a range
fn check_range(
    errors: &mut Vec<String>,
    table: &toml::Table,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
) {
    match table.get(key) {
        None => {}
        Some(toml::Value::Integer(n)) if (min..=max).contains(n) => {}
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

/// Validate the display section
fn validate_display(config: &toml::Value) {
    let Some(display) = config.get("display").and_then(|d| d.as_table()) else {
        return;
    };

    let mut errors = Vec::new();

    check_range(&mut errors, display, "display", "digits", 1, MAX_TUBE_CHANNELS);
    check_range(&mut errors, display, "display", "dots", 0, MAX_TUBE_CHANNELS);
    check_range(&mut errors, display, "display", "leds", 0, MAX_LED_CHANNELS);
    check_range(&mut errors, display, "display", "transition_frames", 0, 65535);
    check_range(&mut errors, display, "display", "lamp_test_level", 0, 255);

    if display.get("lamp_test").is_some_and(|v| !v.is_bool()) {
        errors.push("[display] lamp_test must be true or false".to_string());
    }

    let digits = display.get("digits").and_then(|v| v.as_integer()).unwrap_or(10);
    let dots = display.get("dots").and_then(|v| v.as_integer()).unwrap_or(2);
    if digits + dots > MAX_TUBE_CHANNELS {
        errors.push(format!(
            "[display] digits + dots must not exceed {}",
            MAX_TUBE_CHANNELS
        ));
    }

    if let Some(value) = display.get("transition") {
        match value.as_str() {
            Some("cut" | "crossfade" | "fade_out_in") => {}
            _ => errors.push(
                "[display] transition must be 'cut', 'crossfade', or 'fade_out_in'".to_string(),
            ),
        }
    }

    if let Some(value) = display.get("mode") {
        let ok = match value {
            toml::Value::String(s) => {
                ["plain", "fix_status", "breathe", "cut"].contains(&s.as_str())
            }
            toml::Value::Integer(n) => (0..4).contains(n),
            _ => false,
        };
        if !ok {
            errors.push("[display] mode must be a mode name or 0-3".to_string());
        }
    }

    match display.get("end_digits") {
        None => {}
        Some(toml::Value::Array(items)) => {
            if items.len() != TUBE_COUNT {
                errors.push(format!("[display] end_digits needs {} entries", TUBE_COUNT));
            }
            for (i, item) in items.iter().enumerate() {
                if !matches!(item.as_integer(), Some(0..=3)) {
                    errors.push(format!("[display] end_digits[{}] must be 0-3", i));
                }
            }
        }
        Some(_) => errors.push("[display] end_digits must be an array".to_string()),
    }

    if let Some(value) = display.get("brightness") {
        let brightness = match value {
            toml::Value::Float(f) => Some(*f),
            toml::Value::Integer(n) => Some(*n as f64),
            _ => None,
        };
        if !matches!(brightness, Some(b) if b.is_finite() && b > 0.0) {
            errors.push("[display] brightness must be a positive number".to_string());
        }
    }

    report("Invalid display configuration", &errors);
}

/// Validate the timing section
fn validate_timing(config: &toml::Value) {
    let Some(timing) = config.get("timing").and_then(|t| t.as_table()) else {
        return;
    };

    let mut errors = Vec::new();

    for key in ["render_period_ms", "dispatch_period_ms", "ambient_period_ms"] {
        check_range(&mut errors, timing, "timing", key, 1, u32::MAX as i64);
    }
    check_range(&mut errors, timing, "timing", "lamp_test_ms", 0, u32::MAX as i64);

    report("Invalid timing configuration", &errors);
}

/// Validate the time section
fn validate_time(config: &toml::Value) {
    let Some(time) = config.get("time").and_then(|t| t.as_table()) else {
        return;
    };

    let mut errors = Vec::new();

    // UTC-12:00 to UTC+14:00
    check_range(&mut errors, time, "time", "utc_offset_minutes", -720, 840);

    report("Invalid time configuration", &errors);
}
