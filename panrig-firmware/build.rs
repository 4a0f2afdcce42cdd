//! Build script for panrig-firmware
//!
//! - Sets up linker search paths and arguments for memory.x
//! - Validates rig.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

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

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate rig.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=rig.toml");

    let config_path = Path::new("rig.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: rig.toml not found!                                      ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a rig.toml configuration file.              ║\n\
            ║  Please create one in the panrig-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read rig.toml                                  ║\n\
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
                ║  ERROR: Invalid TOML syntax in rig.toml                          ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_motion(&config, &mut errors);
    validate_sequence(&config, &mut errors);
    validate_shutter(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid rig configuration                                ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=rig.toml validated successfully");
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

/// Allowed keys per section; must match the firmware's line parser
const SECTIONS: &[(&str, &[&str])] = &[
    (
        "motion",
        &["steps_per_revolution", "min_speed", "max_speed", "ramp_span_deg"],
    ),
    (
        "sequence",
        &["default_frames", "settle_ms", "frame_warning_threshold"],
    ),
    ("shutter", &["pulse_ms", "active_low"]),
];

/// Reject unknown sections and keys
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let root = match config.as_table() {
        Some(t) => t,
        None => return,
    };

    for (name, section) in root {
        let allowed = match SECTIONS.iter().find(|(s, _)| *s == name.as_str()) {
            Some((_, keys)) => keys,
            None => {
                errors.push(format!("unknown section or key '{}'", name));
                continue;
            }
        };

        let table = match section.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("[{}] must be a table", name));
                continue;
            }
        };

        for key in table.keys() {
            if !allowed.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

/// Read a number that may be written as integer or float
fn number(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> Option<f64> {
    match config.get(section).and_then(|s| s.get(key)) {
        None => None,
        Some(toml::Value::Integer(i)) => Some(*i as f64),
        Some(toml::Value::Float(f)) => Some(*f),
        Some(_) => {
            errors.push(format!("[{}] {} must be a number", section, key));
            None
        }
    }
}

/// Read an integer within `min..=max`
fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match config.get(section).and_then(|s| s.get(key)) {
        None => None,
        Some(toml::Value::Integer(i)) if (min..=max).contains(i) => Some(*i),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
    }
}

fn validate_motion(config: &toml::Value, errors: &mut Vec<String>) {
    integer(config, "motion", "steps_per_revolution", 1, 65535, errors);

    let min_speed = number(config, "motion", "min_speed", errors).unwrap_or(20.0);
    let max_speed = number(config, "motion", "max_speed", errors).unwrap_or(100.0);
    if min_speed <= 0.0 || min_speed > max_speed {
        errors.push("[motion] need 0 < min_speed <= max_speed".to_string());
    }

    if let Some(span) = number(config, "motion", "ramp_span_deg", errors) {
        if span < 0.0 {
            errors.push("[motion] ramp_span_deg must not be negative".to_string());
        }
    }
}

fn validate_sequence(config: &toml::Value, errors: &mut Vec<String>) {
    let threshold =
        integer(config, "sequence", "frame_warning_threshold", 1, 65535, errors).unwrap_or(360);

    if let Some(frames) = integer(config, "sequence", "default_frames", 1, 65535, errors) {
        if frames >= threshold {
            println!(
                "cargo:warning=default_frames = {} exceeds motor resolution (threshold {})",
                frames, threshold
            );
        }
    }

    integer(config, "sequence", "settle_ms", 0, u32::MAX as i64, errors);
}

fn validate_shutter(config: &toml::Value, errors: &mut Vec<String>) {
    integer(config, "shutter", "pulse_ms", 0, u32::MAX as i64, errors);

    match config.get("shutter").and_then(|s| s.get("active_low")) {
        None | Some(toml::Value::Boolean(_)) => {}
        Some(_) => errors.push("[shutter] active_low must be true or false".to_string()),
    }
}
