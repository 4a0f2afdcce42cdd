//! Minimal TOML parser for rig configuration
//!
//! Handles only the subset the rig configuration needs. It does NOT support
//! the full TOML grammar.
//!
//! Supported features:
//! - `[motion]`, `[sequence]` and `[shutter]` section headers
//! - Key = value pairs (integer, float, boolean)
//! - Comments (# ...), including trailing comments
//!
//! Keys missing from the input keep their default values. Unknown sections
//! and keys are rejected so typos do not silently fall back to defaults.

use super::types::{ConfigError, RigConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in the current section
    UnknownKey,
    /// Value could not be parsed for its key
    InvalidValue,
    /// Line is not a header, comment or key = value pair
    InvalidLine,
    /// Parsed values failed validation
    InvalidConfig(ConfigError),
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Motion,
    Sequence,
    Shutter,
}

/// Parse TOML configuration into RigConfig
pub fn parse_config(input: &str) -> Result<RigConfig, ParseError> {
    let mut config = RigConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(ParseError::InvalidLine)?;
        apply_value(&mut config, section, key.trim(), value.trim())?;
    }

    config.validate().map_err(ParseError::InvalidConfig)?;
    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "motion" => Ok(Section::Motion),
        "sequence" => Ok(Section::Sequence),
        "shutter" => Ok(Section::Shutter),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    config: &mut RigConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Motion, "steps_per_revolution") => {
            config.motion.steps_per_revolution = parse_int(value)?;
        }
        (Section::Motion, "min_speed") => config.motion.min_speed = parse_float(value)?,
        (Section::Motion, "max_speed") => config.motion.max_speed = parse_float(value)?,
        (Section::Motion, "ramp_span_deg") => config.motion.ramp_span_deg = parse_float(value)?,

        (Section::Sequence, "default_frames") => {
            config.sequence.default_frames = parse_int(value)?;
        }
        (Section::Sequence, "settle_ms") => config.sequence.settle_ms = parse_int(value)?,
        (Section::Sequence, "frame_warning_threshold") => {
            config.sequence.frame_warning_threshold = parse_int(value)?;
        }

        (Section::Shutter, "pulse_ms") => config.shutter.pulse_ms = parse_int(value)?,
        (Section::Shutter, "active_low") => config.shutter.active_low = parse_bool(value)?,

        _ => return Err(ParseError::UnknownKey),
    }

    Ok(())
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    let parsed: f32 = value.parse().map_err(|_| ParseError::InvalidValue)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}
