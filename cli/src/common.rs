// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gpioc::{Capabilities, Config, Info, Offset, Session};
use std::path::PathBuf;
use std::time::Duration;

// common helper functions

pub fn open_session(opts: &DeviceOpts) -> Result<Session> {
    let s = Session::open(&opts.device)
        .with_context(|| format!("unable to open controller '{}'", opts.device.display()))?;
    Ok(s.with_strict_validation(opts.strict))
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseDurationError {
    #[error("'{0}' unknown units - use 's', 'ms' or 'us'.")]
    Units(String),
    #[error("'{0}' must start with a digit")]
    NoDigits(String),
    #[error("'{0}' {1}")]
    ParseDigits(String, std::num::ParseIntError),
}

/// Parse a period, taken as milliseconds unless otherwise specified.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, ParseDurationError> {
    let (num, units) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(0) => return Err(ParseDurationError::NoDigits(s.into())),
        Some(n) => s.split_at(n),
        None => (s, "ms"),
    };
    let t = num
        .parse::<u64>()
        .map_err(|e| ParseDurationError::ParseDigits(num.into(), e))?;
    Ok(match units {
        "us" => Duration::from_micros(t),
        "ms" => Duration::from_millis(t),
        "s" => Duration::from_secs(t),
        _ => return Err(ParseDurationError::Units(s.into())),
    })
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid level: '{0}'")]
pub struct InvalidLevel(String);

pub fn parse_level(s: &str) -> std::result::Result<bool, InvalidLevel> {
    match s.to_lowercase().as_str() {
        "0" | "low" | "off" | "false" => Ok(false),
        "1" | "high" | "on" | "true" => Ok(true),
        _ => Err(InvalidLevel(s.into())),
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParsePinLevelError {
    #[error("invalid pin=level: no '=' found in '{0}'")]
    NoSeparator(String),
    #[error("invalid pin: '{0}'")]
    Pin(String),
    #[error(transparent)]
    Level(#[from] InvalidLevel),
}

/// Parse a single pin=level pair
pub fn parse_pin_level(s: &str) -> std::result::Result<(Offset, bool), ParsePinLevelError> {
    let (pin, level) = s
        .split_once('=')
        .ok_or_else(|| ParsePinLevelError::NoSeparator(s.into()))?;
    let pin = pin
        .parse::<Offset>()
        .map_err(|_| ParsePinLevelError::Pin(pin.into()))?;
    Ok((pin, parse_level(level)?))
}

pub fn format_level(level: bool) -> &'static str {
    if level {
        "1"
    } else {
        "0"
    }
}

// common command line parser options

#[derive(Debug, Parser)]
/// Options to control the selection of the controller.
pub struct DeviceOpts {
    /// The controller device to open
    #[arg(
        short,
        long,
        value_name = "path",
        env = "GPIOC_DEVICE",
        default_value = gpioc::DEFAULT_PATH,
        global = true,
        display_order = 700
    )]
    pub device: PathBuf,

    /// Only read inputs and write outputs
    ///
    /// If specified then reading or writing the level of a pin that is not
    /// configured in the matching direction is an error.
    #[arg(short = 's', long, global = true, display_order = 701)]
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LevelFlags {
    High,
    Low,
}

impl From<LevelFlags> for bool {
    fn from(l: LevelFlags) -> Self {
        matches!(l, LevelFlags::High)
    }
}

#[derive(Clone, Copy, Debug, Default, Parser)]
pub struct EmitOpts {
    #[arg(from_global)]
    pub verbose: u8,

    /// Emit output in JSON format
    #[cfg(feature = "json")]
    #[arg(long, group = "emit")]
    pub json: bool,
}

pub fn emit_error(opts: &EmitOpts, e: &anyhow::Error) {
    let e_str = format_error(opts, e);
    #[cfg(feature = "json")]
    if opts.json {
        println!("{}", serde_json::json!({ "error": e_str }));
        return;
    }
    eprintln!("{e_str}");
}

pub fn format_error(opts: &EmitOpts, e: &anyhow::Error) -> String {
    if opts.verbose > 0 {
        format!("{e:#}")
    } else {
        format!("{e}")
    }
}

pub fn format_pin_name(n: &str) -> &str {
    if n.is_empty() {
        "unnamed"
    } else {
        n
    }
}

pub fn stringify_config(c: &Config) -> String {
    let mut attrs = vec![c.direction.to_string()];
    if let Some(drive) = c.drive {
        attrs.push(format!("drive={drive}"));
    }
    if let Some(pull) = c.pull {
        attrs.push(format!("pull={pull}"));
    }
    if c.invert_input {
        attrs.push("invert-input".into());
    }
    if c.invert_output {
        attrs.push("invert-output".into());
    }
    if c.hardware_pulsate {
        attrs.push("pulsate".into());
    }
    attrs.join(" ")
}

pub fn stringify_capabilities(c: &Capabilities) -> String {
    let mut caps: Vec<String> = c.direction.iter().map(|d| d.to_string()).collect();
    caps.extend(c.drive.iter().map(|d| d.to_string()));
    caps.extend(c.pull.iter().map(|p| p.to_string()));
    if c.invert_input {
        caps.push("invert-input".into());
    }
    if c.invert_output {
        caps.push("invert-output".into());
    }
    if c.hardware_pulsate {
        caps.push("pulsate".into());
    }
    if caps.is_empty() {
        return "none".into();
    }
    caps.join(",")
}

pub fn print_pin_info(info: &Info) {
    println!(
        "\tpin {:>3}:\t{:16}\t{}\t[{}]",
        info.offset,
        format_pin_name(&info.name),
        stringify_config(&info.config),
        stringify_capabilities(&info.capabilities),
    );
}
