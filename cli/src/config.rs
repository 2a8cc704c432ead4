// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, emit_error, print_pin_info, DeviceOpts, EmitOpts};
use anyhow::{bail, Context, Result};
use clap::Parser;
use gpioc::{Changes, Direction, Drive, Info, Offset, Pull};

#[derive(Debug, Parser)]
#[command(alias("c"))]
pub struct Opts {
    /// The pin to configure
    #[arg(value_name = "pin")]
    pin: Offset,

    /// Rename the pin
    #[arg(long, value_name = "name")]
    name: Option<String>,

    /// Configure the pin as an input
    #[arg(long, group = "direction")]
    input: bool,

    /// Configure the pin as an output
    #[arg(long, group = "direction")]
    output: bool,

    /// Enable the pull-up
    #[arg(long, group = "pull")]
    pull_up: bool,

    /// Enable the pull-down
    #[arg(long, group = "pull")]
    pull_down: bool,

    /// Drive the output as open-drain
    #[arg(long, group = "drive")]
    open_drain: bool,

    /// Drive the output as tri-state
    #[arg(long, group = "drive")]
    tristate: bool,

    /// Enable or disable inversion of the input level
    #[arg(
        long,
        value_name = "bool",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    invert_input: Option<bool>,

    /// Enable or disable inversion of the output level
    #[arg(
        long,
        value_name = "bool",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    invert_output: Option<bool>,

    /// Enable or disable hardware pulsing
    #[arg(
        long,
        value_name = "bool",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pulsate: Option<bool>,

    #[command(flatten)]
    emit: EmitOpts,
}

impl Opts {
    fn changes(&self) -> Changes {
        let mut c = Changes::new();
        if let Some(name) = &self.name {
            c.with_name(name.as_str());
        }
        if self.input {
            c.with_direction(Direction::Input);
        }
        if self.output {
            c.with_direction(Direction::Output);
        }
        if self.pull_up {
            c.with_pull(Pull::PullUp);
        }
        if self.pull_down {
            c.with_pull(Pull::PullDown);
        }
        if self.open_drain {
            c.with_drive(Drive::OpenDrain);
        }
        if self.tristate {
            c.with_drive(Drive::TriState);
        }
        c.invert_input = self.invert_input;
        c.invert_output = self.invert_output;
        c.hardware_pulsate = self.pulsate;
        c
    }
}

pub fn cmd(dev: &DeviceOpts, opts: &Opts) -> bool {
    match do_cmd(dev, opts) {
        Err(e) => {
            emit_error(&opts.emit, &e);
            false
        }
        Ok(info) => {
            emit(&opts.emit, &info);
            true
        }
    }
}

fn do_cmd(dev: &DeviceOpts, opts: &Opts) -> Result<Info> {
    let changes = opts.changes();
    if changes.is_empty() {
        bail!("no configuration changes specified");
    }
    let s = common::open_session(dev)?;
    s.set_config(opts.pin, &changes)
        .with_context(|| format!("failed to configure pin {}", opts.pin))?;
    s.config(opts.pin)
        .with_context(|| format!("failed to read back pin {}", opts.pin))
}

#[cfg_attr(not(feature = "json"), allow(unused_variables))]
fn emit(opts: &EmitOpts, info: &Info) {
    #[cfg(feature = "json")]
    if opts.json {
        match serde_json::to_string(info) {
            Ok(s) => println!("{s}"),
            Err(e) => emit_error(opts, &anyhow::anyhow!(e)),
        }
        return;
    }
    print_pin_info(info);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn try_parse(args: &[&str]) -> std::result::Result<Opts, clap::Error> {
        let mut argv = vec!["gpioc"];
        argv.extend_from_slice(args);
        match crate::Opts::try_parse_from(argv)?.cmd {
            crate::Command::Config(opts) => Ok(opts),
            _ => panic!("not a config command"),
        }
    }

    fn parse(args: &[&str]) -> Opts {
        let mut argv = vec!["config"];
        argv.extend_from_slice(args);
        try_parse(&argv).unwrap()
    }

    #[test]
    fn changes() {
        assert!(parse(&["3"]).changes().is_empty());

        let mut expected = Changes::new();
        expected
            .as_output()
            .with_pull(Pull::PullDown)
            .with_drive(Drive::OpenDrain)
            .with_name("led");
        assert_eq!(
            parse(&["3", "--output", "--pull-down", "--open-drain", "--name", "led"]).changes(),
            expected
        );
    }

    #[test]
    fn switches() {
        let c = parse(&["3", "--invert-input", "--invert-output=false", "--pulsate=true"]).changes();
        assert_eq!(c.invert_input, Some(true));
        assert_eq!(c.invert_output, Some(false));
        assert_eq!(c.hardware_pulsate, Some(true));
        assert_eq!(c.direction, None);
    }

    #[test]
    fn verbose_from_global() {
        assert_eq!(parse(&["3", "--input"]).emit.verbose, 0);
        let opts = try_parse(&["-vv", "config", "3", "--input"]).unwrap();
        assert_eq!(opts.emit.verbose, 2);
        assert_eq!(opts.pin, 3);
    }

    #[test]
    fn exclusive() {
        assert!(try_parse(&["config", "3", "--input", "--output"]).is_err());
        assert!(try_parse(&["config", "3", "--pull-up", "--pull-down"]).is_err());
        assert!(try_parse(&["config", "3", "--open-drain", "--tristate"]).is_err());
    }
}
