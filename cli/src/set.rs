// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, emit_error, DeviceOpts, EmitOpts};
use anyhow::{anyhow, Result};
use clap::Parser;
use gpioc::Offset;
use log::info;

#[derive(Debug, Parser)]
#[command(alias("s"))]
pub struct Opts {
    /// The pin levels to set
    ///
    /// The levels are specified in pin=level format,
    /// where the level may be 0, low, off, false, 1, high, on or true.
    ///
    /// e.g.
    ///     set 3=1 4=off
    #[arg(
        value_name = "pin=level",
        required = true,
        value_parser = common::parse_pin_level,
        verbatim_doc_comment
    )]
    pin_levels: Vec<(Offset, bool)>,

    /// Configure the pins as outputs before setting them
    ///
    /// If not specified then the pin direction is left as-is.
    #[arg(short = 'o', long)]
    as_output: bool,

    #[command(flatten)]
    emit: EmitOpts,
}

pub fn cmd(dev: &DeviceOpts, opts: &Opts) -> bool {
    match do_cmd(dev, opts) {
        Err(e) => {
            emit_error(&opts.emit, &e);
            false
        }
        Ok(errors) => {
            for e in &errors {
                emit_error(&opts.emit, e);
            }
            errors.is_empty()
        }
    }
}

fn do_cmd(dev: &DeviceOpts, opts: &Opts) -> Result<Vec<anyhow::Error>> {
    let s = common::open_session(dev)?;
    let mut errors = Vec::new();
    for &(pin, level) in &opts.pin_levels {
        if opts.as_output {
            if let Err(e) = s.set_mode_output(pin) {
                errors.push(anyhow!(e).context(format!("failed to configure pin {pin}")));
                continue;
            }
        }
        match s.set(pin, level) {
            Ok(()) => info!("pin {} set to {}", pin, level),
            Err(e) => errors.push(anyhow!(e).context(format!("failed to set pin {pin}"))),
        }
    }
    Ok(errors)
}
