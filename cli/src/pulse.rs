// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, emit_error, DeviceOpts, EmitOpts, LevelFlags};
use anyhow::{Context, Result};
use clap::Parser;
use gpioc::Offset;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(alias("p"))]
pub struct Opts {
    /// The pin to pulse
    #[arg(value_name = "pin")]
    pin: Offset,

    /// The length of the pulse
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(
        short = 'p',
        long,
        value_name = "period",
        default_value = "1ms",
        value_parser = common::parse_duration
    )]
    period: Duration,

    /// The level to drive the pin to for the pulse
    ///
    /// The pin is returned to the opposite level after the pulse.
    ///
    /// If not specified then the pin is driven to the opposite of its
    /// current level and then restored.
    #[arg(long, value_name = "level", value_enum, ignore_case = true)]
    state: Option<LevelFlags>,

    #[command(flatten)]
    emit: EmitOpts,
}

pub fn cmd(dev: &DeviceOpts, opts: &Opts) -> bool {
    match do_cmd(dev, opts) {
        Err(e) => {
            emit_error(&opts.emit, &e);
            false
        }
        Ok(()) => true,
    }
}

fn do_cmd(dev: &DeviceOpts, opts: &Opts) -> Result<()> {
    let s = common::open_session(dev)?;
    s.pulse(opts.pin, opts.period, opts.state.map(bool::from))
        .with_context(|| format!("failed to pulse pin {}", opts.pin))
}
