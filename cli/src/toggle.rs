// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, emit_error, DeviceOpts, EmitOpts};
use anyhow::{anyhow, Result};
use clap::Parser;
use gpioc::Offset;

#[derive(Debug, Parser)]
#[command(alias("t"))]
pub struct Opts {
    /// The pins to toggle
    #[arg(value_name = "pin", required = true)]
    pins: Vec<Offset>,

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
    Ok(opts
        .pins
        .iter()
        .filter_map(|&pin| {
            s.toggle(pin)
                .err()
                .map(|e| anyhow!(e).context(format!("failed to toggle pin {pin}")))
        })
        .collect())
}
