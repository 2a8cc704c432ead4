// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, emit_error, DeviceOpts, EmitOpts};
use anyhow::{Context, Result};
use clap::Parser;
use gpioc::Offset;

#[derive(Debug, Parser)]
#[command(alias("n"))]
pub struct Opts {
    /// The pin to rename
    #[arg(value_name = "pin")]
    pin: Offset,

    /// The new name for the pin
    ///
    /// At most 63 bytes.
    #[arg(value_name = "name")]
    name: String,

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
    s.set_name(opts.pin, &opts.name)
        .with_context(|| format!("failed to rename pin {}", opts.pin))
}
