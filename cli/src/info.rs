// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, emit_error, format_error, print_pin_info, DeviceOpts, EmitOpts};
use anyhow::{anyhow, Result};
use clap::Parser;
use gpioc::{Info, Offset};
#[cfg(feature = "serde")]
use serde_derive::Serialize;

#[derive(Debug, Parser)]
#[command(aliases(["i", "pin"]))]
pub struct Opts {
    /// Only get information for the specified pins
    ///
    /// If not specified then all pins on the controller are reported.
    #[arg(value_name = "pin")]
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
        Ok(res) => {
            res.emit(dev, opts);
            res.errors.is_empty()
        }
    }
}

fn do_cmd(dev: &DeviceOpts, opts: &Opts) -> Result<CmdResult> {
    let s = common::open_session(dev)?;
    let pins: Vec<Offset> = if opts.pins.is_empty() {
        (0..s.pin_count()).collect()
    } else {
        opts.pins.clone()
    };
    let mut res = CmdResult {
        count: s.pin_count(),
        ..Default::default()
    };
    for pin in pins {
        match s.config(pin) {
            Ok(info) => res.pins.push(info),
            Err(e) => res.push_error(
                &opts.emit,
                &anyhow!(e).context(format!("failed to read pin {pin}")),
            ),
        }
    }
    Ok(res)
}

#[derive(Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
struct CmdResult {
    count: u32,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pins: Vec<Info>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    errors: Vec<String>,
}

impl CmdResult {
    fn emit(&self, dev: &DeviceOpts, opts: &Opts) {
        #[cfg(feature = "json")]
        if opts.emit.json {
            match serde_json::to_string(self) {
                Ok(s) => println!("{s}"),
                Err(e) => emit_error(&opts.emit, &anyhow!(e)),
            }
            return;
        }
        self.print(dev, opts);
    }

    fn push_error(&mut self, opts: &EmitOpts, e: &anyhow::Error) {
        self.errors.push(format_error(opts, e))
    }

    fn print(&self, dev: &DeviceOpts, opts: &Opts) {
        if opts.pins.is_empty() {
            println!("{} - {} pins:", dev.device.display(), self.count);
        }
        for info in &self.pins {
            print_pin_info(info);
        }
        for e in &self.errors {
            eprintln!("{e}");
        }
    }
}
