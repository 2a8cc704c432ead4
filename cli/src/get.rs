// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, emit_error, format_error, format_level, DeviceOpts, EmitOpts};
use anyhow::{anyhow, Result};
use clap::Parser;
use gpioc::Offset;
#[cfg(feature = "serde")]
use serde_derive::Serialize;

#[derive(Debug, Parser)]
#[command(alias("g"))]
pub struct Opts {
    /// The pins to get
    #[arg(value_name = "pin", required = true)]
    pins: Vec<Offset>,

    /// Display levels as '0' or '1' only, without the pin
    #[arg(long, group = "emit")]
    numeric: bool,

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
            res.emit(opts);
            res.errors.is_empty()
        }
    }
}

fn do_cmd(dev: &DeviceOpts, opts: &Opts) -> Result<CmdResult> {
    let s = common::open_session(dev)?;
    let mut res = CmdResult::default();
    for &pin in &opts.pins {
        match s.get(pin) {
            Ok(level) => res.levels.push(PinLevel { pin, level }),
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
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    levels: Vec<PinLevel>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    errors: Vec<String>,
}

#[cfg_attr(feature = "serde", derive(Serialize))]
struct PinLevel {
    pin: Offset,
    level: bool,
}

impl CmdResult {
    fn emit(&self, opts: &Opts) {
        #[cfg(feature = "json")]
        if opts.emit.json {
            match serde_json::to_string(self) {
                Ok(s) => println!("{s}"),
                Err(e) => emit_error(&opts.emit, &anyhow!(e)),
            }
            return;
        }
        self.print(opts);
    }

    fn push_error(&mut self, opts: &EmitOpts, e: &anyhow::Error) {
        self.errors.push(format_error(opts, e))
    }

    fn print(&self, opts: &Opts) {
        let print_levels: Vec<String> = self
            .levels
            .iter()
            .map(|pl| {
                if opts.numeric {
                    format_level(pl.level).to_string()
                } else {
                    format!("{}={}", pl.pin, format_level(pl.level))
                }
            })
            .collect();
        if !print_levels.is_empty() {
            println!("{}", print_levels.join(" "));
        }
        for e in &self.errors {
            eprintln!("{e}");
        }
    }
}
