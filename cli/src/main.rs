// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A command line tool for accessing GPIO pins on a gpioc controller.

use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::process::ExitCode;

mod common;
mod config;
mod get;
mod info;
mod name;
mod pulse;
mod set;
mod toggle;

fn main() -> ExitCode {
    match Opts::try_parse() {
        Ok(opt) => {
            init_logging(opt.verbose);
            let dev = &opt.device_opts;
            let res = match opt.cmd {
                Command::Config(cfg) => config::cmd(dev, &cfg),
                Command::Get(cfg) => get::cmd(dev, &cfg),
                Command::Info(cfg) => info::cmd(dev, &cfg),
                Command::Name(cfg) => name::cmd(dev, &cfg),
                Command::Pulse(cfg) => pulse::cmd(dev, &cfg),
                Command::Set(cfg) => set::cmd(dev, &cfg),
                Command::Toggle(cfg) => toggle::cmd(dev, &cfg),
            };
            return if res {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
        Err(e) => {
            // help and version are reported as errors, but are not failures
            if !e.use_stderr() {
                print!("{e}");
                return ExitCode::SUCCESS;
            }
            eprintln!("{e}");
        }
    }
    ExitCode::FAILURE
}

// RUST_LOG takes precedence over the verbosity
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();
}

#[derive(Parser)]
#[command(
    name = "gpioc",
    about = "A utility to control GPIO pins on FreeBSD using the gpioc controller device.",
    version,
    propagate_version = true
)]
struct Opts {
    /// Provide more detailed error messages and logging
    ///
    /// Repeat for more detail.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true, display_order = 800)]
    pub verbose: u8,

    #[command(flatten)]
    device_opts: common::DeviceOpts,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
enum Command {
    /// Change the configuration of a GPIO pin.
    Config(config::Opts),

    /// Read the levels of GPIO pins.
    Get(get::Opts),

    /// Get information about GPIO pins (everything but levels).
    Info(info::Opts),

    /// Rename a GPIO pin.
    Name(name::Opts),

    /// Drive a GPIO pin to a level for a period.
    Pulse(pulse::Opts),

    /// Set the levels of GPIO pins.
    Set(set::Opts),

    /// Invert the levels of GPIO pins.
    Toggle(toggle::Opts),
}
