// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::config::Changes;
use crate::pin::Info;
use crate::session::Session;
use crate::{Offset, Result};
use gpioc_uapi::Device;
use std::time::Duration;

/// The operations common to GPIO controllers.
///
/// Allows code to drive pins without being tied to a particular controller
/// or transport.
pub trait Gpio {
    /// The number of pins on the controller.
    fn io_count(&self) -> u32;

    /// The name, capabilities and configuration of a pin.
    fn config(&self, pin: Offset) -> Result<Info>;

    /// Apply changes to the configuration of a pin.
    fn set_config(&self, pin: Offset, changes: &Changes) -> Result<()>;

    /// Read the level of a pin.
    fn get(&self, pin: Offset) -> Result<bool>;

    /// Set the level of a pin.
    fn set(&self, pin: Offset, value: bool) -> Result<()>;

    /// Drive a pin to a level for a period, then to the opposite level.
    fn pulse(&self, pin: Offset, duration: Duration, state: Option<bool>) -> Result<()>;
}

impl<D: Device> Gpio for Session<D> {
    fn io_count(&self) -> u32 {
        self.pin_count()
    }

    fn config(&self, pin: Offset) -> Result<Info> {
        Session::config(self, pin)
    }

    fn set_config(&self, pin: Offset, changes: &Changes) -> Result<()> {
        Session::set_config(self, pin, changes)
    }

    fn get(&self, pin: Offset) -> Result<bool> {
        Session::get(self, pin)
    }

    fn set(&self, pin: Offset, value: bool) -> Result<()> {
        Session::set(self, pin, value)
    }

    fn pulse(&self, pin: Offset, duration: Duration, state: Option<bool>) -> Result<()> {
        Session::pulse(self, pin, duration, state)
    }
}
