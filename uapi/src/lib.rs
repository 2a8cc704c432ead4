// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: MIT

//! A thin but safe Rust layer around the FreeBSD gpioc ioctl interface.
//!
//! The records exchanged with the kernel are encoded to and decoded from
//! their fixed binary layouts here, and the [`Device`] trait carries them
//! to the controller.

pub(crate) mod common;

/// The pin records, flags and ioctl wrappers.
pub mod pin;

pub use common::{
    Device, Error, Ioctl, IoctlRequest, Name, Offset, Result, SizeError, ValidationError, ValidationResult,
    NAME_LEN_MAX, NAME_MAX,
};
pub use pin::{
    get_max_pin, get_pin, get_pin_config, set_pin, set_pin_config, set_pin_name, toggle_pin,
    MaxPin, PinFlags, PinRecord, PinRequest, MAX_PIN_SIZE, PIN_RECORD_SIZE, PIN_REQUEST_SIZE,
};
