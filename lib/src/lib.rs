// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: MIT

//! A library for accessing GPIO pins on FreeBSD platforms
//! using the gpioc controller device.
//!
//! A controller is opened as a [`Session`], which reads and writes pin levels
//! and reads and updates pin configuration.
//!
//! To read a pin and drive another:
//! ```no_run
//! # use gpioc::Result;
//! use gpioc::Session;
//!
//! # fn main() -> Result<()> {
//! let s = Session::open("/dev/gpioc0")?;
//! let level = s.get(3)?;
//! s.set(4, !level)?;
//! # Ok(())
//! # }
//! ```
//!
//! Configuration changes are described by [`Changes`] and are checked against
//! the capabilities the driver reports for the pin before being written:
//! ```no_run
//! # use gpioc::Result;
//! use gpioc::{Changes, Pull, Session};
//!
//! # fn main() -> Result<()> {
//! let s = Session::open_default()?;
//! s.set_config(13, Changes::new().as_input().with_pull(Pull::PullUp))?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Session`]: session::Session
//! [`Changes`]: config::Changes

use gpioc_uapi as uapi;
use std::fmt;
use std::path::PathBuf;

/// Changes to the configuration of a pin.
pub mod config;

/// The generic GPIO contract.
pub mod gpio;

/// Typed pin capabilities and configuration, and their flag encoding.
pub mod pin;

/// An open controller.
pub mod session;

pub use config::Changes;
pub use gpio::Gpio;
pub use pin::{Attribute, Capabilities, Config, Direction, Drive, Info, Pull, Setting};
pub use session::{OpenErrorKind, Session, DEFAULT_PATH};
pub use uapi::{Offset, PinFlags, NAME_LEN_MAX};

/// Errors returned by [`gpioc`] functions.
///
/// [`gpioc`]: crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The pin is not on the controller.
    #[error("pin {0} is out of range, the controller has {1} pins")]
    OutOfRange(Offset, u32),

    /// An error returned when there is a problem with an argument.
    #[error("{0}")]
    InvalidArgument(String),

    /// The pin does not have the capability required by a change.
    #[error(
        "pin {pin} does not support {requested} (supported: {})",
        fmt_settings(.supported)
    )]
    UnsupportedConfiguration {
        /// The pin being configured.
        pin: Offset,
        /// The setting that was requested.
        requested: Setting,
        /// The settings the pin supports in the same category.
        supported: Vec<Setting>,
    },

    /// The pin is not configured in the direction the operation requires.
    #[error("pin {pin} is not configured as an {required}, cannot {op}")]
    DirectionMismatch {
        /// The pin being accessed.
        pin: Offset,
        /// The operation attempted.
        op: &'static str,
        /// The direction the operation requires.
        required: Direction,
    },

    /// The record returned by the driver breaks an invariant of the ABI.
    #[error("{0}")]
    DeviceProtocol(String),

    /// Problem opening the controller.
    #[error("\"{}\" {}", .0.display(), .1)]
    DeviceOpen(PathBuf, #[source] OpenErrorKind),

    /// An error returned from an underlying uAPI call.
    #[error("uAPI {0} returned: {1}")]
    Uapi(UapiCall, #[source] uapi::Error),

    /// The session has been closed.
    #[error("the session is closed")]
    Closed,
}

fn fmt_settings(s: &[Setting]) -> String {
    if s.is_empty() {
        return "none".into();
    }
    s.iter()
        .map(|x| x.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

/// Identifiers for the underlying uAPI calls.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UapiCall {
    GetMaxPin,
    GetPin,
    GetPinConfig,
    SetPin,
    SetPinConfig,
    SetPinName,
    TogglePin,
}

impl fmt::Display for UapiCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UapiCall::GetMaxPin => "get_max_pin",
            UapiCall::GetPin => "get_pin",
            UapiCall::GetPinConfig => "get_pin_config",
            UapiCall::SetPin => "set_pin",
            UapiCall::SetPinConfig => "set_pin_config",
            UapiCall::SetPinName => "set_pin_name",
            UapiCall::TogglePin => "toggle_pin",
        };
        write!(f, "{}", name)
    }
}

/// The result for [`gpioc`] functions.
///
/// [`gpioc`]: crate
pub type Result<T> = std::result::Result<T, Error>;
