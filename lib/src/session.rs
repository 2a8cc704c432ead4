// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::config::{self, Changes};
use crate::pin::{Direction, Info};
use crate::{Error, Offset, Result, UapiCall};
use gpioc_uapi::{self as uapi, Device, Ioctl, Name};
use log::{debug, trace};
use std::fs::File;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// The controller opened by [`Session::open_default`].
pub const DEFAULT_PATH: &str = "/dev/gpioc0";

/// An open session with a GPIO controller.
///
/// The session owns the controller handle, which is released when the
/// session is closed or dropped.
///
/// The number of pins is read when the session is opened and every pin
/// argument is checked against it before any request is sent.
///
/// In strict mode, level reads and writes are refused unless the pin is
/// currently configured in the matching direction.
#[derive(Debug)]
pub struct Session<D = File> {
    path: Option<PathBuf>,
    device: Option<D>,
    count: u32,
    strict: bool,
}

impl Session<File> {
    /// Open the controller at the path.
    ///
    /// The path must be a character device that answers the pin count query.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Session<File>> {
        let path = path.as_ref();
        let open_err = |kind| Error::DeviceOpen(path.to_path_buf(), kind);
        let f = File::open(path).map_err(|e| open_err(OpenErrorKind::Inaccessible(e)))?;
        let md = f
            .metadata()
            .map_err(|e| open_err(OpenErrorKind::Inaccessible(e)))?;
        if !md.file_type().is_char_device() {
            return Err(open_err(OpenErrorKind::NotCharacterDevice));
        }
        let count = uapi::get_max_pin(&f).map_err(|e| open_err(OpenErrorKind::NotController(e)))?;
        debug!("opened {} with {} pins", path.display(), count);
        Ok(Session {
            path: Some(path.to_path_buf()),
            device: Some(f),
            count,
            strict: false,
        })
    }

    /// Open the controller at [`DEFAULT_PATH`].
    pub fn open_default() -> Result<Session<File>> {
        Session::open(DEFAULT_PATH)
    }
}

impl<D: Device> Session<D> {
    /// Start a session on an already open device.
    pub fn from_device(device: D) -> Result<Session<D>> {
        let count =
            uapi::get_max_pin(&device).map_err(|e| Error::Uapi(UapiCall::GetMaxPin, e))?;
        debug!("session started with {} pins", count);
        Ok(Session {
            path: None,
            device: Some(device),
            count,
            strict: false,
        })
    }

    /// Enable or disable strict direction checking.
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Check if strict direction checking is enabled.
    pub fn strict_validation(&self) -> bool {
        self.strict
    }

    /// The path of the controller, if opened from one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The number of pins on the controller.
    ///
    /// Valid pins are in the range `0..pin_count()`.
    pub fn pin_count(&self) -> u32 {
        self.count
    }

    /// Release the controller.
    ///
    /// Subsequent operations fail with [`Error::Closed`].
    /// Closing a closed session has no effect.
    pub fn close(&mut self) {
        if self.device.take().is_some() {
            debug!("closed {}", self.display_path());
        }
    }

    /// Check if the session has been closed.
    pub fn is_closed(&self) -> bool {
        self.device.is_none()
    }

    /// The name, capabilities and configuration of a pin.
    pub fn config(&self, pin: Offset) -> Result<Info> {
        let d = self.device()?;
        self.check_pin(pin)?;
        read_info(d, pin)
    }

    /// Apply changes to the configuration of a pin.
    ///
    /// The current configuration is read, the changes applied to it, and the
    /// result written back in a single request. Settings not named in the
    /// changes are left as they were.
    ///
    /// Nothing is written if any change is not supported by the pin.
    pub fn set_config(&self, pin: Offset, changes: &Changes) -> Result<()> {
        let d = self.device()?;
        self.check_pin(pin)?;
        config::set_config(d, pin, changes)
    }

    /// Configure a pin as an input.
    pub fn set_mode_input(&self, pin: Offset) -> Result<()> {
        self.set_config(pin, Changes::new().as_input())
    }

    /// Configure a pin as an output.
    pub fn set_mode_output(&self, pin: Offset) -> Result<()> {
        self.set_config(pin, Changes::new().as_output())
    }

    /// Rename a pin.
    pub fn set_name(&self, pin: Offset, name: &str) -> Result<()> {
        let d = self.device()?;
        self.check_pin(pin)?;
        let name: Name = name
            .parse()
            .map_err(|_| Error::InvalidArgument("name too long".into()))?;
        trace!("set_pin_name {:#x} pin {}", Ioctl::SetName.code(), pin);
        uapi::set_pin_name(d, pin, name).map_err(|e| Error::Uapi(UapiCall::SetPinName, e))
    }

    /// Read the level of a pin.
    pub fn get(&self, pin: Offset) -> Result<bool> {
        let d = self.device()?;
        self.check_pin(pin)?;
        self.check_direction(d, pin, Direction::Input, "get the level")?;
        read_level(d, pin)
    }

    /// Set the level of a pin.
    pub fn set(&self, pin: Offset, value: bool) -> Result<()> {
        let d = self.device()?;
        self.check_pin(pin)?;
        self.check_direction(d, pin, Direction::Output, "set the level")?;
        write_level(d, pin, value)
    }

    /// Drive a pin to a level for a period, then to the opposite level.
    ///
    /// If `state` is None the pin is driven to the opposite of its current
    /// level and then restored.
    ///
    /// Blocks for the duration of the pulse.
    pub fn pulse(&self, pin: Offset, duration: Duration, state: Option<bool>) -> Result<()> {
        let d = self.device()?;
        self.check_pin(pin)?;
        self.check_direction(d, pin, Direction::Output, "pulse")?;
        let active = match state {
            Some(s) => s,
            None => !read_level(d, pin)?,
        };
        write_level(d, pin, active)?;
        thread::sleep(duration);
        write_level(d, pin, !active)
    }

    /// Invert the level of a pin.
    pub fn toggle(&self, pin: Offset) -> Result<()> {
        let d = self.device()?;
        self.check_pin(pin)?;
        self.check_direction(d, pin, Direction::Output, "toggle the level")?;
        trace!("toggle_pin {:#x} pin {}", Ioctl::Toggle.code(), pin);
        uapi::toggle_pin(d, pin).map_err(|e| Error::Uapi(UapiCall::TogglePin, e))
    }

    fn device(&self) -> Result<&D> {
        self.device.as_ref().ok_or(Error::Closed)
    }

    fn check_pin(&self, pin: Offset) -> Result<()> {
        if pin >= self.count {
            return Err(Error::OutOfRange(pin, self.count));
        }
        Ok(())
    }

    fn check_direction(
        &self,
        d: &D,
        pin: Offset,
        required: Direction,
        op: &'static str,
    ) -> Result<()> {
        if !self.strict {
            return Ok(());
        }
        if read_info(d, pin)?.config.direction != required {
            return Err(Error::DirectionMismatch { pin, op, required });
        }
        Ok(())
    }
}

impl<D> Session<D> {
    fn display_path(&self) -> String {
        match &self.path {
            Some(p) => p.display().to_string(),
            None => "device".into(),
        }
    }
}

impl<D> Drop for Session<D> {
    fn drop(&mut self) {
        if self.device.take().is_some() {
            debug!("released {}", self.display_path());
        }
    }
}

fn read_info<D: Device>(d: &D, pin: Offset) -> Result<Info> {
    trace!("get_pin_config {:#x} pin {}", Ioctl::GetConfig.code(), pin);
    let pr = uapi::get_pin_config(d, pin).map_err(|e| Error::Uapi(UapiCall::GetPinConfig, e))?;
    Info::try_from(&pr)
}

fn read_level<D: Device>(d: &D, pin: Offset) -> Result<bool> {
    trace!("get_pin {:#x} pin {}", Ioctl::Get.code(), pin);
    uapi::get_pin(d, pin).map_err(|e| Error::Uapi(UapiCall::GetPin, e))
}

fn write_level<D: Device>(d: &D, pin: Offset, value: bool) -> Result<()> {
    trace!("set_pin {:#x} pin {} value {}", Ioctl::Set.code(), pin, value);
    uapi::set_pin(d, pin, value).map_err(|e| Error::Uapi(UapiCall::SetPin, e))
}

/// The reason a controller could not be opened.
#[derive(Debug, thiserror::Error)]
pub enum OpenErrorKind {
    /// The path could not be opened.
    #[error("is not accessible: {0}")]
    Inaccessible(std::io::Error),

    /// The path is not a character device.
    #[error("is not a character device")]
    NotCharacterDevice,

    /// The device did not answer the pin count query.
    #[error("is not a GPIO controller: {0}")]
    NotController(uapi::Error),
}
