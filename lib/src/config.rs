// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::pin::{
    apply_change, apply_switch, Attribute, Direction, Drive, Info, Pull, Setting,
};
use crate::{Error, Offset, Result, UapiCall};
use gpioc_uapi::{self as uapi, Device, Ioctl, Name, PinFlags, PinRecord, NAME_LEN_MAX};
use log::{debug, trace};

/// A set of changes to apply to the configuration of a pin.
///
/// Fields left as `None` leave the corresponding configuration unchanged.
///
/// Changes are checked against the capabilities of the pin, so only
/// settings the pin supports can be applied.
///
/// ```
/// use gpioc::{Changes, Pull};
///
/// let mut c = Changes::new();
/// c.as_input().with_pull(Pull::PullUp);
/// assert!(!c.is_empty());
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Changes {
    /// The new name for the pin.
    pub name: Option<String>,

    /// The new direction.
    pub direction: Option<Direction>,

    /// The new pull.
    pub pull: Option<Pull>,

    /// The new drive.
    pub drive: Option<Drive>,

    /// Enable or disable inversion of the input level.
    pub invert_input: Option<bool>,

    /// Enable or disable inversion of the output level.
    pub invert_output: Option<bool>,

    /// Enable or disable hardware pulsing.
    pub hardware_pulsate: Option<bool>,
}

impl Changes {
    /// An empty set of changes.
    pub fn new() -> Changes {
        Changes::default()
    }

    /// Rename the pin.
    pub fn with_name<N: Into<String>>(&mut self, name: N) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Set the direction of the pin.
    pub fn with_direction(&mut self, direction: Direction) -> &mut Self {
        self.direction = Some(direction);
        self
    }

    /// Set the pin as an input.
    ///
    /// This is a short form of [`with_direction(Input)`].
    ///
    /// [`with_direction(Input)`]: #method.with_direction
    pub fn as_input(&mut self) -> &mut Self {
        self.with_direction(Direction::Input)
    }

    /// Set the pin as an output.
    ///
    /// This is a short form of [`with_direction(Output)`].
    ///
    /// [`with_direction(Output)`]: #method.with_direction
    pub fn as_output(&mut self) -> &mut Self {
        self.with_direction(Direction::Output)
    }

    /// Set the pull of the pin.
    pub fn with_pull(&mut self, pull: Pull) -> &mut Self {
        self.pull = Some(pull);
        self
    }

    /// Set the drive of the pin.
    pub fn with_drive(&mut self, drive: Drive) -> &mut Self {
        self.drive = Some(drive);
        self
    }

    /// Enable or disable inversion of the input level.
    pub fn with_invert_input(&mut self, invert: bool) -> &mut Self {
        self.invert_input = Some(invert);
        self
    }

    /// Enable or disable inversion of the output level.
    pub fn with_invert_output(&mut self, invert: bool) -> &mut Self {
        self.invert_output = Some(invert);
        self
    }

    /// Enable or disable hardware pulsing.
    pub fn with_hardware_pulsate(&mut self, pulsate: bool) -> &mut Self {
        self.hardware_pulsate = Some(pulsate);
        self
    }

    /// Check if no changes have been set.
    pub fn is_empty(&self) -> bool {
        *self == Changes::default()
    }

    /// Check the changes are well formed, independent of any pin.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.len() > NAME_LEN_MAX {
                return Err(Error::InvalidArgument("name too long".into()));
            }
        }
        Ok(())
    }

    /// Apply the changes to the current record of a pin.
    ///
    /// Returns the record to be written.
    /// The capabilities are taken from the current record and carried through
    /// unchanged, as are any flags not named by the changes.
    pub fn apply(&self, current: &PinRecord) -> Result<PinRecord> {
        self.validate()?;
        let pin = current.pin;
        let caps = current.caps;
        let mut flags = current.flags;
        if let Some(d) = self.direction {
            flags = change(pin, flags, d, caps)?;
        }
        if let Some(p) = self.pull {
            flags = change(pin, flags, p, caps)?;
        }
        if let Some(d) = self.drive {
            flags = change(pin, flags, d, caps)?;
        }
        let switches = [
            (self.invert_input, PinFlags::INVERT_IN, Setting::InvertInput),
            (self.invert_output, PinFlags::INVERT_OUT, Setting::InvertOutput),
            (self.hardware_pulsate, PinFlags::PULSATE, Setting::HardwarePulsate),
        ];
        for (on, flag, setting) in switches {
            if let Some(on) = on {
                flags = apply_switch(flags, flag, on, caps).ok_or(
                    Error::UnsupportedConfiguration {
                        pin,
                        requested: setting,
                        supported: vec![],
                    },
                )?;
            }
        }
        let name = match &self.name {
            Some(n) => n
                .parse::<Name>()
                .map_err(|_| Error::InvalidArgument("name too long".into()))?,
            None => current.name.clone(),
        };
        Ok(PinRecord::new(pin, name, caps, flags))
    }
}

fn change<A: Attribute>(pin: Offset, flags: PinFlags, value: A, caps: PinFlags) -> Result<PinFlags> {
    apply_change(flags, value, caps).ok_or_else(|| Error::UnsupportedConfiguration {
        pin,
        requested: value.into(),
        supported: A::from_caps(caps).into_iter().map(Into::into).collect(),
    })
}

/// Read the pin record, apply the changes and write it back.
///
/// The pin is assumed to be in range.
/// No request is issued if the changes are malformed, and nothing is written
/// if the current record does not decode or the changes cannot be applied to
/// the pin.
pub(crate) fn set_config<D: Device + ?Sized>(d: &D, pin: Offset, changes: &Changes) -> Result<()> {
    changes.validate()?;
    trace!("get_pin_config {:#x} pin {}", Ioctl::GetConfig.code(), pin);
    let current =
        uapi::get_pin_config(d, pin).map_err(|e| Error::Uapi(UapiCall::GetPinConfig, e))?;
    Info::try_from(&current)?;
    let pr = changes.apply(&current)?;
    debug!(
        "pin {} flags {:#x} -> {:#x}",
        pin,
        current.flags.bits(),
        pr.flags.bits()
    );
    trace!("set_pin_config {:#x} pin {}", Ioctl::SetConfig.code(), pin);
    uapi::set_pin_config(d, &pr).map_err(|e| Error::Uapi(UapiCall::SetPinConfig, e))
}
