// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bitflags::bitflags;
use std::mem;

use super::common::{
    check_size, ior, iorw, iow, Device, Ioctl, IoctlRequest, Name, Offset, ValidationError,
    ValidationResult, IOCTL_MAGIC, NAME_MAX,
};
use super::{Error, Result, SizeError};

bitflags! {
    /// The capability and configuration flags of a pin.
    ///
    /// The same bits describe both what a pin can do (its capabilities) and
    /// what it is currently doing (its flags).
    ///
    /// Bits unknown to this crate are retained so they survive a read-modify-write.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct PinFlags: u32 {
        /// The pin is an input.
        const INPUT = 0x0001;

        /// The pin is an output.
        const OUTPUT = 0x0002;

        /// The pin is an open drain output.
        const OPEN_DRAIN = 0x0004;

        /// The pin is a push-pull output.
        const PUSH_PULL = 0x0008;

        /// The pin is a tri-state output.
        const TRISTATE = 0x0010;

        /// The pin has the internal pull-up enabled.
        const PULL_UP = 0x0020;

        /// The pin has the internal pull-down enabled.
        const PULL_DOWN = 0x0040;

        /// The input level is inverted by the hardware.
        const INVERT_IN = 0x0080;

        /// The output level is inverted by the hardware.
        const INVERT_OUT = 0x0100;

        /// The pin is pulsed by the hardware.
        const PULSATE = 0x0200;

        /// The output is preset low when switched to an output.
        const PRESET_LOW = 0x0400;

        /// The output is preset high when switched to an output.
        const PRESET_HIGH = 0x0800;

        const _ = !0;
    }
}

/// The configuration record for a single pin (`struct gpio_pin`).
///
/// Exchanged with the kernel by [`get_pin_config`], [`set_pin_config`]
/// and [`set_pin_name`].
#[repr(C)]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PinRecord {
    /// The pin offset on the controller.
    pub pin: Offset,

    /// The name of the pin.
    ///
    /// May be empty.
    pub name: Name,

    /// What the pin is capable of.
    ///
    /// Reported by the driver and never altered by a write.
    pub caps: PinFlags,

    /// The current configuration of the pin.
    pub flags: PinFlags,
}

/// The size of an encoded [`PinRecord`].
pub const PIN_RECORD_SIZE: usize = mem::size_of::<PinRecord>();

const NAME_START: usize = 4;
const CAPS_START: usize = NAME_START + NAME_MAX;
const FLAGS_START: usize = CAPS_START + 4;

impl PinRecord {
    /// A record requesting the configuration of a pin.
    ///
    /// The name, caps and flags are zeroed.
    pub fn query(pin: Offset) -> PinRecord {
        PinRecord {
            pin,
            ..Default::default()
        }
    }

    /// A complete record, typically destined for [`set_pin_config`].
    pub fn new(pin: Offset, name: Name, caps: PinFlags, flags: PinFlags) -> PinRecord {
        PinRecord {
            pin,
            name,
            caps,
            flags,
        }
    }

    /// Encode the record in the layout expected by the kernel.
    pub fn to_bytes(&self) -> [u8; PIN_RECORD_SIZE] {
        let mut d = [0u8; PIN_RECORD_SIZE];
        d[..NAME_START].copy_from_slice(&self.pin.to_ne_bytes());
        d[NAME_START..CAPS_START].copy_from_slice(self.name.as_bytes());
        d[CAPS_START..FLAGS_START].copy_from_slice(&self.caps.bits().to_ne_bytes());
        d[FLAGS_START..].copy_from_slice(&self.flags.bits().to_ne_bytes());
        d
    }

    /// Decode a record returned by the kernel.
    ///
    /// The buffer must be exactly [`PIN_RECORD_SIZE`] long and the name must be UTF-8.
    pub fn from_bytes(d: &[u8]) -> Result<PinRecord> {
        check_size("PinRecord", PIN_RECORD_SIZE, d)?;
        let mut name = [0u8; NAME_MAX];
        name.copy_from_slice(&d[NAME_START..CAPS_START]);
        let pr = PinRecord {
            pin: u32_at(d, 0),
            name: Name::from_field(&name),
            caps: PinFlags::from_bits_retain(u32_at(d, CAPS_START)),
            flags: PinFlags::from_bits_retain(u32_at(d, FLAGS_START)),
        };
        pr.validate().map(|_| pr).map_err(Error::from)
    }

    /// Check that a PinRecord read from the kernel is valid in Rust.
    fn validate(&self) -> ValidationResult {
        self.name
            .as_str()
            .map(|_| ())
            .map_err(|e| ValidationError::new("name", e.to_string()))
    }
}

/// The level request record for a single pin (`struct gpio_req`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PinRequest {
    /// The pin offset on the controller.
    pub pin: Offset,

    /// The level, 0 for low and 1 for high.
    ///
    /// Any non-zero value read back is taken as high.
    pub value: u32,
}

/// The size of an encoded [`PinRequest`].
pub const PIN_REQUEST_SIZE: usize = mem::size_of::<PinRequest>();

impl PinRequest {
    /// A request for the level of a pin, or to set it.
    pub fn new(pin: Offset, value: bool) -> PinRequest {
        PinRequest {
            pin,
            value: value as u32,
        }
    }

    /// The level as a bool.
    #[inline]
    pub fn level(&self) -> bool {
        self.value != 0
    }

    /// Encode the request in the layout expected by the kernel.
    pub fn to_bytes(&self) -> [u8; PIN_REQUEST_SIZE] {
        let mut d = [0u8; PIN_REQUEST_SIZE];
        d[..4].copy_from_slice(&self.pin.to_ne_bytes());
        d[4..].copy_from_slice(&self.value.to_ne_bytes());
        d
    }

    /// Decode a request returned by the kernel.
    pub fn from_bytes(d: &[u8]) -> Result<PinRequest> {
        check_size("PinRequest", PIN_REQUEST_SIZE, d)?;
        Ok(PinRequest {
            pin: u32_at(d, 0),
            value: u32_at(d, 4),
        })
    }
}

/// The reply to a pin count query.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MaxPin {
    /// The number of pins on the controller.
    pub count: libc::c_int,
}

/// The size of an encoded [`MaxPin`].
pub const MAX_PIN_SIZE: usize = mem::size_of::<MaxPin>();

impl MaxPin {
    /// Encode the query, which is all zeroes.
    pub fn to_bytes(&self) -> [u8; MAX_PIN_SIZE] {
        self.count.to_ne_bytes()
    }

    /// Decode the reply to a pin count query.
    pub fn from_bytes(d: &[u8]) -> Result<MaxPin> {
        check_size("MaxPin", MAX_PIN_SIZE, d)?;
        let mut b = [0u8; MAX_PIN_SIZE];
        b.copy_from_slice(d);
        let mp = MaxPin {
            count: libc::c_int::from_ne_bytes(b),
        };
        if mp.count < 0 {
            return Err(Error::from(ValidationError::new(
                "count",
                format!("negative pin count: {}", mp.count),
            )));
        }
        Ok(mp)
    }
}

#[inline]
fn u32_at(d: &[u8], start: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&d[start..start + 4]);
    u32::from_ne_bytes(b)
}

impl Ioctl {
    /// The request code passed to the kernel.
    pub fn code(self) -> IoctlRequest {
        match self {
            Ioctl::MaxPin => ior!(self, MaxPin),
            Ioctl::GetConfig => iorw!(self, PinRecord),
            Ioctl::SetConfig => iow!(self, PinRecord),
            Ioctl::Get => iorw!(self, PinRequest),
            Ioctl::Set => iow!(self, PinRequest),
            Ioctl::Toggle => iorw!(self, PinRequest),
            Ioctl::SetName => iow!(self, PinRecord),
        }
    }

    /// The size of the argument record for the request.
    pub fn arg_size(self) -> usize {
        match self {
            Ioctl::MaxPin => MAX_PIN_SIZE,
            Ioctl::GetConfig | Ioctl::SetConfig | Ioctl::SetName => PIN_RECORD_SIZE,
            Ioctl::Get | Ioctl::Set | Ioctl::Toggle => PIN_REQUEST_SIZE,
        }
    }
}

// Issue the request and confirm the reply fills the record.
fn call<D: Device + ?Sized>(
    d: &D,
    request: Ioctl,
    obj: &'static str,
    arg: &mut [u8],
) -> Result<()> {
    let n = d.ioctl(request, arg)?;
    if n != arg.len() {
        return Err(Error::from(SizeError::new(obj, arg.len(), n)));
    }
    Ok(())
}

/// Get the number of pins on the controller.
///
/// * `d` - The open controller.
pub fn get_max_pin<D: Device + ?Sized>(d: &D) -> Result<u32> {
    let mut buf = MaxPin::default().to_bytes();
    call(d, Ioctl::MaxPin, "MaxPin", &mut buf)?;
    MaxPin::from_bytes(&buf).map(|mp| mp.count as u32)
}

/// Get the name, capabilities and flags of a pin.
///
/// * `d` - The open controller.
/// * `pin` - The offset of the pin.
pub fn get_pin_config<D: Device + ?Sized>(d: &D, pin: Offset) -> Result<PinRecord> {
    let mut buf = PinRecord::query(pin).to_bytes();
    call(d, Ioctl::GetConfig, "PinRecord", &mut buf)?;
    let pr = PinRecord::from_bytes(&buf)?;
    if pr.pin != pin {
        return Err(Error::from(ValidationError::new(
            "pin",
            format!("requested {} but got {}", pin, pr.pin),
        )));
    }
    Ok(pr)
}

/// Update the flags of a pin.
///
/// The kernel only applies the flags, the caps are ignored.
///
/// * `d` - The open controller.
/// * `pr` - The record to be written.
pub fn set_pin_config<D: Device + ?Sized>(d: &D, pr: &PinRecord) -> Result<()> {
    let mut buf = pr.to_bytes();
    call(d, Ioctl::SetConfig, "PinRecord", &mut buf)
}

/// Update the name of a pin.
///
/// * `d` - The open controller.
/// * `pin` - The offset of the pin.
/// * `name` - The new name.
pub fn set_pin_name<D: Device + ?Sized>(d: &D, pin: Offset, name: Name) -> Result<()> {
    let pr = PinRecord {
        pin,
        name,
        ..Default::default()
    };
    let mut buf = pr.to_bytes();
    call(d, Ioctl::SetName, "PinRecord", &mut buf)
}

/// Read the level of a pin.
///
/// * `d` - The open controller.
/// * `pin` - The offset of the pin.
pub fn get_pin<D: Device + ?Sized>(d: &D, pin: Offset) -> Result<bool> {
    let mut buf = PinRequest::new(pin, false).to_bytes();
    call(d, Ioctl::Get, "PinRequest", &mut buf)?;
    PinRequest::from_bytes(&buf).map(|pr| pr.level())
}

/// Set the level of a pin.
///
/// * `d` - The open controller.
/// * `pin` - The offset of the pin.
/// * `value` - The level to set.
pub fn set_pin<D: Device + ?Sized>(d: &D, pin: Offset, value: bool) -> Result<()> {
    let mut buf = PinRequest::new(pin, value).to_bytes();
    call(d, Ioctl::Set, "PinRequest", &mut buf)
}

/// Invert the level of a pin.
///
/// * `d` - The open controller.
/// * `pin` - The offset of the pin.
pub fn toggle_pin<D: Device + ?Sized>(d: &D, pin: Offset) -> Result<()> {
    let mut buf = PinRequest::new(pin, false).to_bytes();
    call(d, Ioctl::Toggle, "PinRequest", &mut buf)
}
