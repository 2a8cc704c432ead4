// SPDX-FileCopyrightText: 2022 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory stand-in for a gpioc controller.
//!
//! Simulators can be built using the [`Builder`].
//!
//! For simple tests that only need a number of plain input/output pins,
//! [`simpleton`] provides one directly.
//!
//! The [`Sim`] implements [`Device`], so it can be passed anywhere the open
//! controller file would be. It behaves like the kernel driver for the
//! requests it receives, and records every request so tests can check
//! exactly what was sent.
//!
//! [`Builder`]: fn.builder.html
//! [`simpleton`]: fn.simpleton.html

use gpioc_uapi::{
    Device, Ioctl, Offset, PinFlags, PinRecord, PinRequest, MAX_PIN_SIZE, PIN_RECORD_SIZE,
    PIN_REQUEST_SIZE,
};
use nohash_hasher::IntMap;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::time::Instant;

/// The capabilities given to pins that are not explicitly configured.
pub const DEFAULT_CAPS: PinFlags = PinFlags::INPUT
    .union(PinFlags::OUTPUT)
    .union(PinFlags::PULL_UP)
    .union(PinFlags::PULL_DOWN);

/// A simulated controller.
#[derive(Debug)]
pub struct Sim {
    /// The number of pins reported by the controller.
    count: u32,

    /// The state of each pin.
    pins: RefCell<IntMap<Offset, Pin>>,

    /// Every request received, in order.
    ///
    /// Grows without bound until [`Sim::clear_calls`].
    calls: RefCell<Vec<Call>>,

    /// Failures to inject, by request.
    faults: RefCell<HashMap<Ioctl, Fault>>,
}

/// A request received by the [`Sim`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Call {
    /// The request.
    pub request: Ioctl,

    /// The pin the request applied to.
    ///
    /// None for requests that apply to the controller.
    pub pin: Option<Offset>,

    /// The argument as received.
    pub arg: Vec<u8>,

    /// When the request was received.
    pub at: Instant,
}

/// A failure the [`Sim`] should report instead of performing a request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Fault {
    /// Fail the call with the errno.
    Errno(i32),

    /// Perform the call but report a reply of this length.
    Short(usize),
}

impl Sim {
    /// The number of pins on the controller.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// The current state of a pin.
    ///
    /// Panics if the pin does not exist.
    pub fn pin(&self, offset: Offset) -> Pin {
        self.pins.borrow()[&offset].clone()
    }

    /// Drive the level of a pin, as if externally driven.
    pub fn set_level(&self, offset: Offset, level: bool) {
        if let Some(p) = self.pins.borrow_mut().get_mut(&offset) {
            p.level = level;
        }
    }

    /// Overwrite the flags of a pin, as if changed by another process.
    pub fn set_flags(&self, offset: Offset, flags: PinFlags) {
        if let Some(p) = self.pins.borrow_mut().get_mut(&offset) {
            p.flags = flags;
        }
    }

    /// Report a failure for all subsequent calls of the request.
    pub fn inject(&self, request: Ioctl, fault: Fault) {
        self.faults.borrow_mut().insert(request, fault);
    }

    /// Stop reporting a failure for the request.
    pub fn clear_fault(&self, request: Ioctl) {
        self.faults.borrow_mut().remove(&request);
    }

    /// All the requests received so far.
    ///
    /// Every request is recorded until [`clear_calls`] is called, so
    /// long running loops, such as benches, should clear them each iteration.
    ///
    /// [`clear_calls`]: Sim::clear_calls
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// The kinds of the requests received so far.
    pub fn requests(&self) -> Vec<Ioctl> {
        self.calls.borrow().iter().map(|c| c.request).collect()
    }

    /// Forget the requests received so far.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// The levels written to a pin by [`Ioctl::Set`] requests, and when.
    pub fn levels_written(&self, offset: Offset) -> Vec<(Instant, bool)> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.request == Ioctl::Set && c.pin == Some(offset))
            .filter_map(|c| PinRequest::from_bytes(&c.arg).ok().map(|r| (c.at, r.level())))
            .collect()
    }

    /// The records written to a pin by [`Ioctl::SetConfig`] requests.
    pub fn configs_written(&self, offset: Offset) -> Vec<PinRecord> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.request == Ioctl::SetConfig && c.pin == Some(offset))
            .filter_map(|c| PinRecord::from_bytes(&c.arg).ok())
            .collect()
    }

    fn pin_of(request: Ioctl, arg: &[u8]) -> Option<Offset> {
        match request {
            Ioctl::MaxPin => None,
            _ => arg
                .get(..4)
                .map(|b| Offset::from_ne_bytes([b[0], b[1], b[2], b[3]])),
        }
    }

    fn perform(&self, request: Ioctl, arg: &mut [u8]) -> io::Result<()> {
        if arg.len() != request.arg_size() {
            return Err(errno(libc::EINVAL));
        }
        let mut pins = self.pins.borrow_mut();
        match request {
            Ioctl::MaxPin => {
                arg.copy_from_slice(&(self.count as libc::c_int).to_ne_bytes()[..MAX_PIN_SIZE]);
            }
            Ioctl::GetConfig => {
                let mut pr = PinRecord::from_bytes(arg).map_err(|_| errno(libc::EINVAL))?;
                let p = pins.get(&pr.pin).ok_or_else(|| errno(libc::EINVAL))?;
                pr.name = p.name.parse().unwrap_or_default();
                pr.caps = p.caps;
                pr.flags = p.flags;
                arg.copy_from_slice(&pr.to_bytes()[..PIN_RECORD_SIZE]);
            }
            Ioctl::SetConfig => {
                let pr = PinRecord::from_bytes(arg).map_err(|_| errno(libc::EINVAL))?;
                let p = pins.get_mut(&pr.pin).ok_or_else(|| errno(libc::EINVAL))?;
                check_flags(pr.flags)?;
                p.flags = pr.flags;
            }
            Ioctl::SetName => {
                let pr = PinRecord::from_bytes(arg).map_err(|_| errno(libc::EINVAL))?;
                let p = pins.get_mut(&pr.pin).ok_or_else(|| errno(libc::EINVAL))?;
                p.name = pr.name.as_str().unwrap_or_default().to_string();
            }
            Ioctl::Get => {
                let mut req = PinRequest::from_bytes(arg).map_err(|_| errno(libc::EINVAL))?;
                let p = pins.get(&req.pin).ok_or_else(|| errno(libc::EINVAL))?;
                req.value = p.level as u32;
                arg.copy_from_slice(&req.to_bytes()[..PIN_REQUEST_SIZE]);
            }
            Ioctl::Set => {
                let req = PinRequest::from_bytes(arg).map_err(|_| errno(libc::EINVAL))?;
                let p = pins.get_mut(&req.pin).ok_or_else(|| errno(libc::EINVAL))?;
                p.level = req.level();
            }
            Ioctl::Toggle => {
                let mut req = PinRequest::from_bytes(arg).map_err(|_| errno(libc::EINVAL))?;
                let p = pins.get_mut(&req.pin).ok_or_else(|| errno(libc::EINVAL))?;
                p.level = !p.level;
                req.value = p.level as u32;
                arg.copy_from_slice(&req.to_bytes()[..PIN_REQUEST_SIZE]);
            }
        }
        Ok(())
    }
}

impl Device for Sim {
    fn ioctl(&self, request: Ioctl, arg: &mut [u8]) -> io::Result<usize> {
        self.calls.borrow_mut().push(Call {
            request,
            pin: Sim::pin_of(request, arg),
            arg: arg.to_vec(),
            at: Instant::now(),
        });
        let fault = self.faults.borrow().get(&request).copied();
        match fault {
            Some(Fault::Errno(e)) => Err(errno(e)),
            Some(Fault::Short(n)) => self.perform(request, arg).map(|_| n),
            None => self.perform(request, arg).map(|_| arg.len()),
        }
    }
}

// The same combinations the kernel rejects.
fn check_flags(flags: PinFlags) -> io::Result<()> {
    let exclusive = [
        PinFlags::INPUT | PinFlags::OUTPUT,
        PinFlags::PULL_UP | PinFlags::PULL_DOWN,
    ];
    if exclusive.iter().any(|x| flags.contains(*x)) {
        return Err(errno(libc::EINVAL));
    }
    Ok(())
}

fn errno(e: i32) -> io::Error {
    io::Error::from_raw_os_error(e)
}

/// Start building a simulator.
pub fn builder() -> Builder {
    Builder::default()
}

/// A simulator with `num_pins` default pins.
///
/// Each pin can be an input or output, with pull-up or pull-down,
/// and starts as a low input.
pub fn simpleton(num_pins: u32) -> Sim {
    builder().with_num_pins(num_pins).build()
}

/// A builder of simulators.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Builder {
    /// The number of pins on the controller.
    pub num_pins: u32,

    /// Pins that differ from the default.
    pub pins: IntMap<Offset, Pin>,
}

impl Builder {
    /// Set the number of pins on the controller.
    pub fn with_num_pins(&mut self, num_pins: u32) -> &mut Self {
        self.num_pins = num_pins;
        self
    }

    /// Replace the default for a pin.
    ///
    /// The number of pins is extended to include the pin if necessary.
    pub fn with_pin(&mut self, offset: Offset, pin: &Pin) -> &mut Self {
        self.num_pins = self.num_pins.max(offset + 1);
        self.pins.insert(offset, pin.clone());
        self
    }

    /// Build the simulator.
    pub fn build(&mut self) -> Sim {
        let pins = (0..self.num_pins)
            .map(|offset| {
                let p = self
                    .pins
                    .get(&offset)
                    .cloned()
                    .unwrap_or_else(|| Pin::new(format!("pin {}", offset)));
                (offset, p)
            })
            .collect();
        Sim {
            count: self.num_pins,
            pins: RefCell::new(pins),
            calls: RefCell::new(Vec::new()),
            faults: RefCell::new(HashMap::new()),
        }
    }
}

/// The state of a simulated pin.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pin {
    /// The name reported for the pin.
    pub name: String,

    /// What the pin can do.
    pub caps: PinFlags,

    /// The current configuration of the pin.
    pub flags: PinFlags,

    /// The current level of the pin.
    pub level: bool,
}

impl Pin {
    /// A low input pin with the [`DEFAULT_CAPS`].
    pub fn new<N: Into<String>>(name: N) -> Pin {
        Pin {
            name: name.into(),
            caps: DEFAULT_CAPS,
            flags: PinFlags::INPUT,
            level: false,
        }
    }

    /// Set the capabilities of the pin.
    pub fn caps(&mut self, caps: PinFlags) -> &mut Self {
        self.caps = caps;
        self
    }

    /// Set the configuration of the pin.
    pub fn flags(&mut self, flags: PinFlags) -> &mut Self {
        self.flags = flags;
        self
    }

    /// Set the level of the pin.
    pub fn level(&mut self, level: bool) -> &mut Self {
        self.level = level;
        self
    }
}
