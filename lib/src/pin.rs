// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{Error, Offset, Result};
use gpioc_uapi::{PinFlags, PinRecord};
#[cfg(feature = "serde")]
use serde_derive::Serialize;
use std::fmt;

/// A category of pin configuration that maps onto a group of flag bits.
///
/// A capability mask may contain several bits from the group, while a
/// configuration holds at most one.
pub trait Attribute: Copy + Eq + fmt::Debug + Into<Setting> + 'static {
    /// All the bits belonging to the category.
    const MASK: PinFlags;

    /// Every value in the category, in bit order.
    const ALL: &'static [Self];

    /// The name of the category.
    const NAME: &'static str;

    /// The bit representing the value.
    fn flag(self) -> PinFlags;

    /// All the values with their bit set in the flags.
    fn from_caps(flags: PinFlags) -> Vec<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|a| flags.contains(a.flag()))
            .collect()
    }

    /// The single value with its bit set in the flags, if any.
    ///
    /// Fails if more than one bit from the category is set.
    fn from_flags(flags: PinFlags) -> Result<Option<Self>> {
        let mut set = Self::ALL.iter().copied().filter(|a| flags.contains(a.flag()));
        let first = set.next();
        if set.next().is_some() {
            return Err(Error::DeviceProtocol(format!(
                "flags {:#x} contain more than one {}",
                (flags & Self::MASK).bits(),
                Self::NAME
            )));
        }
        Ok(first)
    }
}

/// The direction of a pin.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    /// The pin is an input.
    Input,

    /// The pin is an output.
    Output,
}

impl Attribute for Direction {
    const MASK: PinFlags = PinFlags::INPUT.union(PinFlags::OUTPUT);
    const ALL: &'static [Self] = &[Direction::Input, Direction::Output];
    const NAME: &'static str = "direction";

    fn flag(self) -> PinFlags {
        match self {
            Direction::Input => PinFlags::INPUT,
            Direction::Output => PinFlags::OUTPUT,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

/// The electrical drive of an output pin.
///
/// An output with no drive flag set uses the driver's default drive.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Drive {
    /// The pin is driven low and left high impedance when high.
    OpenDrain,

    /// The pin may be switched to high impedance.
    TriState,
}

impl Attribute for Drive {
    const MASK: PinFlags = PinFlags::OPEN_DRAIN.union(PinFlags::TRISTATE);
    const ALL: &'static [Self] = &[Drive::OpenDrain, Drive::TriState];
    const NAME: &'static str = "drive";

    fn flag(self) -> PinFlags {
        match self {
            Drive::OpenDrain => PinFlags::OPEN_DRAIN,
            Drive::TriState => PinFlags::TRISTATE,
        }
    }
}

impl fmt::Display for Drive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Drive::OpenDrain => write!(f, "open-drain"),
            Drive::TriState => write!(f, "tri-state"),
        }
    }
}

/// The internal bias resistor of a pin.
///
/// A pin with no pull flag set floats.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Pull {
    /// The pin is pulled up.
    PullUp,

    /// The pin is pulled down.
    PullDown,
}

impl Attribute for Pull {
    const MASK: PinFlags = PinFlags::PULL_UP.union(PinFlags::PULL_DOWN);
    const ALL: &'static [Self] = &[Pull::PullUp, Pull::PullDown];
    const NAME: &'static str = "pull";

    fn flag(self) -> PinFlags {
        match self {
            Pull::PullUp => PinFlags::PULL_UP,
            Pull::PullDown => PinFlags::PULL_DOWN,
        }
    }
}

impl fmt::Display for Pull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pull::PullUp => write!(f, "pull-up"),
            Pull::PullDown => write!(f, "pull-down"),
        }
    }
}

/// A single configurable setting of a pin.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Setting {
    /// A direction.
    Direction(Direction),

    /// A drive.
    Drive(Drive),

    /// A pull.
    Pull(Pull),

    /// Hardware inversion of the input level.
    InvertInput,

    /// Hardware inversion of the output level.
    InvertOutput,

    /// Hardware pulsing of the pin.
    HardwarePulsate,
}

impl From<Direction> for Setting {
    fn from(d: Direction) -> Self {
        Setting::Direction(d)
    }
}

impl From<Drive> for Setting {
    fn from(d: Drive) -> Self {
        Setting::Drive(d)
    }
}

impl From<Pull> for Setting {
    fn from(p: Pull) -> Self {
        Setting::Pull(p)
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Direction(d) => write!(f, "direction {}", d),
            Setting::Drive(d) => write!(f, "drive {}", d),
            Setting::Pull(p) => write!(f, "pull {}", p),
            Setting::InvertInput => write!(f, "input inversion"),
            Setting::InvertOutput => write!(f, "output inversion"),
            Setting::HardwarePulsate => write!(f, "hardware pulsing"),
        }
    }
}

/// What a pin is capable of, as reported by the driver.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Capabilities {
    /// The directions the pin supports.
    pub direction: Vec<Direction>,

    /// The drives the pin supports.
    pub drive: Vec<Drive>,

    /// The pulls the pin supports.
    pub pull: Vec<Pull>,

    /// The input level can be inverted.
    pub invert_input: bool,

    /// The output level can be inverted.
    pub invert_output: bool,

    /// The pin can be pulsed by the hardware.
    pub hardware_pulsate: bool,
}

impl From<PinFlags> for Capabilities {
    fn from(caps: PinFlags) -> Self {
        Capabilities {
            direction: Direction::from_caps(caps),
            drive: Drive::from_caps(caps),
            pull: Pull::from_caps(caps),
            invert_input: caps.contains(PinFlags::INVERT_IN),
            invert_output: caps.contains(PinFlags::INVERT_OUT),
            hardware_pulsate: caps.contains(PinFlags::PULSATE),
        }
    }
}

impl Capabilities {
    /// The flags representing the capabilities.
    pub fn to_flags(&self) -> PinFlags {
        let mut flags = PinFlags::empty();
        flags.extend(self.direction.iter().map(|d| d.flag()));
        flags.extend(self.drive.iter().map(|d| d.flag()));
        flags.extend(self.pull.iter().map(|p| p.flag()));
        flags.set(PinFlags::INVERT_IN, self.invert_input);
        flags.set(PinFlags::INVERT_OUT, self.invert_output);
        flags.set(PinFlags::PULSATE, self.hardware_pulsate);
        flags
    }

    /// Check if the pin supports the setting.
    pub fn supports(&self, s: Setting) -> bool {
        match s {
            Setting::Direction(d) => self.direction.contains(&d),
            Setting::Drive(d) => self.drive.contains(&d),
            Setting::Pull(p) => self.pull.contains(&p),
            Setting::InvertInput => self.invert_input,
            Setting::InvertOutput => self.invert_output,
            Setting::HardwarePulsate => self.hardware_pulsate,
        }
    }
}

/// The current configuration of a pin.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// The direction of the pin.
    pub direction: Direction,

    /// The drive of the pin, if other than the default.
    pub drive: Option<Drive>,

    /// The pull of the pin, if any.
    pub pull: Option<Pull>,

    /// The input level is inverted.
    pub invert_input: bool,

    /// The output level is inverted.
    pub invert_output: bool,

    /// The pin is being pulsed by the hardware.
    pub hardware_pulsate: bool,
}

impl TryFrom<PinFlags> for Config {
    type Error = Error;

    fn try_from(flags: PinFlags) -> Result<Self> {
        let direction = Direction::from_flags(flags)?.ok_or_else(|| {
            Error::DeviceProtocol(format!("flags {:#x} contain no direction", flags.bits()))
        })?;
        Ok(Config {
            direction,
            drive: Drive::from_flags(flags)?,
            pull: Pull::from_flags(flags)?,
            invert_input: flags.contains(PinFlags::INVERT_IN),
            invert_output: flags.contains(PinFlags::INVERT_OUT),
            hardware_pulsate: flags.contains(PinFlags::PULSATE),
        })
    }
}

impl Config {
    /// The flags representing the configuration.
    pub fn to_flags(&self) -> PinFlags {
        let mut flags = self.direction.flag();
        if let Some(d) = self.drive {
            flags |= d.flag();
        }
        if let Some(p) = self.pull {
            flags |= p.flag();
        }
        flags.set(PinFlags::INVERT_IN, self.invert_input);
        flags.set(PinFlags::INVERT_OUT, self.invert_output);
        flags.set(PinFlags::PULSATE, self.hardware_pulsate);
        flags
    }
}

/// Replace the value of a category in the flags.
///
/// Only the bits of the value's category are altered.
///
/// Returns None, leaving the flags untouched, if the value is not in the caps.
pub fn apply_change<A: Attribute>(flags: PinFlags, value: A, caps: PinFlags) -> Option<PinFlags> {
    if !caps.contains(value.flag()) {
        return None;
    }
    Some(flags.difference(A::MASK).union(value.flag()))
}

/// Set or clear a single boolean flag.
///
/// Returns None if the flag is being set and is not in the caps.
/// Clearing is always possible.
pub fn apply_switch(flags: PinFlags, flag: PinFlags, on: bool, caps: PinFlags) -> Option<PinFlags> {
    if on && !caps.contains(flag) {
        return None;
    }
    let mut flags = flags;
    flags.set(flag, on);
    Some(flags)
}

/// The publicly available information for a pin.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Info {
    /// The pin offset on the controller.
    pub offset: Offset,

    /// The name of the pin.
    ///
    /// May be empty.
    pub name: String,

    /// What the pin is capable of.
    pub capabilities: Capabilities,

    /// The current configuration of the pin.
    pub config: Config,

    /// The raw capabilities, including any bits not described above.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_bits"))]
    pub caps: PinFlags,

    /// The raw configuration, including any bits not described above.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_bits"))]
    pub flags: PinFlags,
}

#[cfg(feature = "serde")]
fn serialize_bits<S: serde::Serializer>(
    f: &PinFlags,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u32(f.bits())
}

impl TryFrom<&PinRecord> for Info {
    type Error = Error;

    fn try_from(pr: &PinRecord) -> Result<Self> {
        let protocol = |msg: String| Error::DeviceProtocol(format!("pin {}: {}", pr.pin, msg));
        let name = pr.name.as_str().map_err(|e| protocol(e.to_string()))?;
        let capabilities = Capabilities::from(pr.caps);
        let config = Config::try_from(pr.flags).map_err(|e| protocol(e.to_string()))?;
        let settings = [
            Some(Setting::from(config.direction)),
            config.drive.map(Setting::from),
            config.pull.map(Setting::from),
        ];
        for s in settings.into_iter().flatten() {
            if !capabilities.supports(s) {
                return Err(protocol(format!("configured {} is not a capability", s)));
            }
        }
        Ok(Info {
            offset: pr.pin,
            name: name.to_string(),
            capabilities,
            config,
            caps: pr.caps,
            flags: pr.flags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod attribute {
        use super::*;

        #[test]
        fn masks() {
            assert_eq!(Direction::MASK.bits(), 0x03);
            assert_eq!(Drive::MASK.bits(), 0x14);
            assert_eq!(Pull::MASK.bits(), 0x60);
        }

        #[test]
        fn from_caps() {
            let caps = PinFlags::from_bits_retain(0x8000_0077);
            assert_eq!(
                Direction::from_caps(caps),
                vec![Direction::Input, Direction::Output]
            );
            assert_eq!(Drive::from_caps(caps), vec![Drive::OpenDrain, Drive::TriState]);
            assert_eq!(Pull::from_caps(caps), vec![Pull::PullUp, Pull::PullDown]);
            assert!(Drive::from_caps(PinFlags::PUSH_PULL).is_empty());
        }

        #[test]
        fn from_flags() {
            assert_eq!(
                Direction::from_flags(PinFlags::OUTPUT).unwrap(),
                Some(Direction::Output)
            );
            assert_eq!(Pull::from_flags(PinFlags::INPUT).unwrap(), None);
            assert!(matches!(
                Pull::from_flags(Pull::MASK),
                Err(Error::DeviceProtocol(_))
            ));
        }
    }

    mod capabilities {
        use super::*;

        #[test]
        fn from_flags() {
            let caps = Capabilities::from(
                PinFlags::INPUT | PinFlags::OUTPUT | PinFlags::PULL_UP | PinFlags::INVERT_OUT,
            );
            assert_eq!(
                caps,
                Capabilities {
                    direction: vec![Direction::Input, Direction::Output],
                    drive: vec![],
                    pull: vec![Pull::PullUp],
                    invert_input: false,
                    invert_output: true,
                    hardware_pulsate: false,
                }
            );
            assert!(caps.supports(Setting::Pull(Pull::PullUp)));
            assert!(!caps.supports(Setting::Pull(Pull::PullDown)));
            assert!(caps.supports(Setting::InvertOutput));
            assert!(!caps.supports(Setting::InvertInput));
        }

        #[test]
        fn round_trip() {
            // the recognised bits survive, the rest are the caller's concern
            for bits in [0x0000_0000, 0x0000_03ff, 0x0000_0155, 0x0000_02aa, 0xffff_ffff] {
                let flags = PinFlags::from_bits_retain(bits);
                let caps = Capabilities::from(flags);
                let known = Direction::MASK
                    | Drive::MASK
                    | Pull::MASK
                    | PinFlags::INVERT_IN
                    | PinFlags::INVERT_OUT
                    | PinFlags::PULSATE;
                assert_eq!(caps.to_flags(), flags & known, "bits: {:#x}", bits);
                assert_eq!(Capabilities::from(caps.to_flags()), caps, "bits: {:#x}", bits);
            }
        }
    }

    mod config {
        use super::*;

        #[test]
        fn from_flags() {
            let cfg = Config::try_from(
                PinFlags::OUTPUT | PinFlags::OPEN_DRAIN | PinFlags::PULSATE | PinFlags::PRESET_LOW,
            )
            .unwrap();
            assert_eq!(
                cfg,
                Config {
                    direction: Direction::Output,
                    drive: Some(Drive::OpenDrain),
                    pull: None,
                    invert_input: false,
                    invert_output: false,
                    hardware_pulsate: true,
                }
            );
            assert_eq!(
                cfg.to_flags(),
                PinFlags::OUTPUT | PinFlags::OPEN_DRAIN | PinFlags::PULSATE
            );
        }

        #[test]
        fn no_direction() {
            match Config::try_from(PinFlags::PULL_UP) {
                Err(Error::DeviceProtocol(msg)) => {
                    assert_eq!(msg, "flags 0x20 contain no direction")
                }
                x => panic!("unexpected result: {:?}", x),
            }
        }

        #[test]
        fn both_directions() {
            match Config::try_from(PinFlags::INPUT | PinFlags::OUTPUT) {
                Err(Error::DeviceProtocol(msg)) => {
                    assert_eq!(msg, "flags 0x3 contain more than one direction")
                }
                x => panic!("unexpected result: {:?}", x),
            }
        }

        #[test]
        fn both_pulls() {
            assert!(matches!(
                Config::try_from(PinFlags::INPUT | PinFlags::PULL_UP | PinFlags::PULL_DOWN),
                Err(Error::DeviceProtocol(_))
            ));
        }
    }

    mod apply_change {
        use super::*;

        #[test]
        fn replaces_category() {
            let caps = Direction::MASK | Pull::MASK;
            let flags = PinFlags::INPUT | PinFlags::PULL_UP;
            assert_eq!(
                apply_change(flags, Direction::Output, caps),
                Some(PinFlags::OUTPUT | PinFlags::PULL_UP)
            );
            assert_eq!(
                apply_change(flags, Pull::PullDown, caps),
                Some(PinFlags::INPUT | PinFlags::PULL_DOWN)
            );
        }

        #[test]
        fn preserves_other_bits() {
            let caps = PinFlags::from_bits_retain(!0);
            for bits in [0x0000_0001, 0x8000_0ff1, 0xffff_fffe, 0x0001_0422] {
                let flags = PinFlags::from_bits_retain(bits);
                for d in Direction::ALL {
                    let f = apply_change(flags, *d, caps).unwrap();
                    assert_eq!(f - Direction::MASK, flags - Direction::MASK);
                }
                for d in Drive::ALL {
                    let f = apply_change(flags, *d, caps).unwrap();
                    assert_eq!(f - Drive::MASK, flags - Drive::MASK);
                }
                for p in Pull::ALL {
                    let f = apply_change(flags, *p, caps).unwrap();
                    assert_eq!(f - Pull::MASK, flags - Pull::MASK);
                    assert_eq!(f & Pull::MASK, p.flag());
                }
            }
        }

        #[test]
        fn unsupported() {
            assert_eq!(
                apply_change(PinFlags::OUTPUT, Direction::Input, PinFlags::OUTPUT),
                None
            );
            assert_eq!(
                apply_change(PinFlags::OUTPUT, Drive::TriState, PinFlags::OPEN_DRAIN),
                None
            );
        }

        #[test]
        fn switch() {
            let caps = PinFlags::INVERT_IN;
            assert_eq!(
                apply_switch(PinFlags::INPUT, PinFlags::INVERT_IN, true, caps),
                Some(PinFlags::INPUT | PinFlags::INVERT_IN)
            );
            assert_eq!(
                apply_switch(PinFlags::INPUT, PinFlags::INVERT_OUT, true, caps),
                None
            );
            assert_eq!(
                apply_switch(
                    PinFlags::INPUT | PinFlags::INVERT_OUT,
                    PinFlags::INVERT_OUT,
                    false,
                    caps
                ),
                Some(PinFlags::INPUT)
            );
        }
    }

    mod info {
        use super::*;
        use gpioc_uapi::Name;
        use std::str::FromStr;

        fn record(caps: u32, flags: u32) -> PinRecord {
            PinRecord::new(
                7,
                Name::from_str("led").unwrap(),
                PinFlags::from_bits_retain(caps),
                PinFlags::from_bits_retain(flags),
            )
        }

        #[test]
        fn from_record() {
            let info = Info::try_from(&record(0x1000_00e3, 0x1000_0022)).unwrap();
            assert_eq!(info.offset, 7);
            assert_eq!(info.name, "led");
            assert_eq!(info.config.direction, Direction::Output);
            assert_eq!(info.config.pull, Some(Pull::PullUp));
            assert!(info.capabilities.invert_input);
            assert_eq!(info.caps.bits(), 0x1000_00e3);
            assert_eq!(info.flags.bits(), 0x1000_0022);
        }

        #[test]
        fn direction_not_in_caps() {
            match Info::try_from(&record(0x01, 0x02)) {
                Err(Error::DeviceProtocol(msg)) => assert_eq!(
                    msg,
                    "pin 7: configured direction output is not a capability"
                ),
                x => panic!("unexpected result: {:?}", x),
            }
        }

        #[test]
        fn pull_not_in_caps() {
            assert!(matches!(
                Info::try_from(&record(0x21, 0x41)),
                Err(Error::DeviceProtocol(_))
            ));
        }

        #[test]
        fn bad_direction() {
            match Info::try_from(&record(0x03, 0x03)) {
                Err(Error::DeviceProtocol(msg)) => {
                    assert_eq!(msg, "pin 7: flags 0x3 contain more than one direction")
                }
                x => panic!("unexpected result: {:?}", x),
            }
        }
    }
}
