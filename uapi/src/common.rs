// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::Error as IoError;
use std::os::unix::io::AsRawFd;
use std::str::{FromStr, Utf8Error};

pub(crate) const IOCTL_MAGIC: u8 = b'G';

#[cfg(any(target_env = "musl", target_os = "android"))]
pub type IoctlRequest = libc::c_int;
#[cfg(not(any(target_env = "musl", target_os = "android")))]
pub type IoctlRequest = libc::c_ulong;

macro_rules! ior {
    ($nr:expr, $dty:ty) => {
        ioctl_sys::ior!(IOCTL_MAGIC, $nr as u8, std::mem::size_of::<$dty>()) as IoctlRequest
    };
}
pub(crate) use ior;

macro_rules! iow {
    ($nr:expr, $dty:ty) => {
        ioctl_sys::iow!(IOCTL_MAGIC, $nr as u8, std::mem::size_of::<$dty>()) as IoctlRequest
    };
}
pub(crate) use iow;

macro_rules! iorw {
    ($nr:expr, $dty:ty) => {
        ioctl_sys::iorw!(IOCTL_MAGIC, $nr as u8, std::mem::size_of::<$dty>()) as IoctlRequest
    };
}
pub(crate) use iorw;

/// The operations supported by the gpioc controller device.
///
/// The discriminant is the ioctl number within the `'G'` group.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Ioctl {
    /// Read the number of pins on the controller.
    MaxPin = 0,
    /// Read the name, capabilities and flags of a pin.
    GetConfig = 1,
    /// Write the flags of a pin.
    SetConfig = 2,
    /// Read the level of a pin.
    Get = 3,
    /// Write the level of a pin.
    Set = 4,
    /// Invert the level of a pin.
    Toggle = 5,
    /// Write the name of a pin.
    SetName = 6,
}

/// Something that can carry a gpioc ioctl to a controller.
///
/// Implemented for the open controller [`File`].
/// Other implementations, such as simulators, may stand in for the kernel.
pub trait Device {
    /// Issue the request using `arg` as the argument buffer.
    ///
    /// The buffer is both the request and, for read requests, the reply.
    /// Returns the number of valid bytes in the buffer after the call.
    fn ioctl(&self, request: Ioctl, arg: &mut [u8]) -> std::io::Result<usize>;
}

impl Device for File {
    fn ioctl(&self, request: Ioctl, arg: &mut [u8]) -> std::io::Result<usize> {
        debug_assert_eq!(arg.len(), request.arg_size());
        // SAFETY: arg is sized to match the size encoded in the request code,
        // so the kernel cannot copy beyond it.
        match unsafe { libc::ioctl(self.as_raw_fd(), request.code(), arg.as_mut_ptr()) } {
            -1 => Err(IoError::last_os_error()),
            _ => Ok(arg.len()),
        }
    }
}

impl<D: Device + ?Sized> Device for &D {
    #[inline]
    fn ioctl(&self, request: Ioctl, arg: &mut [u8]) -> std::io::Result<usize> {
        (**self).ioctl(request, arg)
    }
}

impl<D: Device + ?Sized> Device for Box<D> {
    #[inline]
    fn ioctl(&self, request: Ioctl, arg: &mut [u8]) -> std::io::Result<usize> {
        (**self).ioctl(request, arg)
    }
}

/// The result returned by [`gpioc_uapi`] functions.
///
/// [`gpioc_uapi`]: crate
pub type Result<T> = std::result::Result<T, Error>;

/// Result returned by struct validators.
pub type ValidationResult = std::result::Result<(), ValidationError>;

/// Errors returned by [`gpioc_uapi`] functions.
///
/// [`gpioc_uapi`]: crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error returned from an underlying system call.
    #[error(transparent)]
    Os(#[from] std::io::Error),

    /// The reply from the device was not the size of the expected record.
    #[error(transparent)]
    Size(#[from] SizeError),

    /// The reply from the device decoded to an invalid value.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A name does not fit in the fixed name field.
    #[error("name is {0} bytes long, the maximum is {}", NAME_LEN_MAX)]
    NameTooLong(usize),
}

/// A failure to validate a struct returned from a system call.
//
// Should only be seen if the driver reports something the ABI cannot describe.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
#[error("Kernel returned invalid {field}: {msg}")]
pub struct ValidationError {
    pub field: String,
    pub msg: String,
}

impl ValidationError {
    pub fn new<S: Into<String>, T: Into<String>>(field: S, msg: T) -> ValidationError {
        ValidationError {
            field: field.into(),
            msg: msg.into(),
        }
    }
}

/// A reply buffer that does not match the size of the record it should contain.
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
#[error("{obj} is {expected} bytes but the device returned {found}")]
pub struct SizeError {
    pub obj: &'static str,
    pub expected: usize,
    pub found: usize,
}

impl SizeError {
    pub fn new(obj: &'static str, expected: usize, found: usize) -> SizeError {
        SizeError {
            obj,
            expected,
            found,
        }
    }
}

/// Fail unless the buffer is exactly the size of the record.
pub(crate) fn check_size(obj: &'static str, expected: usize, d: &[u8]) -> Result<()> {
    if d.len() != expected {
        return Err(Error::from(SizeError::new(obj, expected, d.len())));
    }
    Ok(())
}

/// The size of the name field in a pin record.
pub const NAME_MAX: usize = 64;

/// The maximum length of a name, leaving room for the terminating NUL.
pub const NAME_LEN_MAX: usize = NAME_MAX - 1;

/// An identifier for a pin on a particular controller.
///
/// Valid offsets are in the range 0..`count` as reported by [`get_max_pin`].
///
/// [`get_max_pin`]: crate::get_max_pin
pub type Offset = u32;

/// A NUL terminated pin name, as stored in the fixed name field.
#[repr(C)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Name([u8; NAME_MAX]);

impl Name {
    /// Checks whether the Name is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    /// The length of the contained name.
    #[inline]
    pub fn strlen(&self) -> usize {
        self.0.iter().position(|&x| x == 0).unwrap_or(self.0.len())
    }

    /// The contained name, up to the first NUL.
    pub fn as_str(&self) -> std::result::Result<&str, Utf8Error> {
        std::str::from_utf8(&self.0[..self.strlen()])
    }

    /// The raw field, including any trailing NULs.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; NAME_MAX] {
        &self.0
    }

    /// Construct a Name from the raw field contents.
    ///
    /// The field is taken verbatim, so the name may fill all of it.
    pub fn from_field(s: &[u8; NAME_MAX]) -> Name {
        Name(*s)
    }
}

impl Default for Name {
    fn default() -> Self {
        Name([0; NAME_MAX])
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let b = s.as_bytes();
        if b.len() > NAME_LEN_MAX {
            return Err(Error::NameTooLong(b.len()));
        }
        let mut n = Name::default();
        n.0[..b.len()].copy_from_slice(b);
        Ok(n)
    }
}

impl TryFrom<&str> for Name {
    type Error = Error;

    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        Name::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_name_from_str() {
        let mut x = [0u8; NAME_MAX];
        x[..6].copy_from_slice(b"banana");
        let mut a = Name::from_str("banana").unwrap();
        assert_eq!(a.0, x);
        a = Name::from_str("apple").unwrap();
        x[..6].copy_from_slice(b"apple\0");
        assert_eq!(a.0, x);
    }

    #[test]
    fn test_name_too_long() {
        let long = "A".repeat(NAME_LEN_MAX);
        assert_eq!(Name::from_str(&long).unwrap().strlen(), NAME_LEN_MAX);
        let longer = "A".repeat(NAME_MAX);
        match Name::from_str(&longer) {
            Err(Error::NameTooLong(n)) => assert_eq!(n, NAME_MAX),
            x => panic!("unexpected result: {:?}", x),
        }
    }

    #[test]
    fn test_name_is_empty() {
        let mut a = Name::default();
        assert!(a.is_empty());
        a = Name::from_str("banana").unwrap();
        assert!(!a.is_empty());
    }

    #[test]
    fn test_name_strlen() {
        let mut a = Name::default();
        assert_eq!(a.strlen(), 0);
        a = Name::from_str("banana").unwrap();
        assert_eq!(a.strlen(), 6);
        a = Name::from_field(&[b'x'; NAME_MAX]);
        assert_eq!(a.strlen(), NAME_MAX);
    }

    #[test]
    fn test_name_as_str() {
        let mut a = Name::default();
        assert_eq!(a.as_str(), Ok(""));
        a = Name::from_str("pin 13").unwrap();
        assert_eq!(a.as_str(), Ok("pin 13"));
        let mut raw = [0u8; NAME_MAX];
        raw[0] = b'a';
        raw[1] = 0xff;
        a = Name::from_field(&raw);
        assert!(a.as_str().is_err());
    }

    #[test]
    fn test_name_ignores_after_nul() {
        let mut raw = [0u8; NAME_MAX];
        raw[..3].copy_from_slice(b"gp0");
        raw[4..8].copy_from_slice(b"junk");
        let a = Name::from_field(&raw);
        assert_eq!(a.as_str(), Ok("gp0"));
    }

    #[test]
    fn test_name_default() {
        assert_eq!(Name::default().0, [0u8; NAME_MAX]);
    }

    #[test]
    fn test_check_size() {
        assert!(check_size("Thing", 4, &[0; 4]).is_ok());
        match check_size("Thing", 4, &[0; 3]) {
            Err(Error::Size(e)) => {
                assert_eq!(e, SizeError::new("Thing", 4, 3));
                assert_eq!(e.to_string(), "Thing is 4 bytes but the device returned 3");
            }
            x => panic!("unexpected result: {:?}", x),
        }
    }

    #[test]
    fn test_size_name() {
        assert_eq!(
            size_of::<Name>(),
            NAME_MAX,
            concat!("Size of: ", stringify!(Name))
        );
    }
}
