// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;

#[test]
fn count() {
    for n in [0, 1, 16, 200] {
        let s = gpioc_sim::simpleton(n);
        assert_eq!(get_max_pin(&s).unwrap(), n);
    }
}

#[test]
fn negative() {
    let d = Canned(libc::c_int::to_ne_bytes(-3).to_vec());
    match get_max_pin(&d) {
        Err(Error::Validation(e)) => assert_eq!(e.field, "count"),
        x => panic!("unexpected result: {:?}", x),
    }
}

#[test]
fn short_reply() {
    let s = gpioc_sim::simpleton(4);
    s.inject(Ioctl::MaxPin, Fault::Short(2));
    assert_eq!(
        get_max_pin(&s).unwrap_err().to_string(),
        "MaxPin is 4 bytes but the device returned 2"
    );
}

#[test]
fn os_error() {
    let s = gpioc_sim::simpleton(4);
    s.inject(Ioctl::MaxPin, Fault::Errno(libc::ENOTTY));
    match get_max_pin(&s) {
        Err(Error::Os(e)) => assert_eq!(e.raw_os_error(), Some(libc::ENOTTY)),
        x => panic!("unexpected result: {:?}", x),
    }
}
