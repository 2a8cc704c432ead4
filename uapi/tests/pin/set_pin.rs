// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;

#[test]
fn levels() {
    let s = gpioc_sim::simpleton(4);
    set_pin(&s, 1, true).unwrap();
    assert!(s.pin(1).level);
    assert!(get_pin(&s, 1).unwrap());
    set_pin(&s, 1, false).unwrap();
    assert!(!s.pin(1).level);
}

#[test]
fn request_encoding() {
    let s = gpioc_sim::simpleton(4);
    set_pin(&s, 3, true).unwrap();
    set_pin(&s, 3, false).unwrap();
    let calls = s.calls();
    assert_eq!(calls[0].arg, PinRequest { pin: 3, value: 1 }.to_bytes().to_vec());
    assert_eq!(calls[1].arg, PinRequest { pin: 3, value: 0 }.to_bytes().to_vec());
}

#[test]
fn os_error() {
    let s = gpioc_sim::simpleton(4);
    s.inject(Ioctl::Set, Fault::Errno(libc::EBUSY));
    match set_pin(&s, 1, true) {
        Err(Error::Os(e)) => assert_eq!(e.raw_os_error(), Some(libc::EBUSY)),
        x => panic!("unexpected result: {:?}", x),
    }
    assert!(!s.pin(1).level);
}
