// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;

#[test]
fn flags() {
    let s = gpioc_sim::simpleton(4);
    let mut pr = get_pin_config(&s, 2).unwrap();
    pr.flags = PinFlags::OUTPUT | PinFlags::PULL_DOWN;
    set_pin_config(&s, &pr).unwrap();
    assert_eq!(s.pin(2).flags, PinFlags::OUTPUT | PinFlags::PULL_DOWN);
    assert_eq!(get_pin_config(&s, 2).unwrap(), pr);
}

#[test]
fn record_encoding() {
    let s = gpioc_sim::simpleton(4);
    let pr = PinRecord::new(
        1,
        "led".parse().unwrap(),
        gpioc_sim::DEFAULT_CAPS,
        PinFlags::from_bits_retain(0x8000_0002),
    );
    set_pin_config(&s, &pr).unwrap();
    let written = s.configs_written(1);
    assert_eq!(written, vec![pr.clone()]);
    assert_eq!(s.calls()[0].arg, pr.to_bytes().to_vec());
    assert_eq!(s.pin(1).flags.bits(), 0x8000_0002);
}

#[test]
fn rejected() {
    let s = gpioc_sim::simpleton(4);
    let pr = PinRecord::new(
        1,
        Name::default(),
        gpioc_sim::DEFAULT_CAPS,
        PinFlags::PULL_UP | PinFlags::PULL_DOWN | PinFlags::INPUT,
    );
    match set_pin_config(&s, &pr) {
        Err(Error::Os(e)) => assert_eq!(e.raw_os_error(), Some(libc::EINVAL)),
        x => panic!("unexpected result: {:?}", x),
    }
    assert_eq!(s.pin(1).flags, PinFlags::INPUT);
}

#[test]
fn invalid_pin() {
    let s = gpioc_sim::simpleton(4);
    let pr = PinRecord::new(4, Name::default(), PinFlags::empty(), PinFlags::INPUT);
    assert!(matches!(set_pin_config(&s, &pr), Err(Error::Os(_))));
}
