// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;

#[test]
fn levels() {
    let s = gpioc_sim::builder()
        .with_num_pins(4)
        .with_pin(2, Pin::new("high").level(true))
        .build();
    assert!(!get_pin(&s, 0).unwrap());
    assert!(!get_pin(&s, 1).unwrap());
    assert!(get_pin(&s, 2).unwrap());
    assert!(!get_pin(&s, 3).unwrap());
    s.set_level(0, true);
    assert!(get_pin(&s, 0).unwrap());
}

#[test]
fn non_zero_is_high() {
    let d = Canned(PinRequest { pin: 1, value: 7 }.to_bytes().to_vec());
    assert!(get_pin(&d, 1).unwrap());
}

#[test]
fn invalid_pin() {
    let s = gpioc_sim::simpleton(4);
    assert!(matches!(get_pin(&s, 4), Err(Error::Os(_))));
}

#[test]
fn long_reply() {
    let d = Canned(vec![0; 12]);
    match get_pin(&d, 1) {
        Err(Error::Size(e)) => assert_eq!(e, SizeError::new("PinRequest", 8, 12)),
        x => panic!("unexpected result: {:?}", x),
    }
}
