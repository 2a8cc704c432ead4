// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;

#[test]
fn rename() {
    let s = gpioc_sim::simpleton(4);
    set_pin_name(&s, 3, "banana".parse().unwrap()).unwrap();
    assert_eq!(s.pin(3).name, "banana");
    assert_eq!(get_pin_config(&s, 3).unwrap().name.as_str(), Ok("banana"));
    // the flags are untouched
    assert_eq!(s.pin(3).flags, PinFlags::INPUT);
    assert_eq!(s.requests(), vec![Ioctl::SetName, Ioctl::GetConfig]);
}

#[test]
fn longest() {
    let s = gpioc_sim::simpleton(4);
    let long = "x".repeat(NAME_LEN_MAX);
    set_pin_name(&s, 0, long.parse().unwrap()).unwrap();
    assert_eq!(s.pin(0).name, long);
}

#[test]
fn clear() {
    let s = gpioc_sim::simpleton(4);
    set_pin_name(&s, 1, Name::default()).unwrap();
    assert_eq!(s.pin(1).name, "");
}
