// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;

#[test]
fn toggle() {
    let s = gpioc_sim::simpleton(4);
    toggle_pin(&s, 2).unwrap();
    assert!(s.pin(2).level);
    toggle_pin(&s, 2).unwrap();
    assert!(!s.pin(2).level);
    // the others are untouched
    assert!(!s.pin(1).level);
    assert!(!s.pin(3).level);
}

#[test]
fn invalid_pin() {
    let s = gpioc_sim::simpleton(4);
    assert!(matches!(toggle_pin(&s, 9), Err(Error::Os(_))));
}
