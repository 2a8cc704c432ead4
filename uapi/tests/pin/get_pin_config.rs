// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;

#[test]
fn record() {
    let s = gpioc_sim::builder()
        .with_num_pins(8)
        .with_pin(
            5,
            Pin::new("banana")
                .caps(PinFlags::OUTPUT | PinFlags::OPEN_DRAIN | PinFlags::INVERT_OUT)
                .flags(PinFlags::OUTPUT | PinFlags::OPEN_DRAIN),
        )
        .build();
    let pr = get_pin_config(&s, 5).unwrap();
    assert_eq!(pr.pin, 5);
    assert_eq!(pr.name.as_str(), Ok("banana"));
    assert_eq!(
        pr.caps,
        PinFlags::OUTPUT | PinFlags::OPEN_DRAIN | PinFlags::INVERT_OUT
    );
    assert_eq!(pr.flags, PinFlags::OUTPUT | PinFlags::OPEN_DRAIN);

    let pr = get_pin_config(&s, 2).unwrap();
    assert_eq!(pr.name.as_str(), Ok("pin 2"));
    assert_eq!(pr.caps, gpioc_sim::DEFAULT_CAPS);
    assert_eq!(pr.flags, PinFlags::INPUT);
}

#[test]
fn query_encoding() {
    let s = gpioc_sim::simpleton(4);
    get_pin_config(&s, 3).unwrap();
    let calls = s.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].request, Ioctl::GetConfig);
    assert_eq!(calls[0].arg.len(), PIN_RECORD_SIZE);
    assert_eq!(calls[0].arg[..4], 3u32.to_ne_bytes());
    assert!(calls[0].arg[4..].iter().all(|&b| b == 0));
}

#[test]
fn unknown_bits() {
    let s = gpioc_sim::builder()
        .with_pin(
            0,
            Pin::new("odd")
                .caps(PinFlags::from_bits_retain(0xf000_0003))
                .flags(PinFlags::from_bits_retain(0x0800_0001)),
        )
        .build();
    let pr = get_pin_config(&s, 0).unwrap();
    assert_eq!(pr.caps.bits(), 0xf000_0003);
    assert_eq!(pr.flags.bits(), 0x0800_0001);
}

#[test]
fn invalid_pin() {
    let s = gpioc_sim::simpleton(4);
    match get_pin_config(&s, 4) {
        Err(Error::Os(e)) => assert_eq!(e.raw_os_error(), Some(libc::EINVAL)),
        x => panic!("unexpected result: {:?}", x),
    }
}

#[test]
fn wrong_pin_in_reply() {
    let d = Canned(PinRecord::query(9).to_bytes().to_vec());
    match get_pin_config(&d, 3) {
        Err(Error::Validation(e)) => {
            assert_eq!(e.field, "pin");
            assert_eq!(e.msg, "requested 3 but got 9");
        }
        x => panic!("unexpected result: {:?}", x),
    }
}

#[test]
fn invalid_name() {
    let mut reply = PinRecord::query(1).to_bytes();
    reply[4] = 0xc3;
    reply[5] = 0x28;
    let d = Canned(reply.to_vec());
    match get_pin_config(&d, 1) {
        Err(Error::Validation(e)) => assert_eq!(e.field, "name"),
        x => panic!("unexpected result: {:?}", x),
    }
}

#[test]
fn short_reply() {
    let s = gpioc_sim::simpleton(4);
    s.inject(Ioctl::GetConfig, Fault::Short(72));
    match get_pin_config(&s, 1) {
        Err(Error::Size(e)) => {
            assert_eq!(e, SizeError::new("PinRecord", 76, 72));
        }
        x => panic!("unexpected result: {:?}", x),
    }
}
