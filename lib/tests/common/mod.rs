// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gpioc::{PinFlags, Session};
use gpioc_sim::{Pin, Sim};

// The number of pins on the controllers used by the tests.
pub const NUM_PINS: u32 = 16;

// A controller with a mix of pins:
//  - 2 is an output
//  - 7 has every capability
//  - 13 can only be an output
//  - the rest are the sim defaults
pub fn mixed() -> Sim {
    gpioc_sim::builder()
        .with_num_pins(NUM_PINS)
        .with_pin(2, Pin::new("led").flags(PinFlags::OUTPUT))
        .with_pin(
            7,
            Pin::new("everything")
                .caps(PinFlags::from_bits_retain(0x03f7))
                .flags(PinFlags::INPUT),
        )
        .with_pin(
            13,
            Pin::new("relay")
                .caps(PinFlags::OUTPUT)
                .flags(PinFlags::OUTPUT),
        )
        .build()
}

pub fn session(sim: &Sim) -> Session<&Sim> {
    let s = Session::from_device(sim).unwrap();
    // only count what the test itself sends
    sim.clear_calls();
    s
}
