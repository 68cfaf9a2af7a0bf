// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use xrwire::ByteContainer;

fuzz_target!(|data: &[u8]| {
    let mut container = ByteContainer::new(data);

    // Drive the cursor with the input's own bytes as opcodes.
    while let Ok(op) = container.read_u8() {
        let result = match op % 8 {
            0 => container.read_u16().map(drop),
            1 => container.read_u64().map(drop),
            2 => container.read_bool().map(drop),
            3 => container.read_string().map(drop),
            4 => container.read_bytes_prefixed().map(drop),
            5 => container.peek_u32().map(drop),
            6 => container
                .read_len()
                .and_then(|len| container.sub_container(len))
                .map(drop),
            _ => container.skip(usize::from(op >> 3)),
        };
        assert!(container.position() <= container.len());
        if result.is_err() {
            break;
        }
    }
});
