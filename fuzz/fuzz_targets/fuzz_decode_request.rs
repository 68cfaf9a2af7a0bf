// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;
use xrwire::dto::{InteractionDto, Request};
use xrwire::SerializerRegistry;

static REGISTRY: OnceLock<SerializerRegistry> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let registry = REGISTRY.get_or_init(SerializerRegistry::standard);

    // Anything that decodes must re-encode to the same bytes.
    if let Ok(request) = registry.decode::<Request>(data) {
        let bytes = registry.encode(&request).expect("decoded request re-encodes");
        assert_eq!(bytes, data);
    }

    let _ = registry.decode::<Vec<Request>>(data);
    let _ = registry.decode::<InteractionDto>(data);
});
