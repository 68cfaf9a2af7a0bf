// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;
use xrwire::dto::{AvatarMapping, PoseAnimator, PoseCondition, UserTrackingFrame};
use xrwire::SerializerRegistry;

static REGISTRY: OnceLock<SerializerRegistry> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let registry = REGISTRY.get_or_init(SerializerRegistry::standard);

    // Recursive family: must stop at max_depth instead of exhausting the stack.
    let _ = registry.decode::<PoseCondition>(data);
    let _ = registry.decode::<PoseAnimator>(data);
    let _ = registry.decode::<AvatarMapping>(data);
    let _ = registry.decode::<UserTrackingFrame>(data);
});
