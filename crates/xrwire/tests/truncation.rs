// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test readability over pedantic

//! Truncated and corrupted buffers fail with a protocol error, never a panic
//! or a plausible wrong value.

use xrwire::dto::*;
use xrwire::{CodecError, ErrorKind, SerializerRegistry};

fn assert_truncation_rejected<T>(registry: &SerializerRegistry, value: &T)
where
    T: std::fmt::Debug + 'static,
{
    let bytes = registry.encode(value).expect("encode");
    for cut in 0..bytes.len() {
        match registry.decode::<T>(&bytes[..cut]) {
            Ok(v) => panic!(
                "prefix of {} / {} bytes decoded as {:?}",
                cut,
                bytes.len(),
                v
            ),
            Err(e) => assert!(
                matches!(e.kind(), ErrorKind::OutOfBounds | ErrorKind::MalformedPayload),
                "prefix {} gave {:?}",
                cut,
                e
            ),
        }
    }
}

#[test]
fn test_truncated_requests() {
    let registry = SerializerRegistry::standard();
    let requests = [
        Request::TriggerEmote {
            emote_id: 42,
            trigger: true,
        },
        Request::UserCamera(UserCameraProperties::default()),
        Request::ParameterSetting(ParameterSettingRequest {
            tool_id: 1,
            interaction_id: 2,
            hovered_object_id: 3,
            value: ParameterValue::Text("brightness".to_string()),
        }),
    ];
    for request in &requests {
        assert_truncation_rejected(&registry, request);
    }
}

#[test]
fn test_truncated_composites() {
    let registry = SerializerRegistry::standard();

    assert_truncation_rejected(
        &registry,
        &PoseCondition::and(
            PoseCondition::Scale {
                target_scale: Vector3::new(1.0, 2.0, 3.0),
            },
            PoseCondition::Not(vec![PoseCondition::Environment {
                environment_id: 9,
                allowed: true,
            }]),
        ),
    );

    assert_truncation_rejected(
        &registry,
        &InteractionDto::Form {
            id: 1,
            name: "f".to_string(),
            fields: vec![InteractionDto::Link {
                id: 2,
                name: "l".to_string(),
                url: "u".to_string(),
            }],
        },
    );

    assert_truncation_rejected(
        &registry,
        &UserTrackingFrame {
            user_id: 1,
            parent_id: 2,
            skeleton_height: 1.8,
            refresh_frequency: 90.0,
            bones: vec![Bone::default(); 2],
            camera: Some(CameraPose::default()),
        },
    );
}

#[test]
fn test_garbage_never_panics() {
    let registry = SerializerRegistry::standard();
    let mut rng = fastrand::Rng::with_seed(0xBAD5EED);

    for _ in 0..2_000 {
        let len = rng.usize(0..96);
        let mut bytes: Vec<u8> = (0..len).map(|_| rng.u8(..)).collect();
        // Steer half of the inputs into a known tag so payload paths get exercised.
        if len >= 4 && rng.bool() {
            let tag = 0x0101 + rng.u32(0..7);
            bytes[..4].copy_from_slice(&tag.to_le_bytes());
        }

        let _ = registry.decode::<Request>(&bytes);
        let _ = registry.decode::<PoseCondition>(&bytes);
        let _ = registry.decode::<InteractionDto>(&bytes);
        let _ = registry.decode::<AvatarMapping>(&bytes);
        let _ = registry.decode::<Vec<String>>(&bytes);
    }
}

#[test]
fn test_huge_count_rejected_before_allocation() {
    let registry = SerializerRegistry::standard();
    let mut bytes = u32::MAX.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0; 16]);

    let err = registry.decode::<Vec<String>>(&bytes).unwrap_err();
    assert!(matches!(err, CodecError::MalformedPayload { .. }));

    let err = registry.decode::<Vec<Request>>(&bytes).unwrap_err();
    assert!(matches!(err, CodecError::MalformedPayload { .. }));
}
