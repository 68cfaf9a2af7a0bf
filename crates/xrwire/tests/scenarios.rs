// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test readability over pedantic
#![allow(clippy::cast_possible_truncation)] // Test data conversions

//! Golden byte vectors for messages exchanged with existing peers.

use xrwire::dto::request::tags;
use xrwire::dto::Request;
use xrwire::{ByteContainer, CodecError, SerializerRegistry, WriteParams};

/// TriggerEmote{42, true}: tag 0x0101, u64 id, bool flag.
const EMOTE_42_TRUE: [u8; 13] = [
    0x01, 0x01, 0x00, 0x00, // tag
    0x2A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // emote_id
    0x01, // trigger
];

#[test]
fn test_trigger_emote_golden_bytes() {
    let registry = SerializerRegistry::standard();
    let request = Request::TriggerEmote {
        emote_id: 42,
        trigger: true,
    };

    let bytes = registry.encode(&request).expect("encode emote");
    assert_eq!(bytes, EMOTE_42_TRUE);
    assert_eq!(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), tags::EMOTE_REQUEST);

    let decoded: Request = registry.decode(&EMOTE_42_TRUE).expect("decode emote");
    match decoded {
        Request::TriggerEmote { emote_id, trigger } => {
            assert_eq!(emote_id, 42);
            assert!(trigger);
        }
        other => panic!("decoded wrong variant: {:?}", other),
    }
}

#[test]
fn test_string_list_golden_bytes() {
    let registry = SerializerRegistry::standard();
    let list = vec!["a".to_string(), "bb".to_string(), "ccc".to_string()];

    let bytes = registry.encode(&list).expect("encode list");
    let mut expected = vec![3u8, 0, 0, 0];
    expected.extend_from_slice(&[1, 0, 0, 0]);
    expected.extend_from_slice(b"a");
    expected.extend_from_slice(&[2, 0, 0, 0]);
    expected.extend_from_slice(b"bb");
    expected.extend_from_slice(&[3, 0, 0, 0]);
    expected.extend_from_slice(b"ccc");
    assert_eq!(bytes, expected);

    let decoded: Vec<String> = registry.decode(&bytes).expect("decode list");
    assert_eq!(decoded, list);
}

#[test]
fn test_stream_of_mixed_messages() {
    let registry = SerializerRegistry::standard();
    let params = WriteParams::new();

    let first = Request::Navigate {
        position: xrwire::dto::Vector3::new(1.0, 0.0, 2.0),
    };
    let second = Request::PoseActivation {
        pose_id: 3,
        active: false,
    };
    let stream = (registry.write(&first, &params).expect("first")
        + registry.write(&second, &params).expect("second"))
    .to_vec();

    let mut container = ByteContainer::new(&stream);
    let a: Request = registry.read(&mut container).expect("read first");
    let b: Request = registry.read(&mut container).expect("read second");
    assert_eq!(a, first);
    assert_eq!(b, second);
    assert!(container.is_eof());
}

#[test]
fn test_framed_unknown_message_is_skipped() {
    let registry = SerializerRegistry::standard();
    let params = WriteParams::new();

    // A frame a newer peer might send: unknown tag followed by its payload.
    let mut unknown = 0x01F0u32.to_le_bytes().to_vec();
    unknown.extend_from_slice(&[0xEE; 21]);
    let unknown_frame = xrwire::Bytable::from_vec(unknown)
        .length_prefixed()
        .expect("frame");

    let known = Request::TriggerEmote {
        emote_id: 7,
        trigger: false,
    };
    let stream = (unknown_frame + registry.write_framed(&known, &params).expect("known")).to_vec();

    let mut container = ByteContainer::new(&stream);
    let attempt = registry.read_framed::<Request>(&mut container.clone());
    assert!(matches!(
        attempt,
        Err(CodecError::UnsupportedType {
            tag: Some(0x01F0),
            ..
        })
    ));

    assert_eq!(registry.skip_framed(&mut container).expect("skip"), 25);
    let decoded: Request = registry.read_framed(&mut container).expect("known frame");
    assert_eq!(decoded, known);
}
