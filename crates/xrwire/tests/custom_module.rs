// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Application-defined modules plug into the registry next to the built-in
//! ones, and types nobody claims are rejected.

use xrwire::dto::{Bone, CameraPose, InteractionRequest, Vector3, Vector4};
use xrwire::{
    Bytable, ByteContainer, Claims, Codec, CodecError, CodecResult, SerializationModule,
    SerializerRegistry, WriteParams,
};

#[derive(Debug, Clone, PartialEq)]
struct ChatMessage {
    author: u64,
    text: String,
    attachments: Vec<Vec<u8>>,
}

struct ChatCodec;

impl Codec<ChatMessage> for ChatCodec {
    fn write(
        &self,
        msg: &ChatMessage,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        Ok(Some(
            Bytable::primitive(msg.author)
                + registry.write(&msg.text, params)?
                + registry.write(&msg.attachments, params)?,
        ))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<ChatMessage>> {
        Ok(Some(ChatMessage {
            author: c.read_u64()?,
            text: registry.read(c)?,
            attachments: registry.read(c)?,
        }))
    }
}

struct ChatModule;

impl SerializationModule for ChatModule {
    fn name(&self) -> &'static str {
        "chat"
    }

    fn claim(&self, claims: &mut Claims) {
        claims
            .claim::<ChatMessage, _>(ChatCodec)
            .claim_list::<Vec<u8>>();
    }
}

#[derive(Debug)]
struct Unregistered;

/// Overrides `Vector3` with double precision (24 bytes).
struct WideVector3Codec;

impl Codec<Vector3> for WideVector3Codec {
    fn fixed_width(&self) -> Option<usize> {
        Some(24)
    }

    fn write(
        &self,
        v: &Vector3,
        _params: &WriteParams,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        Ok(Some(
            Bytable::primitive(f64::from(v.x))
                + Bytable::primitive(f64::from(v.y))
                + Bytable::primitive(f64::from(v.z)),
        ))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Vector3>> {
        Ok(Some(Vector3::new(
            c.read_f64()? as f32,
            c.read_f64()? as f32,
            c.read_f64()? as f32,
        )))
    }
}

struct WideMathModule;

impl SerializationModule for WideMathModule {
    fn name(&self) -> &'static str {
        "wide-math"
    }

    fn claim(&self, claims: &mut Claims) {
        claims.claim::<Vector3, _>(WideVector3Codec);
    }
}

#[test]
fn test_custom_module_roundtrip() {
    let registry = SerializerRegistry::standard_builder()
        .register_module(ChatModule, 100)
        .build();

    let msg = ChatMessage {
        author: 17,
        text: "hello world".to_string(),
        attachments: vec![vec![1, 2, 3], Vec::new()],
    };
    let bytes = registry.encode(&msg).expect("encode");
    assert_eq!(bytes.len(), 8 + (4 + 11) + 4 + (4 + 3) + 4);
    let back: ChatMessage = registry.decode(&bytes).expect("decode");
    assert_eq!(back, msg);
    assert!(registry.modules().any(|(name, priority)| name == "chat" && priority == 100));
}

#[test]
fn test_unregistered_type_rejected_both_ways() {
    let registry = SerializerRegistry::standard();
    assert!(!registry.claims_type::<Unregistered>());

    let err = registry.encode(&Unregistered).unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedType { tag: None, .. }));

    let err = registry.decode::<Unregistered>(&[0; 8]).unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedType { tag: None, .. }));
}

#[test]
fn test_module_missing_from_registry() {
    // Chat codec needs strings, which only the primitive module provides.
    let registry = SerializerRegistry::builder()
        .register_module(ChatModule, 0)
        .build();
    let msg = ChatMessage {
        author: 1,
        text: String::new(),
        attachments: Vec::new(),
    };
    assert!(matches!(
        registry.encode(&msg),
        Err(CodecError::UnsupportedType { .. })
    ));
}

#[test]
fn test_vector_override_keeps_composite_widths() {
    let registry = SerializerRegistry::standard_builder()
        .register_module(WideMathModule, -1)
        .build();
    assert_eq!(registry.claimants_of::<Vector3>(), vec!["wide-math", "math"]);
    assert_eq!(registry.encode(&Vector3::new(1.0, 2.0, 3.0)).expect("v3").len(), 24);

    let bone = Bone {
        bone_type: 4,
        rotation: Vector4::new(0.0, 0.0, 0.7071, 0.7071),
        position: Vector3::new(0.5, 1.5, -0.25),
    };
    let bytes = registry.encode(&bone).expect("bone");
    assert_eq!(Some(bytes.len()), registry.fixed_width::<Bone>().expect("width"));

    let camera = CameraPose {
        position: Vector3::new(0.0, 1.7, 0.0),
        rotation: Vector4::IDENTITY,
    };
    let bytes = registry.encode(&camera).expect("camera");
    assert_eq!(Some(bytes.len()), registry.fixed_width::<CameraPose>().expect("width"));

    let bytes = registry.encode(&InteractionRequest::default()).expect("request");
    assert_eq!(
        Some(bytes.len()),
        registry.fixed_width::<InteractionRequest>().expect("width")
    );

    // the list precheck trusts the declared width
    let bones = vec![bone; 3];
    let bytes = registry.encode(&bones).expect("bones");
    assert_eq!(bytes.len(), 4 + 3 * Bone::WIRE_SIZE);
    let back: Vec<Bone> = registry.decode(&bytes).expect("decode");
    assert_eq!(back, bones);
}
