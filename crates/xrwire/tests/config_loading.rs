// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![cfg(feature = "config-loaders")]

//! Registry limits loaded from YAML/JSON files.

use std::io::Write;
use xrwire::{CodecConfig, CodecError, ProtocolVersion, SerializerRegistry};

#[test]
fn test_yaml_file_drives_registry_limits() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "protocol_version: \"2.6.0\"\nmax_collection_len: 2\nreject_trailing_bytes: false"
    )
    .expect("write yaml");

    let config = CodecConfig::from_yaml_file(file.path()).expect("load yaml");
    assert_eq!(config.protocol_version, ProtocolVersion::new(2, 6, 0));
    assert_eq!(config.max_collection_len, 2);
    assert!(!config.reject_trailing_bytes);

    let registry = SerializerRegistry::standard_builder()
        .with_config(config)
        .build();

    let ok = registry.encode(&vec![1u32, 2]).expect("encode");
    assert_eq!(registry.decode::<Vec<u32>>(&ok).expect("two"), vec![1, 2]);

    assert!(matches!(
        registry.encode(&vec![1u32, 2, 3]),
        Err(CodecError::LimitExceeded { max: 2, .. })
    ));
    let mut too_many = 3u32.to_le_bytes().to_vec();
    too_many.extend_from_slice(&[0; 12]);
    assert!(matches!(
        registry.decode::<Vec<u32>>(&too_many),
        Err(CodecError::MalformedPayload { .. })
    ));

    // trailing bytes tolerated by this config
    let mut padded = registry.encode(&7u16).expect("encode");
    padded.push(0xFF);
    assert_eq!(registry.decode::<u16>(&padded).expect("lenient"), 7);
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = CodecConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, CodecError::Config(_)));
}

#[test]
fn test_json_config() {
    let config = CodecConfig::from_json_str(r#"{"max_depth": 3, "max_string_len": 10}"#)
        .expect("valid json");
    assert_eq!(config.max_depth, 3);
    assert_eq!(config.max_string_len, 10);
    assert_eq!(config.protocol_version, ProtocolVersion::CURRENT);
}
