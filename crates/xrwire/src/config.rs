// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration.
//!
//! - **Static**: protocol constants ([`ProtocolVersion::CURRENT`], default limits).
//! - **Runtime**: [`CodecConfig`], owned by a [`SerializerRegistry`](crate::SerializerRegistry)
//!   and fixed for the registry's lifetime.
//!
//! # Example YAML
//!
//! ```yaml
//! # xrwire.yaml
//! protocol_version: "2.7.0"
//! max_collection_len: 65536
//! max_string_len: 1048576
//! max_depth: 32
//! reject_trailing_bytes: true
//! ```

use crate::error::{CodecError, CodecResult};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "config-loaders")]
use std::{fs, path::Path};

/// Upper bound on element counts read from the wire (allocation-bomb guard).
pub const DEFAULT_MAX_COLLECTION_LEN: usize = 1_000_000;

/// Upper bound on string byte lengths read from the wire.
pub const DEFAULT_MAX_STRING_LEN: usize = 16 * 1024 * 1024;

/// Maximum nesting of registry reads (recursive DTOs).
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// Protocol version shared by client and server builds.
///
/// Encoders receive the target version through [`WriteParams`](crate::WriteParams),
/// decoders through [`ByteContainer`](crate::ByteContainer). Modules branch on it
/// when a DTO layout changed between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct ProtocolVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl ProtocolVersion {
    /// Version spoken by this build.
    pub const CURRENT: ProtocolVersion = ProtocolVersion::new(2, 8, 0);

    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// True when `self` is at least `other`.
    pub fn supports(&self, other: ProtocolVersion) -> bool {
        *self >= other
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ProtocolVersion {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.');
        let mut next = |name: &str| -> CodecResult<u16> {
            match parts.next() {
                Some(part) => part.parse::<u16>().map_err(|e| {
                    CodecError::Config(format!("invalid {} in version '{}': {}", name, s, e))
                }),
                None => Ok(0),
            }
        };
        let major = next("major")?;
        let minor = next("minor")?;
        let patch = next("patch")?;
        if parts.next().is_some() {
            return Err(CodecError::Config(format!(
                "invalid version '{}': too many components",
                s
            )));
        }
        Ok(Self::new(major, minor, patch))
    }
}

impl TryFrom<String> for ProtocolVersion {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProtocolVersion> for String {
    fn from(value: ProtocolVersion) -> Self {
        value.to_string()
    }
}

/// Runtime limits and defaults of a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct CodecConfig {
    /// Version stamped on containers created by `decode` and params created by `encode`.
    pub protocol_version: ProtocolVersion,

    /// Largest element count accepted for a collection.
    pub max_collection_len: usize,

    /// Largest string accepted, in bytes.
    pub max_string_len: usize,

    /// Deepest nesting of registry reads.
    pub max_depth: u32,

    /// Reject top-level payloads with unread trailing bytes.
    pub reject_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            protocol_version: ProtocolVersion::CURRENT,
            max_collection_len: DEFAULT_MAX_COLLECTION_LEN,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            reject_trailing_bytes: true,
        }
    }
}

impl CodecConfig {
    pub fn with_protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.protocol_version = version;
        self
    }

    pub fn with_max_collection_len(mut self, max: usize) -> Self {
        self.max_collection_len = max;
        self
    }

    pub fn with_max_string_len(mut self, max: usize) -> Self {
        self.max_string_len = max;
        self
    }

    pub fn with_max_depth(mut self, max: u32) -> Self {
        self.max_depth = max;
        self
    }

    pub fn reject_trailing_bytes(mut self, reject: bool) -> Self {
        self.reject_trailing_bytes = reject;
        self
    }
}

#[cfg(feature = "config-loaders")]
impl CodecConfig {
    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> CodecResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| CodecError::Config(format!("YAML parse error: {}", e)))
    }

    /// Load a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> CodecResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CodecError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml_str(&content)?;
        log::debug!(
            "[config] loaded {} (protocol {})",
            path.display(),
            config.protocol_version
        );
        Ok(config)
    }

    /// Parse a JSON document. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> CodecResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CodecError::Config(format!("JSON parse error: {}", e)))
    }
}
