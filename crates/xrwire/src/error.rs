// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec error types.
//!
//! Three kinds are protocol-level and surface to the routing layer as-is:
//! [`CodecError::OutOfBounds`], [`CodecError::UnsupportedType`] and
//! [`CodecError::MalformedPayload`]. The remaining variants belong to the
//! encode side or to configuration loading.
//!
//! A failed read leaves the [`ByteContainer`](crate::ByteContainer) at an
//! unspecified position. Callers discard the container and the whole message.

use std::any::type_name;
use std::fmt;
use thiserror::Error;

/// Errors returned by encode/decode operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A read asked for more bytes than remain in the container.
    #[error("out of bounds at offset {offset}: requested {requested} bytes, {remaining} remaining")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        remaining: usize,
    },

    /// No registered module claims the type, or a tag is unknown to this build.
    #[error("unsupported type {type_name}{}", fmt_tag(.tag))]
    UnsupportedType {
        type_name: &'static str,
        tag: Option<u32>,
    },

    /// The type was recognised but its bytes do not form a valid value.
    #[error("malformed {type_name} payload: {reason}")]
    MalformedPayload {
        type_name: &'static str,
        reason: String,
    },

    /// Destination buffer cannot hold the encoded value.
    #[error("buffer too small at offset {offset}: need {needed} bytes, capacity {capacity}")]
    BufferTooSmall {
        offset: usize,
        needed: usize,
        capacity: usize,
    },

    /// A value is too large for its u32 length prefix.
    #[error("{what} too large to encode: {len} bytes")]
    TooLarge { what: &'static str, len: usize },

    /// A value breaks a configured limit the decoding side would enforce.
    #[error("cannot encode {type_name}: {limit} {value} exceeds {max}")]
    LimitExceeded {
        type_name: &'static str,
        limit: &'static str,
        value: usize,
        max: usize,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OutOfBounds,
    UnsupportedType,
    MalformedPayload,
    Encode,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::OutOfBounds => "out-of-bounds",
            ErrorKind::UnsupportedType => "unsupported-type",
            ErrorKind::MalformedPayload => "malformed-payload",
            ErrorKind::Encode => "encode",
            ErrorKind::Config => "config",
        };
        f.write_str(name)
    }
}

impl CodecError {
    /// No module claims `T`.
    pub fn unsupported<T: ?Sized>() -> Self {
        CodecError::UnsupportedType {
            type_name: type_name::<T>(),
            tag: None,
        }
    }

    /// The tag read for family `T` is outside the tag space known to this build.
    pub fn unknown_tag<T: ?Sized>(tag: u32) -> Self {
        CodecError::UnsupportedType {
            type_name: type_name::<T>(),
            tag: Some(tag),
        }
    }

    /// Bytes claimed as a `T` do not parse.
    pub fn malformed<T: ?Sized>(reason: impl Into<String>) -> Self {
        CodecError::MalformedPayload {
            type_name: type_name::<T>(),
            reason: reason.into(),
        }
    }

    /// Encoding `T` would break the configured `limit`.
    pub fn limit_exceeded<T: ?Sized>(limit: &'static str, value: usize, max: usize) -> Self {
        CodecError::LimitExceeded {
            type_name: type_name::<T>(),
            limit,
            value,
            max,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            CodecError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            CodecError::MalformedPayload { .. } => ErrorKind::MalformedPayload,
            CodecError::BufferTooSmall { .. }
            | CodecError::TooLarge { .. }
            | CodecError::LimitExceeded { .. } => ErrorKind::Encode,
            CodecError::Config(_) => ErrorKind::Config,
        }
    }
}

fn fmt_tag(tag: &Option<u32>) -> String {
    match tag {
        Some(tag) => format!(" (unknown tag {:#06x})", tag),
        None => String::new(),
    }
}

pub type CodecResult<T> = core::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_display_variants() {
        let err = CodecError::OutOfBounds {
            offset: 12,
            requested: 8,
            remaining: 3,
        };
        assert_eq!(
            err.to_string(),
            "out of bounds at offset 12: requested 8 bytes, 3 remaining"
        );

        let err = CodecError::unknown_tag::<u64>(0x0101);
        assert_eq!(err.to_string(), "unsupported type u64 (unknown tag 0x0101)");

        let err = CodecError::unsupported::<String>();
        assert!(err.to_string().starts_with("unsupported type"));
        assert!(err.to_string().ends_with("String"));

        let err = CodecError::malformed::<bool>("invalid byte 0x07");
        assert_eq!(err.to_string(), "malformed bool payload: invalid byte 0x07");
    }

    #[test]
    fn test_codec_error_kinds() {
        assert_eq!(
            CodecError::unsupported::<u8>().kind(),
            ErrorKind::UnsupportedType
        );
        assert_eq!(
            CodecError::malformed::<u8>("x").kind(),
            ErrorKind::MalformedPayload
        );
        assert_eq!(
            CodecError::BufferTooSmall {
                offset: 0,
                needed: 4,
                capacity: 2
            }
            .kind(),
            ErrorKind::Encode
        );
        let err = CodecError::limit_exceeded::<u8>("depth", 65, 64);
        assert_eq!(err.kind(), ErrorKind::Encode);
        assert_eq!(err.to_string(), "cannot encode u8: depth 65 exceeds 64");
        assert_eq!(ErrorKind::OutOfBounds.to_string(), "out-of-bounds");
    }
}
