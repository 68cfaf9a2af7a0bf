// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in module for scalars, strings, raw blocks and their collections.
//!
//! | Type | Layout | Countable |
//! |------|--------|-----------|
//! | `u8`..`f64`, `bool` | little-endian, fixed width | yes |
//! | `String` | `[u32 len][UTF-8]` | no |
//! | `Vec<u8>` | `[u32 len][raw]` | no |
//! | `Vec<P>` | `[u32 count][P]*` | no |
//! | `Option<P>` | `[bool][P]?` | no |

use crate::error::{CodecError, CodecResult};
use crate::module::{Claims, Codec, SerializationModule, WriteParams};
use crate::registry::SerializerRegistry;
use crate::ser::{ByteContainer, Bytable, Primitive};
use std::marker::PhantomData;

/// Fixed-width scalar codec.
pub struct ScalarCodec<P> {
    _marker: PhantomData<fn() -> P>,
}

impl<P> ScalarCodec<P> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<P> Default for ScalarCodec<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Primitive> Codec<P> for ScalarCodec<P> {
    fn fixed_width(&self) -> Option<usize> {
        Some(P::WIDTH)
    }

    fn write(
        &self,
        value: &P,
        _params: &WriteParams,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        Ok(Some(Bytable::primitive(*value)))
    }

    fn read(
        &self,
        container: &mut ByteContainer<'_>,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<P>> {
        container.read_primitive::<P>().map(Some)
    }
}

/// Length-prefixed UTF-8 string bounded by `max_string_len`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl Codec<String> for StringCodec {
    fn write(
        &self,
        value: &String,
        _params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let max = registry.config().max_string_len;
        if value.len() > max {
            return Err(CodecError::limit_exceeded::<String>(
                "string length",
                value.len(),
                max,
            ));
        }
        Bytable::string(value).map(Some)
    }

    fn read(
        &self,
        container: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<String>> {
        let len = container.peek_u32()? as usize;
        let max = registry.config().max_string_len;
        if len > max {
            return Err(CodecError::malformed::<String>(format!(
                "length {} exceeds limit {}",
                len, max
            )));
        }
        container.read_string().map(Some)
    }
}

/// Length-prefixed raw block.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCodec;

impl Codec<Vec<u8>> for BytesCodec {
    fn write(
        &self,
        value: &Vec<u8>,
        _params: &WriteParams,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        Bytable::bytes_prefixed(value).map(Some)
    }

    fn read(
        &self,
        container: &mut ByteContainer<'_>,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Vec<u8>>> {
        container.read_bytes_prefixed().map(|b| Some(b.to_vec()))
    }
}

/// Base case every composite module delegates to.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveModule;

impl PrimitiveModule {
    pub const PRIORITY: i32 = 0;
}

macro_rules! claim_scalars {
    ($claims:expr, $($type:ty),* $(,)?) => {
        $(
            $claims
                .claim::<$type, _>(ScalarCodec::<$type>::new())
                .claim_option::<$type>();
        )*
    };
}

impl SerializationModule for PrimitiveModule {
    fn name(&self) -> &'static str {
        "primitives"
    }

    fn claim(&self, claims: &mut Claims) {
        claim_scalars!(claims, u8, i8, u16, i16, u32, i32, u64, i64, f32, f64, bool);

        // Vec<u8> is a raw block, not a list of u8 elements.
        claims
            .claim::<Vec<u8>, _>(BytesCodec)
            .claim_list::<i8>()
            .claim_list::<u16>()
            .claim_list::<i16>()
            .claim_list::<u32>()
            .claim_list::<i32>()
            .claim_list::<u64>()
            .claim_list::<i64>()
            .claim_list::<f32>()
            .claim_list::<f64>()
            .claim_list::<bool>();

        claims
            .claim::<String, _>(StringCodec)
            .claim_list::<String>()
            .claim_option::<String>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;

    fn registry() -> SerializerRegistry {
        SerializerRegistry::builder()
            .register_module(PrimitiveModule, PrimitiveModule::PRIORITY)
            .build()
    }

    #[test]
    fn test_scalars_are_countable() {
        let registry = registry();
        assert_eq!(registry.fixed_width::<u8>().expect("u8"), Some(1));
        assert_eq!(registry.fixed_width::<i64>().expect("i64"), Some(8));
        assert_eq!(registry.fixed_width::<f32>().expect("f32"), Some(4));
        assert!(registry.is_countable::<bool>().expect("bool"));
        assert!(!registry.is_countable::<String>().expect("string"));
        assert!(!registry.is_countable::<Vec<u32>>().expect("list"));
    }

    #[test]
    fn test_string_list_layout() {
        let registry = registry();
        let values = vec!["a".to_string(), "bb".to_string(), "ccc".to_string()];
        let bytes = registry.encode(&values).expect("encode");

        let mut expected = 3u32.to_le_bytes().to_vec();
        for s in &values {
            expected.extend_from_slice(&(s.len() as u32).to_le_bytes());
            expected.extend_from_slice(s.as_bytes());
        }
        assert_eq!(bytes, expected);

        let decoded: Vec<String> = registry.decode(&bytes).expect("decode");
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_raw_block_is_not_a_u8_list() {
        let registry = registry();
        let bytes = registry.encode(&vec![1u8, 2, 3]).expect("encode");
        assert_eq!(bytes, vec![3, 0, 0, 0, 1, 2, 3]);
        let decoded: Vec<u8> = registry.decode(&bytes).expect("decode");
        assert_eq!(decoded, vec![1, 2, 3]);
    }

    #[test]
    fn test_option_presence_flag() {
        let registry = registry();
        assert_eq!(registry.encode(&None::<u32>).expect("none"), vec![0]);
        assert_eq!(
            registry.encode(&Some(7u16)).expect("some"),
            vec![1, 7, 0]
        );
        let back: Option<String> = registry
            .decode(&registry.encode(&Some("x".to_string())).expect("encode"))
            .expect("decode");
        assert_eq!(back.as_deref(), Some("x"));
    }

    #[test]
    fn test_string_limit_both_directions() {
        let registry = SerializerRegistry::builder()
            .with_config(CodecConfig::default().with_max_string_len(4))
            .register_module(PrimitiveModule, 0)
            .build();

        let err = registry.encode(&"hello".to_string()).unwrap_err();
        assert!(matches!(
            err,
            CodecError::LimitExceeded {
                value: 5,
                max: 4,
                ..
            }
        ));
        let bytes = registry.encode(&"hell".to_string()).expect("at limit");
        assert_eq!(registry.decode::<String>(&bytes).expect("decode"), "hell");

        // length checked before the body is read: 5 declared, 1 present
        let bytes = [5, 0, 0, 0, b'h'];
        let err = registry.decode::<String>(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload { .. }));
    }

    #[test]
    fn test_invalid_bool_in_list() {
        let registry = registry();
        let bytes = [2, 0, 0, 0, 1, 5];
        let err = registry.decode::<Vec<bool>>(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload { .. }));
    }
}
