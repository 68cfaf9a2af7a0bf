// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read cursor over an immutable byte buffer.

use crate::config::ProtocolVersion;
use crate::error::{CodecError, CodecResult};
use crate::ser::primitive::Primitive;

/// Generate named read methods for primitive types.
macro_rules! impl_read_primitive {
    ($($name:ident => $type:ty),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(&mut self) -> CodecResult<$type> {
                self.read_primitive::<$type>()
            }
        )*
    };
}

/// Bounds-checked, zero-copy read cursor.
///
/// `position` never exceeds the buffer length. A read that would cross the end
/// fails with [`CodecError::OutOfBounds`] instead of returning partial data.
#[derive(Debug, Clone)]
pub struct ByteContainer<'a> {
    buffer: &'a [u8],
    position: usize,
    version: ProtocolVersion,
    depth: u32,
}

impl<'a> ByteContainer<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_version(buffer, ProtocolVersion::CURRENT)
    }

    /// Container tagged with the protocol version the bytes were written for.
    pub fn with_version(buffer: &'a [u8], version: ProtocolVersion) -> Self {
        Self {
            buffer,
            position: 0,
            version,
            depth: 0,
        }
    }

    /// Container starting at `offset`.
    pub fn at(buffer: &'a [u8], offset: usize) -> CodecResult<Self> {
        let mut container = Self::new(buffer);
        container.set_position(offset)?;
        Ok(container)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.buffer.len()
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Move the cursor (used to rewind after a declined read).
    pub fn set_position(&mut self, position: usize) -> CodecResult<()> {
        if position > self.buffer.len() {
            return Err(CodecError::OutOfBounds {
                offset: self.position,
                requested: position.saturating_sub(self.position),
                remaining: self.remaining(),
            });
        }
        self.position = position;
        Ok(())
    }

    fn ensure(&self, len: usize) -> CodecResult<()> {
        if len > self.remaining() {
            return Err(CodecError::OutOfBounds {
                offset: self.position,
                requested: len,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read `len` raw bytes.
    pub fn read_raw(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        self.ensure(len)?;
        let slice = &self.buffer[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    /// Advance without decoding.
    pub fn skip(&mut self, len: usize) -> CodecResult<()> {
        self.ensure(len)?;
        self.position += len;
        Ok(())
    }

    pub fn read_primitive<P: Primitive>(&mut self) -> CodecResult<P> {
        let bytes = self.read_raw(P::WIDTH)?;
        P::take(bytes)
    }

    impl_read_primitive!(
        read_u8 => u8,
        read_i8 => i8,
        read_u16 => u16,
        read_i16 => i16,
        read_u32 => u32,
        read_i32 => i32,
        read_u64 => u64,
        read_i64 => i64,
        read_f32 => f32,
        read_f64 => f64,
        read_bool => bool,
    );

    /// Look at the next `u32` (e.g. a variant tag) without consuming it.
    pub fn peek_u32(&self) -> CodecResult<u32> {
        self.ensure(4)?;
        u32::take(&self.buffer[self.position..self.position + 4])
    }

    /// Read a `u32` length prefix as `usize`.
    pub fn read_len(&mut self) -> CodecResult<usize> {
        let len = self.read_u32()?;
        usize::try_from(len).map_err(|_| {
            CodecError::malformed::<u32>(format!("length {} does not fit in usize", len))
        })
    }

    /// Length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> CodecResult<String> {
        let len = self.read_len()?;
        let bytes = self.read_raw(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| CodecError::malformed::<String>(format!("invalid UTF-8: {}", e)))
    }

    /// Length-prefixed raw block.
    pub fn read_bytes_prefixed(&mut self) -> CodecResult<&'a [u8]> {
        let len = self.read_len()?;
        self.read_raw(len)
    }

    /// Split off the next `len` bytes as a nested container.
    ///
    /// The nested container shares the version tag and nesting depth; this cursor
    /// moves past the whole block.
    pub fn sub_container(&mut self, len: usize) -> CodecResult<ByteContainer<'a>> {
        let block = self.read_raw(len)?;
        Ok(ByteContainer {
            buffer: block,
            position: 0,
            version: self.version,
            depth: self.depth,
        })
    }

    pub(crate) fn enter(&mut self, max_depth: u32, type_name: &'static str) -> CodecResult<()> {
        if self.depth >= max_depth {
            return Err(CodecError::MalformedPayload {
                type_name,
                reason: format!("nesting deeper than {}", max_depth),
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_U16: u16 = 0xCDEF;
    const TEST_U32: u32 = 0x1234_5678;
    const TEST_U64: u64 = 0x1122_3344_5566_7788;

    #[test]
    fn test_container_read_overflow_reports_offset() {
        let buffer = [0u8; 1];
        let mut container = ByteContainer::new(&buffer);
        assert_eq!(container.read_u8().expect("Read u8 should succeed"), 0);

        let err = container.read_u8().unwrap_err();
        match err {
            CodecError::OutOfBounds {
                offset,
                requested,
                remaining,
            } => {
                assert_eq!(offset, 1);
                assert_eq!(requested, 1);
                assert_eq!(remaining, 0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_container_roundtrip_across_numeric_types() {
        let mut buffer = Vec::new();
        buffer.push(0xAB);
        buffer.extend_from_slice(&TEST_U16.to_le_bytes());
        buffer.extend_from_slice(&TEST_U32.to_le_bytes());
        buffer.extend_from_slice(&TEST_U64.to_le_bytes());
        buffer.extend_from_slice(&(-42i32).to_le_bytes());
        buffer.extend_from_slice(&6.25f64.to_le_bytes());
        buffer.push(1);

        let mut container = ByteContainer::new(&buffer);
        assert_eq!(container.read_u8().expect("u8"), 0xAB);
        assert_eq!(container.read_u16().expect("u16"), TEST_U16);
        assert_eq!(container.read_u32().expect("u32"), TEST_U32);
        assert_eq!(container.read_u64().expect("u64"), TEST_U64);
        assert_eq!(container.read_i32().expect("i32"), -42);
        assert!((container.read_f64().expect("f64") - 6.25).abs() < f64::EPSILON);
        assert!(container.read_bool().expect("bool"));
        assert!(container.is_eof());
        assert_eq!(container.position(), buffer.len());
    }

    #[test]
    fn test_container_string_and_blocks() {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&3u32.to_le_bytes());
        buffer.extend_from_slice(b"abc");
        buffer.extend_from_slice(&2u32.to_le_bytes());
        buffer.extend_from_slice(&[0xDE, 0xAD]);

        let mut container = ByteContainer::new(&buffer);
        assert_eq!(container.read_string().expect("string"), "abc");
        assert_eq!(
            container.read_bytes_prefixed().expect("block"),
            &[0xDE, 0xAD]
        );
        assert_eq!(container.remaining(), 0);
    }

    #[test]
    fn test_container_string_length_past_end() {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&10u32.to_le_bytes());
        buffer.extend_from_slice(b"abc");

        let mut container = ByteContainer::new(&buffer);
        let err = container.read_string().unwrap_err();
        assert!(matches!(
            err,
            CodecError::OutOfBounds {
                offset: 4,
                requested: 10,
                remaining: 3
            }
        ));
    }

    #[test]
    fn test_container_invalid_utf8() {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&2u32.to_le_bytes());
        buffer.extend_from_slice(&[0xC3, 0x28]);

        let mut container = ByteContainer::new(&buffer);
        let err = container.read_string().unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload { .. }));
    }

    #[test]
    fn test_container_peek_does_not_advance() {
        let buffer = 0x0101u32.to_le_bytes();
        let container = ByteContainer::new(&buffer);
        assert_eq!(container.peek_u32().expect("peek"), 0x0101);
        assert_eq!(container.position(), 0);
    }

    #[test]
    fn test_container_sub_container_is_bounded() {
        let buffer = [1u8, 2, 3, 4, 5];
        let mut container = ByteContainer::with_version(&buffer, ProtocolVersion::new(2, 6, 0));
        container.skip(1).expect("skip");

        let mut nested = container.sub_container(2).expect("nested");
        assert_eq!(nested.version(), ProtocolVersion::new(2, 6, 0));
        assert_eq!(nested.read_u8().expect("first"), 2);
        assert_eq!(nested.read_u8().expect("second"), 3);
        assert!(nested.read_u8().is_err());

        assert_eq!(container.position(), 3);
        assert_eq!(container.read_u8().expect("after block"), 4);
    }

    #[test]
    fn test_container_set_position_bounds() {
        let buffer = [0u8; 4];
        let mut container = ByteContainer::new(&buffer);
        container.set_position(4).expect("end is valid");
        assert!(container.is_eof());
        assert!(container.set_position(5).is_err());
        assert!(ByteContainer::at(&buffer, 2).is_ok());
        assert!(ByteContainer::at(&buffer, 9).is_err());
    }

    #[test]
    fn test_container_depth_limit() {
        let buffer = [0u8; 1];
        let mut container = ByteContainer::new(&buffer);
        container.enter(2, "T").expect("depth 1");
        container.enter(2, "T").expect("depth 2");
        assert!(container.enter(2, "T").is_err());
        container.leave();
        container.enter(2, "T").expect("depth 2 again");
    }
}
