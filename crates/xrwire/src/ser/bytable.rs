// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Deferred, size-known serialization of a value.
//!
//! A [`Bytable`] is a list of write instructions whose total length is known up
//! front. Composite encoders concatenate the Bytables of their fields; the
//! top-level caller allocates the output once from [`Bytable::len`] and
//! materializes everything in a single pass.
//!
//! ```text
//! tag (inline) + id (inline) + name (shared) + children (deferred)
//!   len = 4    +   8         +   4 + n       +   m
//! ```

use crate::error::{CodecError, CodecResult};
use crate::ser::primitive::Primitive;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::sync::Arc;

/// Capacity of an inline chunk; runs of primitives are packed into one chunk.
const INLINE_CAP: usize = 24;

type FillFn = dyn Fn(&mut [u8]) + Send + Sync;

#[derive(Clone)]
enum Chunk {
    Inline { bytes: [u8; INLINE_CAP], len: u8 },
    Shared(Arc<[u8]>),
    Deferred { len: usize, fill: Arc<FillFn> },
}

impl Chunk {
    fn len(&self) -> usize {
        match self {
            Chunk::Inline { len, .. } => *len as usize,
            Chunk::Shared(bytes) => bytes.len(),
            Chunk::Deferred { len, .. } => *len,
        }
    }

    fn write_into(&self, dst: &mut [u8]) {
        match self {
            Chunk::Inline { bytes, len } => dst.copy_from_slice(&bytes[..*len as usize]),
            Chunk::Shared(bytes) => dst.copy_from_slice(bytes),
            Chunk::Deferred { fill, .. } => fill(dst),
        }
    }
}

/// A value not yet serialized.
///
/// `len()` is fixed at construction and `write` always produces exactly that
/// many bytes.
#[derive(Clone, Default)]
pub struct Bytable {
    len: usize,
    chunks: Vec<Chunk>,
}

impl Bytable {
    /// Zero-length Bytable (identity of `concat`).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fixed-width little-endian scalar.
    pub fn primitive<P: Primitive>(value: P) -> Self {
        let mut out = Self::empty();
        out.push_primitive(value);
        out
    }

    /// Raw bytes copied as-is (no length prefix).
    pub fn from_slice(bytes: &[u8]) -> Self {
        if bytes.len() <= INLINE_CAP {
            let mut out = Self::empty();
            out.push_inline(bytes);
            out
        } else {
            Self::from_vec(bytes.to_vec())
        }
    }

    /// Raw bytes taken by value (no length prefix).
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            return Self::empty();
        }
        Self {
            len: bytes.len(),
            chunks: vec![Chunk::Shared(bytes.into())],
        }
    }

    /// `len` bytes produced later by `fill`, which receives a slice of exactly `len` bytes.
    pub fn deferred<F>(len: usize, fill: F) -> Self
    where
        F: Fn(&mut [u8]) + Send + Sync + 'static,
    {
        if len == 0 {
            return Self::empty();
        }
        Self {
            len,
            chunks: vec![Chunk::Deferred {
                len,
                fill: Arc::new(fill),
            }],
        }
    }

    /// `[u32 length][UTF-8 bytes]`.
    pub fn string(value: &str) -> CodecResult<Self> {
        Self::bytes_prefixed(value.as_bytes())
    }

    /// `[u32 length][raw bytes]`.
    pub fn bytes_prefixed(bytes: &[u8]) -> CodecResult<Self> {
        Ok(Self::length_prefix(bytes.len())? + Self::from_slice(bytes))
    }

    /// `[u32 count]` header for collections.
    pub fn count(count: usize) -> CodecResult<Self> {
        Self::length_prefix(count)
    }

    fn length_prefix(len: usize) -> CodecResult<Self> {
        let prefix = u32::try_from(len).map_err(|_| CodecError::TooLarge {
            what: "length prefix",
            len,
        })?;
        Ok(Self::primitive(prefix))
    }

    /// Wrap as a skippable frame: `[u32 length][self]`.
    pub fn length_prefixed(self) -> CodecResult<Self> {
        Ok(Self::length_prefix(self.len)? + self)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append `other` after `self`.
    pub fn concat(mut self, other: Bytable) -> Self {
        self.append(other);
        self
    }

    /// In-place [`concat`](Self::concat).
    pub fn append(&mut self, other: Bytable) {
        let mut chunks = other.chunks.into_iter();
        // Merge a leading inline chunk into our trailing one when it fits.
        if let Some(first) = chunks.next() {
            match first {
                Chunk::Inline { bytes, len } => self.push_inline(&bytes[..len as usize]),
                chunk => self.push_chunk(chunk),
            }
        }
        for chunk in chunks {
            self.push_chunk(chunk);
        }
    }

    /// Append a scalar of any `WIDTH`.
    pub fn push_primitive<P: Primitive>(&mut self, value: P) {
        if P::WIDTH <= INLINE_CAP {
            let mut bytes = [0u8; INLINE_CAP];
            value.put(&mut bytes[..P::WIDTH]);
            self.push_inline(&bytes[..P::WIDTH]);
        } else {
            let mut bytes = vec![0u8; P::WIDTH];
            value.put(&mut bytes);
            self.push_chunk(Chunk::Shared(bytes.into()));
        }
    }

    fn push_inline(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        if let Some(Chunk::Inline { bytes, len }) = self.chunks.last_mut() {
            let used = *len as usize;
            if used + data.len() <= INLINE_CAP {
                bytes[used..used + data.len()].copy_from_slice(data);
                *len = (used + data.len()) as u8;
                self.len += data.len();
                return;
            }
        }
        if data.len() <= INLINE_CAP {
            let mut bytes = [0u8; INLINE_CAP];
            bytes[..data.len()].copy_from_slice(data);
            self.push_chunk(Chunk::Inline {
                bytes,
                len: data.len() as u8,
            });
        } else {
            self.push_chunk(Chunk::Shared(data.into()));
        }
    }

    fn push_chunk(&mut self, chunk: Chunk) {
        let len = chunk.len();
        if len == 0 {
            return;
        }
        self.len += len;
        self.chunks.push(chunk);
    }

    /// Write into `buffer` at `offset`; returns the next free offset (`offset + len()`).
    ///
    /// Nothing is written when the buffer is too small.
    pub fn write(&self, buffer: &mut [u8], offset: usize) -> CodecResult<usize> {
        let end = offset
            .checked_add(self.len)
            .filter(|end| *end <= buffer.len())
            .ok_or(CodecError::BufferTooSmall {
                offset,
                needed: self.len,
                capacity: buffer.len(),
            })?;

        let mut cursor = offset;
        for chunk in &self.chunks {
            let next = cursor + chunk.len();
            chunk.write_into(&mut buffer[cursor..next]);
            cursor = next;
        }
        debug_assert_eq!(cursor, end);
        Ok(end)
    }

    /// Materialize into a freshly allocated vector of exactly `len()` bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.len];
        let mut cursor = 0;
        for chunk in &self.chunks {
            let next = cursor + chunk.len();
            chunk.write_into(&mut out[cursor..next]);
            cursor = next;
        }
        out
    }
}

impl fmt::Debug for Bytable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bytable")
            .field("len", &self.len)
            .field("chunks", &self.chunks.len())
            .finish()
    }
}

impl Add for Bytable {
    type Output = Bytable;

    fn add(self, rhs: Bytable) -> Bytable {
        self.concat(rhs)
    }
}

impl AddAssign for Bytable {
    fn add_assign(&mut self, rhs: Bytable) {
        self.append(rhs);
    }
}

impl FromIterator<Bytable> for Bytable {
    fn from_iter<I: IntoIterator<Item = Bytable>>(iter: I) -> Self {
        let mut out = Bytable::empty();
        for part in iter {
            out.append(part);
        }
        out
    }
}

impl Sum for Bytable {
    fn sum<I: Iterator<Item = Bytable>>(iter: I) -> Self {
        iter.collect()
    }
}
