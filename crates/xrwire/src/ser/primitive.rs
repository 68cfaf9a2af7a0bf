// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-width little-endian scalars.

use crate::error::{CodecError, CodecResult};

/// A scalar with a fixed little-endian wire width.
///
/// Every primitive is countable: its encoded size is `WIDTH` whatever the value.
///
/// Callers inside the crate (`Bytable::push_primitive`,
/// `ByteContainer::read_primitive`) always pass slices of exactly `WIDTH`
/// bytes. Implementations may rely on that for `put`; `take` on a shorter
/// slice returns [`CodecError::OutOfBounds`] for the built-in types.
pub trait Primitive: Copy + Send + Sync + 'static {
    /// Encoded size in bytes.
    const WIDTH: usize;

    /// Write the value into `dst`, which is exactly `WIDTH` bytes long.
    fn put(self, dst: &mut [u8]);

    /// Read a value from the first `WIDTH` bytes of `src`.
    fn take(src: &[u8]) -> CodecResult<Self>;
}

fn short_slice(width: usize, src: &[u8]) -> CodecError {
    CodecError::OutOfBounds {
        offset: 0,
        requested: width,
        remaining: src.len(),
    }
}

/// Generate `Primitive` for numeric types via `to_le_bytes`/`from_le_bytes`.
macro_rules! impl_primitive_le {
    ($($type:ty => $size:expr),* $(,)?) => {
        $(
            impl Primitive for $type {
                const WIDTH: usize = $size;

                #[inline]
                fn put(self, dst: &mut [u8]) {
                    dst.copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn take(src: &[u8]) -> CodecResult<Self> {
                    let bytes: [u8; $size] = src
                        .get(..$size)
                        .and_then(|head| head.try_into().ok())
                        .ok_or_else(|| short_slice($size, src))?;
                    Ok(<$type>::from_le_bytes(bytes))
                }
            }
        )*
    };
}

impl_primitive_le!(
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f32 => 4,
    f64 => 8,
);

impl Primitive for bool {
    const WIDTH: usize = 1;

    #[inline]
    fn put(self, dst: &mut [u8]) {
        dst[0] = u8::from(self);
    }

    fn take(src: &[u8]) -> CodecResult<Self> {
        match src.first().copied().ok_or_else(|| short_slice(1, src))? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::malformed::<bool>(format!(
                "invalid byte {:#04x}",
                other
            ))),
        }
    }
}
