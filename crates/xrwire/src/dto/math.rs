// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Vectors, quaternions and colors. All countable.

use crate::error::CodecResult;
use crate::module::{Claims, Codec, SerializationModule, WriteParams};
use crate::registry::SerializerRegistry;
use crate::ser::{ByteContainer, Bytable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const WIRE_SIZE: usize = 12;

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Append the 12-byte layout directly, bypassing the registry.
    ///
    /// Countable composites use this so their width cannot change when
    /// another module overrides `Vector3`.
    pub fn push_to(&self, out: &mut Bytable) {
        out.push_primitive(self.x);
        out.push_primitive(self.y);
        out.push_primitive(self.z);
    }

    pub fn read_from(c: &mut ByteContainer<'_>) -> CodecResult<Self> {
        Ok(Self {
            x: c.read_f32()?,
            y: c.read_f32()?,
            z: c.read_f32()?,
        })
    }
}

/// Four floats; used for quaternions (`x, y, z, w`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector4 {
    pub const WIRE_SIZE: usize = 16;
    pub const IDENTITY: Vector4 = Vector4::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Fixed 16-byte layout, see [`Vector3::push_to`].
    pub fn push_to(&self, out: &mut Bytable) {
        out.push_primitive(self.x);
        out.push_primitive(self.y);
        out.push_primitive(self.z);
        out.push_primitive(self.w);
    }

    pub fn read_from(c: &mut ByteContainer<'_>) -> CodecResult<Self> {
        Ok(Self {
            x: c.read_f32()?,
            y: c.read_f32()?,
            z: c.read_f32()?,
            w: c.read_f32()?,
        })
    }
}

impl Default for Vector4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    pub const WIRE_SIZE: usize = 16;

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for ColorRgba {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Vector3Codec;

impl Codec<Vector3> for Vector3Codec {
    fn fixed_width(&self) -> Option<usize> {
        Some(Vector3::WIRE_SIZE)
    }

    fn write(
        &self,
        v: &Vector3,
        _params: &WriteParams,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let mut out = Bytable::empty();
        v.push_to(&mut out);
        Ok(Some(out))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Vector3>> {
        Vector3::read_from(c).map(Some)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Vector4Codec;

impl Codec<Vector4> for Vector4Codec {
    fn fixed_width(&self) -> Option<usize> {
        Some(Vector4::WIRE_SIZE)
    }

    fn write(
        &self,
        v: &Vector4,
        _params: &WriteParams,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let mut out = Bytable::empty();
        v.push_to(&mut out);
        Ok(Some(out))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Vector4>> {
        Vector4::read_from(c).map(Some)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColorCodec;

impl Codec<ColorRgba> for ColorCodec {
    fn fixed_width(&self) -> Option<usize> {
        Some(ColorRgba::WIRE_SIZE)
    }

    fn write(
        &self,
        v: &ColorRgba,
        _params: &WriteParams,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let mut out = Bytable::empty();
        for channel in [v.r, v.g, v.b, v.a] {
            out.push_primitive(channel);
        }
        Ok(Some(out))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<ColorRgba>> {
        Ok(Some(ColorRgba {
            r: c.read_f32()?,
            g: c.read_f32()?,
            b: c.read_f32()?,
            a: c.read_f32()?,
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MathModule;

impl MathModule {
    pub const PRIORITY: i32 = 10;
}

impl SerializationModule for MathModule {
    fn name(&self) -> &'static str {
        "math"
    }

    fn claim(&self, claims: &mut Claims) {
        claims
            .claim::<Vector3, _>(Vector3Codec)
            .claim::<Vector4, _>(Vector4Codec)
            .claim::<ColorRgba, _>(ColorCodec)
            .claim_list::<Vector3>()
            .claim_option::<Vector3>();
    }
}
