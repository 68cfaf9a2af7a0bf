// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Avatar skeleton, bone bindings and per-frame user tracking.
//!
//! `BoneBinding` changed layout in protocol 2.7 (`sync_scale` appended before
//! `active`), so it is the one type here that is not countable: its width
//! depends on the negotiated version.

use crate::config::ProtocolVersion;
use crate::dto::math::{Vector3, Vector4};
use crate::error::CodecResult;
use crate::module::{Claims, Codec, SerializationModule, WriteParams};
use crate::registry::SerializerRegistry;
use crate::ser::{ByteContainer, Bytable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// First protocol version carrying `BoneBinding::sync_scale`.
pub const SYNC_SCALE_SINCE: ProtocolVersion = ProtocolVersion::new(2, 7, 0);

/// Write parameter: encode `UserTrackingFrame` without its camera pose.
#[derive(Debug, Clone, Copy, Default)]
pub struct OmitCamera;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bone {
    pub bone_type: u32,
    pub rotation: Vector4,
    pub position: Vector3,
}

impl Bone {
    pub const WIRE_SIZE: usize = 4 + Vector4::WIRE_SIZE + Vector3::WIRE_SIZE;
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoneBinding {
    pub bone_type: u32,
    pub node_id: u64,
    pub offset_position: Vector3,
    pub offset_rotation: Vector4,
    pub sync_position: bool,
    pub sync_rotation: bool,
    pub sync_scale: bool,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AvatarMapping {
    pub user_id: u64,
    pub activated: bool,
    pub bindings: Vec<BoneBinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CameraPose {
    pub position: Vector3,
    pub rotation: Vector4,
}

impl CameraPose {
    pub const WIRE_SIZE: usize = Vector3::WIRE_SIZE + Vector4::WIRE_SIZE;
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserTrackingFrame {
    pub user_id: u64,
    pub parent_id: u64,
    pub skeleton_height: f32,
    pub refresh_frequency: f32,
    pub bones: Vec<Bone>,
    pub camera: Option<CameraPose>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoneCodec;

impl Codec<Bone> for BoneCodec {
    fn fixed_width(&self) -> Option<usize> {
        Some(Bone::WIRE_SIZE)
    }

    fn write(
        &self,
        bone: &Bone,
        _params: &WriteParams,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let mut out = Bytable::primitive(bone.bone_type);
        bone.rotation.push_to(&mut out);
        bone.position.push_to(&mut out);
        Ok(Some(out))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bone>> {
        Ok(Some(Bone {
            bone_type: c.read_u32()?,
            rotation: Vector4::read_from(c)?,
            position: Vector3::read_from(c)?,
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoneBindingCodec;

impl Codec<BoneBinding> for BoneBindingCodec {
    fn write(
        &self,
        b: &BoneBinding,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let mut out = Bytable::primitive(b.bone_type) + Bytable::primitive(b.node_id);
        out += registry.write(&b.offset_position, params)?;
        out += registry.write(&b.offset_rotation, params)?;
        out.push_primitive(b.sync_position);
        out.push_primitive(b.sync_rotation);
        if params.version().supports(SYNC_SCALE_SINCE) {
            out.push_primitive(b.sync_scale);
        }
        out.push_primitive(b.active);
        Ok(Some(out))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<BoneBinding>> {
        Ok(Some(BoneBinding {
            bone_type: c.read_u32()?,
            node_id: c.read_u64()?,
            offset_position: registry.read(c)?,
            offset_rotation: registry.read(c)?,
            sync_position: c.read_bool()?,
            sync_rotation: c.read_bool()?,
            sync_scale: if c.version().supports(SYNC_SCALE_SINCE) {
                c.read_bool()?
            } else {
                false
            },
            active: c.read_bool()?,
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AvatarMappingCodec;

impl Codec<AvatarMapping> for AvatarMappingCodec {
    fn write(
        &self,
        m: &AvatarMapping,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        Ok(Some(
            Bytable::primitive(m.user_id)
                + Bytable::primitive(m.activated)
                + registry.write_list(&m.bindings, params)?,
        ))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<AvatarMapping>> {
        Ok(Some(AvatarMapping {
            user_id: c.read_u64()?,
            activated: c.read_bool()?,
            bindings: registry.read_list(c)?,
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CameraPoseCodec;

impl Codec<CameraPose> for CameraPoseCodec {
    fn fixed_width(&self) -> Option<usize> {
        Some(CameraPose::WIRE_SIZE)
    }

    fn write(
        &self,
        cam: &CameraPose,
        _params: &WriteParams,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let mut out = Bytable::empty();
        cam.position.push_to(&mut out);
        cam.rotation.push_to(&mut out);
        Ok(Some(out))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<CameraPose>> {
        Ok(Some(CameraPose {
            position: Vector3::read_from(c)?,
            rotation: Vector4::read_from(c)?,
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrackingFrameCodec;

impl Codec<UserTrackingFrame> for TrackingFrameCodec {
    fn write(
        &self,
        f: &UserTrackingFrame,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let mut out = Bytable::primitive(f.user_id) + Bytable::primitive(f.parent_id);
        out.push_primitive(f.skeleton_height);
        out.push_primitive(f.refresh_frequency);
        out += registry.write_list(&f.bones, params)?;
        let camera = if params.contains::<OmitCamera>() {
            &None
        } else {
            &f.camera
        };
        out += registry.write::<Option<CameraPose>>(camera, params)?;
        Ok(Some(out))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<UserTrackingFrame>> {
        Ok(Some(UserTrackingFrame {
            user_id: c.read_u64()?,
            parent_id: c.read_u64()?,
            skeleton_height: c.read_f32()?,
            refresh_frequency: c.read_f32()?,
            bones: registry.read_list(c)?,
            camera: registry.read(c)?,
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AvatarModule;

impl AvatarModule {
    pub const PRIORITY: i32 = 20;
}

impl SerializationModule for AvatarModule {
    fn name(&self) -> &'static str {
        "avatar"
    }

    fn claim(&self, claims: &mut Claims) {
        claims
            .claim::<Bone, _>(BoneCodec)
            .claim_list::<Bone>()
            .claim::<BoneBinding, _>(BoneBindingCodec)
            .claim_list::<BoneBinding>()
            .claim::<AvatarMapping, _>(AvatarMappingCodec)
            .claim::<CameraPose, _>(CameraPoseCodec)
            .claim_option::<CameraPose>()
            .claim::<UserTrackingFrame, _>(TrackingFrameCodec);
    }
}
