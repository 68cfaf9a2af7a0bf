// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Browser-to-environment requests.
//!
//! Wire layout: `[u32 tag][payload]`, tag from [`tags`]. A tag unknown to this
//! build fails with `UnsupportedType { tag: Some(..) }`; it is never read as a
//! neighbouring variant.

use crate::dto::math::{ColorRgba, Vector3, Vector4};
use crate::error::{CodecError, CodecResult};
use crate::module::{Claims, Codec, SerializationModule, TaggedFamily, WriteParams};
use crate::registry::SerializerRegistry;
use crate::ser::{ByteContainer, Bytable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tags of the [`Request`] family.
pub mod tags {
    pub const EMOTE_REQUEST: u32 = 0x0101;
    pub const INTERACTION: u32 = 0x0102;
    pub const USER_CAMERA: u32 = 0x0103;
    pub const POSE_ACTIVATION: u32 = 0x0104;
    pub const NAVIGATE: u32 = 0x0105;
    pub const TELEPORT: u32 = 0x0106;
    pub const PARAMETER_SETTING: u32 = 0x0107;
}

/// Tags of the [`ParameterValue`] family.
pub mod value_tags {
    pub const BOOL: u32 = 1;
    pub const INT: u32 = 2;
    pub const FLOAT: u32 = 3;
    pub const TEXT: u32 = 4;
    pub const VECTOR3: u32 = 5;
    pub const COLOR: u32 = 6;
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Request {
    TriggerEmote { emote_id: u64, trigger: bool },
    Interaction(InteractionRequest),
    UserCamera(UserCameraProperties),
    PoseActivation { pose_id: u64, active: bool },
    Navigate { position: Vector3 },
    Teleport { position: Vector3, rotation: Vector4 },
    ParameterSetting(ParameterSettingRequest),
}

impl TaggedFamily for Request {
    fn tag(&self) -> u32 {
        match self {
            Request::TriggerEmote { .. } => tags::EMOTE_REQUEST,
            Request::Interaction(_) => tags::INTERACTION,
            Request::UserCamera(_) => tags::USER_CAMERA,
            Request::PoseActivation { .. } => tags::POSE_ACTIVATION,
            Request::Navigate { .. } => tags::NAVIGATE,
            Request::Teleport { .. } => tags::TELEPORT,
            Request::ParameterSetting(_) => tags::PARAMETER_SETTING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum InteractionKind {
    #[default]
    Trigger = 1,
    Hover = 2,
    HoverEnter = 3,
    HoverExit = 4,
    Manipulate = 5,
}

impl TryFrom<u8> for InteractionKind {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => InteractionKind::Trigger,
            2 => InteractionKind::Hover,
            3 => InteractionKind::HoverEnter,
            4 => InteractionKind::HoverExit,
            5 => InteractionKind::Manipulate,
            other => {
                return Err(CodecError::malformed::<InteractionKind>(format!(
                    "invalid interaction kind {}",
                    other
                )))
            }
        })
    }
}

/// A user acting on an interaction with a tool, from a given bone.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InteractionRequest {
    pub kind: InteractionKind,
    pub tool_id: u64,
    pub interaction_id: u64,
    pub hovered_object_id: u64,
    pub bone_type: u32,
    pub bone_position: Vector3,
    pub bone_rotation: Vector4,
}

impl InteractionRequest {
    pub const WIRE_SIZE: usize = 1 + 3 * 8 + 4 + Vector3::WIRE_SIZE + Vector4::WIRE_SIZE;
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserCameraProperties {
    pub scale: f32,
    /// Column-major 4x4 projection matrix.
    pub projection: [f32; 16],
    pub bone_type: u32,
}

impl UserCameraProperties {
    pub const WIRE_SIZE: usize = 4 + 16 * 4 + 4;
}

impl Default for UserCameraProperties {
    fn default() -> Self {
        let mut projection = [0.0; 16];
        for i in 0..4 {
            projection[i * 5] = 1.0;
        }
        Self {
            scale: 1.0,
            projection,
            bone_type: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParameterValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Text(String),
    Vector3(Vector3),
    Color(ColorRgba),
}

impl TaggedFamily for ParameterValue {
    fn tag(&self) -> u32 {
        match self {
            ParameterValue::Bool(_) => value_tags::BOOL,
            ParameterValue::Int(_) => value_tags::INT,
            ParameterValue::Float(_) => value_tags::FLOAT,
            ParameterValue::Text(_) => value_tags::TEXT,
            ParameterValue::Vector3(_) => value_tags::VECTOR3,
            ParameterValue::Color(_) => value_tags::COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParameterSettingRequest {
    pub tool_id: u64,
    pub interaction_id: u64,
    pub hovered_object_id: u64,
    pub value: ParameterValue,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionRequestCodec;

impl Codec<InteractionRequest> for InteractionRequestCodec {
    fn fixed_width(&self) -> Option<usize> {
        Some(InteractionRequest::WIRE_SIZE)
    }

    fn write(
        &self,
        r: &InteractionRequest,
        _params: &WriteParams,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let mut out = Bytable::primitive(r.kind as u8);
        out.push_primitive(r.tool_id);
        out.push_primitive(r.interaction_id);
        out.push_primitive(r.hovered_object_id);
        out.push_primitive(r.bone_type);
        r.bone_position.push_to(&mut out);
        r.bone_rotation.push_to(&mut out);
        Ok(Some(out))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<InteractionRequest>> {
        Ok(Some(InteractionRequest {
            kind: InteractionKind::try_from(c.read_u8()?)?,
            tool_id: c.read_u64()?,
            interaction_id: c.read_u64()?,
            hovered_object_id: c.read_u64()?,
            bone_type: c.read_u32()?,
            bone_position: Vector3::read_from(c)?,
            bone_rotation: Vector4::read_from(c)?,
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UserCameraCodec;

impl Codec<UserCameraProperties> for UserCameraCodec {
    fn fixed_width(&self) -> Option<usize> {
        Some(UserCameraProperties::WIRE_SIZE)
    }

    fn write(
        &self,
        cam: &UserCameraProperties,
        _params: &WriteParams,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let mut out = Bytable::primitive(cam.scale);
        for cell in cam.projection {
            out.push_primitive(cell);
        }
        out.push_primitive(cam.bone_type);
        Ok(Some(out))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<UserCameraProperties>> {
        let scale = c.read_f32()?;
        let mut projection = [0.0f32; 16];
        for cell in projection.iter_mut() {
            *cell = c.read_f32()?;
        }
        Ok(Some(UserCameraProperties {
            scale,
            projection,
            bone_type: c.read_u32()?,
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterValueCodec;

impl Codec<ParameterValue> for ParameterValueCodec {
    fn write(
        &self,
        value: &ParameterValue,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let payload = match value {
            ParameterValue::Bool(v) => Bytable::primitive(*v),
            ParameterValue::Int(v) => Bytable::primitive(*v),
            ParameterValue::Float(v) => Bytable::primitive(*v),
            ParameterValue::Text(v) => registry.write(v, params)?,
            ParameterValue::Vector3(v) => registry.write(v, params)?,
            ParameterValue::Color(v) => registry.write(v, params)?,
        };
        Ok(Some(Bytable::primitive(value.tag()) + payload))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<ParameterValue>> {
        let value = match c.read_u32()? {
            value_tags::BOOL => ParameterValue::Bool(c.read_bool()?),
            value_tags::INT => ParameterValue::Int(c.read_i32()?),
            value_tags::FLOAT => ParameterValue::Float(c.read_f32()?),
            value_tags::TEXT => ParameterValue::Text(registry.read(c)?),
            value_tags::VECTOR3 => ParameterValue::Vector3(registry.read(c)?),
            value_tags::COLOR => ParameterValue::Color(registry.read(c)?),
            other => return Err(CodecError::unknown_tag::<ParameterValue>(other)),
        };
        Ok(Some(value))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestCodec;

impl Codec<Request> for RequestCodec {
    fn write(
        &self,
        request: &Request,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let payload = match request {
            Request::TriggerEmote { emote_id, trigger } => {
                Bytable::primitive(*emote_id) + Bytable::primitive(*trigger)
            }
            Request::Interaction(r) => registry.write(r, params)?,
            Request::UserCamera(cam) => registry.write(cam, params)?,
            Request::PoseActivation { pose_id, active } => {
                Bytable::primitive(*pose_id) + Bytable::primitive(*active)
            }
            Request::Navigate { position } => registry.write(position, params)?,
            Request::Teleport { position, rotation } => {
                registry.write(position, params)? + registry.write(rotation, params)?
            }
            Request::ParameterSetting(p) => {
                let mut out = Bytable::primitive(p.tool_id);
                out.push_primitive(p.interaction_id);
                out.push_primitive(p.hovered_object_id);
                out + registry.write(&p.value, params)?
            }
        };
        Ok(Some(Bytable::primitive(request.tag()) + payload))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Request>> {
        let request = match c.read_u32()? {
            tags::EMOTE_REQUEST => Request::TriggerEmote {
                emote_id: c.read_u64()?,
                trigger: c.read_bool()?,
            },
            tags::INTERACTION => Request::Interaction(registry.read(c)?),
            tags::USER_CAMERA => Request::UserCamera(registry.read(c)?),
            tags::POSE_ACTIVATION => Request::PoseActivation {
                pose_id: c.read_u64()?,
                active: c.read_bool()?,
            },
            tags::NAVIGATE => Request::Navigate {
                position: registry.read(c)?,
            },
            tags::TELEPORT => Request::Teleport {
                position: registry.read(c)?,
                rotation: registry.read(c)?,
            },
            tags::PARAMETER_SETTING => Request::ParameterSetting(ParameterSettingRequest {
                tool_id: c.read_u64()?,
                interaction_id: c.read_u64()?,
                hovered_object_id: c.read_u64()?,
                value: registry.read(c)?,
            }),
            other => return Err(CodecError::unknown_tag::<Request>(other)),
        };
        Ok(Some(request))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestModule;

impl RequestModule {
    pub const PRIORITY: i32 = 40;
}

impl SerializationModule for RequestModule {
    fn name(&self) -> &'static str {
        "request"
    }

    fn claim(&self, claims: &mut Claims) {
        claims
            .claim::<Request, _>(RequestCodec)
            .claim_list::<Request>()
            .claim::<InteractionRequest, _>(InteractionRequestCodec)
            .claim::<UserCameraProperties, _>(UserCameraCodec)
            .claim::<ParameterValue, _>(ParameterValueCodec);
    }
}
