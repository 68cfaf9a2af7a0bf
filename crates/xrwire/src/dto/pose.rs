// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pose conditions, clips and animators.
//!
//! `PoseCondition` is recursive (`And`, `Or`, `Not`); every child goes back
//! through the registry, so nesting is bounded by `CodecConfig::max_depth`.

use crate::dto::avatar::Bone;
use crate::dto::math::{Vector3, Vector4};
use crate::error::{CodecError, CodecResult};
use crate::module::{Claims, Codec, SerializationModule, TaggedFamily, WriteParams};
use crate::registry::SerializerRegistry;
use crate::ser::{ByteContainer, Bytable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tags of the [`PoseCondition`] family.
pub mod tags {
    pub const MAGNITUDE: u32 = 0x0201;
    pub const BONE_ROTATION: u32 = 0x0202;
    pub const DIRECTION: u32 = 0x0203;
    pub const SCALE: u32 = 0x0204;
    pub const ENVIRONMENT: u32 = 0x0205;
    pub const AND: u32 = 0x0210;
    pub const OR: u32 = 0x0211;
    pub const NOT: u32 = 0x0212;
}

/// Condition evaluated by a pose animator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PoseCondition {
    /// Distance between a bone and a node stays under `magnitude`.
    Magnitude {
        magnitude: f32,
        bone_origin: u32,
        target_node_id: u64,
    },
    BoneRotation {
        bone_id: u32,
        rotation: Vector4,
        accept_range: Vector3,
    },
    Direction {
        bone_id: u32,
        relative_bone_id: u32,
        direction: Vector3,
        accept_range: f32,
    },
    Scale {
        target_scale: Vector3,
    },
    Environment {
        environment_id: u64,
        allowed: bool,
    },
    And(Box<PoseCondition>, Box<PoseCondition>),
    Or(Box<PoseCondition>, Box<PoseCondition>),
    /// Satisfied when none of the listed conditions hold.
    Not(Vec<PoseCondition>),
}

impl TaggedFamily for PoseCondition {
    fn tag(&self) -> u32 {
        match self {
            PoseCondition::Magnitude { .. } => tags::MAGNITUDE,
            PoseCondition::BoneRotation { .. } => tags::BONE_ROTATION,
            PoseCondition::Direction { .. } => tags::DIRECTION,
            PoseCondition::Scale { .. } => tags::SCALE,
            PoseCondition::Environment { .. } => tags::ENVIRONMENT,
            PoseCondition::And(..) => tags::AND,
            PoseCondition::Or(..) => tags::OR,
            PoseCondition::Not(..) => tags::NOT,
        }
    }
}

impl PoseCondition {
    pub fn and(a: PoseCondition, b: PoseCondition) -> Self {
        PoseCondition::And(Box::new(a), Box::new(b))
    }

    pub fn or(a: PoseCondition, b: PoseCondition) -> Self {
        PoseCondition::Or(Box::new(a), Box::new(b))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoseClip {
    pub id: u64,
    pub bones: Vec<Bone>,
    pub is_relative: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ActivationMode {
    #[default]
    OnRequest = 0,
    AutoCheck = 1,
}

impl TryFrom<u8> for ActivationMode {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ActivationMode::OnRequest),
            1 => Ok(ActivationMode::AutoCheck),
            other => Err(CodecError::malformed::<ActivationMode>(format!(
                "invalid activation mode {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoseAnimator {
    pub id: u64,
    pub clip_id: u64,
    pub activation_mode: ActivationMode,
    pub conditions: Vec<PoseCondition>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PoseConditionCodec;

impl Codec<PoseCondition> for PoseConditionCodec {
    fn write(
        &self,
        value: &PoseCondition,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let mut out = Bytable::primitive(value.tag());
        match value {
            PoseCondition::Magnitude {
                magnitude,
                bone_origin,
                target_node_id,
            } => {
                out.push_primitive(*magnitude);
                out.push_primitive(*bone_origin);
                out.push_primitive(*target_node_id);
            }
            PoseCondition::BoneRotation {
                bone_id,
                rotation,
                accept_range,
            } => {
                out.push_primitive(*bone_id);
                out += registry.write(rotation, params)?;
                out += registry.write(accept_range, params)?;
            }
            PoseCondition::Direction {
                bone_id,
                relative_bone_id,
                direction,
                accept_range,
            } => {
                out.push_primitive(*bone_id);
                out.push_primitive(*relative_bone_id);
                out += registry.write(direction, params)?;
                out.push_primitive(*accept_range);
            }
            PoseCondition::Scale { target_scale } => {
                out += registry.write(target_scale, params)?;
            }
            PoseCondition::Environment {
                environment_id,
                allowed,
            } => {
                out.push_primitive(*environment_id);
                out.push_primitive(*allowed);
            }
            PoseCondition::And(a, b) | PoseCondition::Or(a, b) => {
                out += registry.write::<PoseCondition>(a, params)?;
                out += registry.write::<PoseCondition>(b, params)?;
            }
            PoseCondition::Not(conditions) => {
                out += registry.write_list(conditions, params)?;
            }
        }
        Ok(Some(out))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<PoseCondition>> {
        let tag = c.read_u32()?;
        let condition = match tag {
            tags::MAGNITUDE => PoseCondition::Magnitude {
                magnitude: c.read_f32()?,
                bone_origin: c.read_u32()?,
                target_node_id: c.read_u64()?,
            },
            tags::BONE_ROTATION => PoseCondition::BoneRotation {
                bone_id: c.read_u32()?,
                rotation: registry.read(c)?,
                accept_range: registry.read(c)?,
            },
            tags::DIRECTION => PoseCondition::Direction {
                bone_id: c.read_u32()?,
                relative_bone_id: c.read_u32()?,
                direction: registry.read(c)?,
                accept_range: c.read_f32()?,
            },
            tags::SCALE => PoseCondition::Scale {
                target_scale: registry.read(c)?,
            },
            tags::ENVIRONMENT => PoseCondition::Environment {
                environment_id: c.read_u64()?,
                allowed: c.read_bool()?,
            },
            tags::AND => PoseCondition::And(
                Box::new(registry.read(c)?),
                Box::new(registry.read(c)?),
            ),
            tags::OR => PoseCondition::Or(
                Box::new(registry.read(c)?),
                Box::new(registry.read(c)?),
            ),
            tags::NOT => PoseCondition::Not(registry.read_list(c)?),
            other => return Err(CodecError::unknown_tag::<PoseCondition>(other)),
        };
        Ok(Some(condition))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PoseClipCodec;

impl Codec<PoseClip> for PoseClipCodec {
    fn write(
        &self,
        clip: &PoseClip,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        Ok(Some(
            Bytable::primitive(clip.id)
                + registry.write_list(&clip.bones, params)?
                + Bytable::primitive(clip.is_relative),
        ))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<PoseClip>> {
        Ok(Some(PoseClip {
            id: c.read_u64()?,
            bones: registry.read_list(c)?,
            is_relative: c.read_bool()?,
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PoseAnimatorCodec;

impl Codec<PoseAnimator> for PoseAnimatorCodec {
    fn write(
        &self,
        animator: &PoseAnimator,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let mut out = Bytable::primitive(animator.id) + Bytable::primitive(animator.clip_id);
        out.push_primitive(animator.activation_mode as u8);
        out += registry.write_list(&animator.conditions, params)?;
        Ok(Some(out))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<PoseAnimator>> {
        Ok(Some(PoseAnimator {
            id: c.read_u64()?,
            clip_id: c.read_u64()?,
            activation_mode: ActivationMode::try_from(c.read_u8()?)?,
            conditions: registry.read_list(c)?,
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PoseModule;

impl PoseModule {
    pub const PRIORITY: i32 = 30;
}

impl SerializationModule for PoseModule {
    fn name(&self) -> &'static str {
        "pose"
    }

    fn claim(&self, claims: &mut Claims) {
        claims
            .claim::<PoseCondition, _>(PoseConditionCodec)
            .claim_list::<PoseCondition>()
            .claim::<PoseClip, _>(PoseClipCodec)
            .claim::<PoseAnimator, _>(PoseAnimatorCodec);
    }
}
