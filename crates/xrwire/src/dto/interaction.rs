// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Interaction descriptors published by environments.

use crate::error::{CodecError, CodecResult};
use crate::module::{Claims, Codec, SerializationModule, TaggedFamily, WriteParams};
use crate::registry::SerializerRegistry;
use crate::ser::{ByteContainer, Bytable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tags of the [`InteractionDto`] family.
pub mod tags {
    pub const EVENT: u32 = 0x0401;
    pub const MANIPULATION: u32 = 0x0402;
    pub const FORM: u32 = 0x0403;
    pub const LINK: u32 = 0x0404;
}

/// Degrees of freedom a manipulation drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
#[allow(clippy::upper_case_acronyms)]
pub enum DofGroup {
    X = 0,
    Y = 1,
    Z = 2,
    XY = 3,
    XZ = 4,
    YZ = 5,
    XYZ = 6,
    RX = 7,
    RY = 8,
    RZ = 9,
}

impl DofGroup {
    const ALL: [DofGroup; 10] = [
        DofGroup::X,
        DofGroup::Y,
        DofGroup::Z,
        DofGroup::XY,
        DofGroup::XZ,
        DofGroup::YZ,
        DofGroup::XYZ,
        DofGroup::RX,
        DofGroup::RY,
        DofGroup::RZ,
    ];
}

impl TryFrom<u8> for DofGroup {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        DofGroup::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| CodecError::malformed::<DofGroup>(format!("invalid dof group {}", value)))
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InteractionDto {
    Event {
        id: u64,
        name: String,
        /// Fires continuously while held instead of once.
        hold: bool,
    },
    Manipulation {
        id: u64,
        name: String,
        frame_of_reference: u64,
        dofs: Vec<DofGroup>,
    },
    Form {
        id: u64,
        name: String,
        fields: Vec<InteractionDto>,
    },
    Link {
        id: u64,
        name: String,
        url: String,
    },
}

impl TaggedFamily for InteractionDto {
    fn tag(&self) -> u32 {
        match self {
            InteractionDto::Event { .. } => tags::EVENT,
            InteractionDto::Manipulation { .. } => tags::MANIPULATION,
            InteractionDto::Form { .. } => tags::FORM,
            InteractionDto::Link { .. } => tags::LINK,
        }
    }
}

impl InteractionDto {
    pub fn id(&self) -> u64 {
        match self {
            InteractionDto::Event { id, .. }
            | InteractionDto::Manipulation { id, .. }
            | InteractionDto::Form { id, .. }
            | InteractionDto::Link { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        self.name_field()
    }

    fn name_field(&self) -> &String {
        match self {
            InteractionDto::Event { name, .. }
            | InteractionDto::Manipulation { name, .. }
            | InteractionDto::Form { name, .. }
            | InteractionDto::Link { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DofGroupCodec;

impl Codec<DofGroup> for DofGroupCodec {
    fn fixed_width(&self) -> Option<usize> {
        Some(1)
    }

    fn write(
        &self,
        value: &DofGroup,
        _params: &WriteParams,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        Ok(Some(Bytable::primitive(*value as u8)))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        _registry: &SerializerRegistry,
    ) -> CodecResult<Option<DofGroup>> {
        DofGroup::try_from(c.read_u8()?).map(Some)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionCodec;

impl Codec<InteractionDto> for InteractionCodec {
    fn write(
        &self,
        dto: &InteractionDto,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let header = Bytable::primitive(dto.tag())
            + Bytable::primitive(dto.id())
            + registry.write(dto.name_field(), params)?;
        let body = match dto {
            InteractionDto::Event { hold, .. } => Bytable::primitive(*hold),
            InteractionDto::Manipulation {
                frame_of_reference,
                dofs,
                ..
            } => Bytable::primitive(*frame_of_reference) + registry.write_list(dofs, params)?,
            InteractionDto::Form { fields, .. } => registry.write_list(fields, params)?,
            InteractionDto::Link { url, .. } => registry.write(url, params)?,
        };
        Ok(Some(header + body))
    }

    fn read(
        &self,
        c: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<InteractionDto>> {
        let tag = c.read_u32()?;
        if !matches!(tag, tags::EVENT | tags::MANIPULATION | tags::FORM | tags::LINK) {
            return Err(CodecError::unknown_tag::<InteractionDto>(tag));
        }
        let id = c.read_u64()?;
        let name: String = registry.read(c)?;

        let dto = match tag {
            tags::EVENT => InteractionDto::Event {
                id,
                name,
                hold: c.read_bool()?,
            },
            tags::MANIPULATION => InteractionDto::Manipulation {
                id,
                name,
                frame_of_reference: c.read_u64()?,
                dofs: registry.read_list(c)?,
            },
            tags::FORM => InteractionDto::Form {
                id,
                name,
                fields: registry.read_list(c)?,
            },
            _ => InteractionDto::Link {
                id,
                name,
                url: registry.read(c)?,
            },
        };
        Ok(Some(dto))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionModule;

impl InteractionModule {
    pub const PRIORITY: i32 = 50;
}

impl SerializationModule for InteractionModule {
    fn name(&self) -> &'static str {
        "interaction"
    }

    fn claim(&self, claims: &mut Claims) {
        claims
            .claim::<DofGroup, _>(DofGroupCodec)
            .claim_list::<DofGroup>()
            .claim::<InteractionDto, _>(InteractionCodec)
            .claim_list::<InteractionDto>();
    }
}
