// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializer registry: ordered modules resolved into a per-type lookup.
//!
//! # Architecture
//!
//! ```text
//! RegistryBuilder
//! +-- modules: [(priority, Arc<dyn SerializationModule>)]
//!        |  build(): stable sort, Claims collected once
//!        v
//! SerializerRegistry (immutable, Send + Sync)
//! +-- claims: HashMap<TypeId, [ResolvedClaim]>   (priority order)
//! +-- config: CodecConfig
//!
//! SharedRegistry
//! +-- ArcSwap<SerializerRegistry>  (atomic reconfiguration)
//! ```
//!
//! # Dispatch
//!
//! - `write::<T>`: claimants of `T` in order; first `Some(Bytable)` wins.
//! - Both directions count nesting against `max_depth`, and `write_list`
//!   applies `max_collection_len`, so whatever encodes also decodes.
//! - `read::<T>`: claimants in order; a claimant that declines is rewound and
//!   the next one is tried; an error stops the read.
//! - No claimant, or all declined: [`CodecError::UnsupportedType`].

mod builder;
mod shared;

pub use builder::RegistryBuilder;
pub use shared::SharedRegistry;

use crate::config::{CodecConfig, ProtocolVersion};
use crate::dto::{AvatarModule, InteractionModule, MathModule, PoseModule, RequestModule};
use crate::error::{CodecError, CodecResult};
use crate::module::{ErasedCodec, SerializationModule, WriteParams};
use crate::primitives::PrimitiveModule;
use crate::ser::{ByteContainer, Bytable};
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub(crate) struct ResolvedClaim {
    pub(crate) module: &'static str,
    pub(crate) type_name: &'static str,
    pub(crate) codec: Arc<dyn ErasedCodec>,
}

pub(crate) struct ModuleSlot {
    pub(crate) name: &'static str,
    pub(crate) priority: i32,
    pub(crate) module: Arc<dyn SerializationModule>,
}

/// Ordered collection of serialization modules.
///
/// Built once, then shared by reference (or `Arc`) with every encode/decode
/// call site. All methods take `&self`.
pub struct SerializerRegistry {
    config: CodecConfig,
    modules: Vec<ModuleSlot>,
    claims: HashMap<TypeId, Vec<ResolvedClaim>>,
}

impl SerializerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry with the primitive module and every DTO module of this crate.
    pub fn standard() -> Self {
        Self::standard_builder().build()
    }

    /// Builder preloaded like [`standard`](Self::standard), for adding modules or config.
    pub fn standard_builder() -> RegistryBuilder {
        RegistryBuilder::new()
            .register_module(PrimitiveModule, PrimitiveModule::PRIORITY)
            .register_module(MathModule, MathModule::PRIORITY)
            .register_module(AvatarModule, AvatarModule::PRIORITY)
            .register_module(PoseModule, PoseModule::PRIORITY)
            .register_module(RequestModule, RequestModule::PRIORITY)
            .register_module(InteractionModule, InteractionModule::PRIORITY)
    }

    /// Builder holding the same modules and config, for reconfiguration.
    pub fn to_builder(&self) -> RegistryBuilder {
        self.modules.iter().fold(
            RegistryBuilder::new().with_config(self.config.clone()),
            |builder, slot| builder.register_shared(Arc::clone(&slot.module), slot.priority),
        )
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Module names in dispatch order.
    pub fn modules(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.modules.iter().map(|slot| (slot.name, slot.priority))
    }

    pub fn claims_type<T: 'static>(&self) -> bool {
        self.claims.contains_key(&TypeId::of::<T>())
    }

    /// Modules claiming `T`, in dispatch order.
    pub fn claimants_of<T: 'static>(&self) -> Vec<&'static str> {
        self.claims
            .get(&TypeId::of::<T>())
            .map(|claims| claims.iter().map(|c| c.module).collect())
            .unwrap_or_default()
    }

    fn claimants<T: 'static>(&self) -> CodecResult<&[ResolvedClaim]> {
        self.claims
            .get(&TypeId::of::<T>())
            .map(Vec::as_slice)
            .ok_or_else(CodecError::unsupported::<T>)
    }

    /// Fixed encoded width of `T`, or `None` when `T` is variable-length.
    pub fn fixed_width<T: 'static>(&self) -> CodecResult<Option<usize>> {
        Ok(self.claimants::<T>()?[0].codec.fixed_width())
    }

    pub fn is_countable<T: 'static>(&self) -> CodecResult<bool> {
        Ok(self.fixed_width::<T>()?.is_some())
    }

    /// Encode `value` through the first module that accepts it.
    pub fn write<T: 'static>(&self, value: &T, params: &WriteParams) -> CodecResult<Bytable> {
        let claimants = self.claimants::<T>()?;
        params.enter::<T>(self.config.max_depth)?;
        let result = self.dispatch_write(claimants, value, params);
        params.leave();
        result
    }

    fn dispatch_write<T: 'static>(
        &self,
        claimants: &[ResolvedClaim],
        value: &T,
        params: &WriteParams,
    ) -> CodecResult<Bytable> {
        for claim in claimants {
            if let Some(bytes) = claim.codec.write_erased(value, params, self)? {
                return Ok(bytes);
            }
        }
        Err(CodecError::unsupported::<T>())
    }

    /// Decode a `T` at the container's cursor.
    pub fn read<T: 'static>(&self, container: &mut ByteContainer<'_>) -> CodecResult<T> {
        let claimants = self.claimants::<T>()?;
        container.enter(self.config.max_depth, type_name::<T>())?;
        let result = self.dispatch_read::<T>(claimants, container);
        container.leave();
        result
    }

    fn dispatch_read<T: 'static>(
        &self,
        claimants: &[ResolvedClaim],
        container: &mut ByteContainer<'_>,
    ) -> CodecResult<T> {
        let start = container.position();
        let mut slot: Option<T> = None;

        for claim in claimants {
            if claim.codec.read_erased(container, self, &mut slot)? {
                if let Some(value) = slot.take() {
                    return Ok(value);
                }
            }
            if container.position() != start {
                log::warn!(
                    "[registry] '{}' declined {} after consuming {} bytes; rewinding",
                    claim.module,
                    claim.type_name,
                    container.position().saturating_sub(start)
                );
                container.set_position(start)?;
            }
        }
        Err(CodecError::unsupported::<T>())
    }

    /// `[u32 count][element]*`.
    ///
    /// Refuses more than `max_collection_len` items.
    pub fn write_list<T: 'static>(&self, items: &[T], params: &WriteParams) -> CodecResult<Bytable> {
        if items.len() > self.config.max_collection_len {
            return Err(CodecError::limit_exceeded::<Vec<T>>(
                "collection length",
                items.len(),
                self.config.max_collection_len,
            ));
        }
        let mut out = Bytable::count(items.len())?;
        for item in items {
            out += self.write(item, params)?;
        }
        Ok(out)
    }

    /// Inverse of [`write_list`](Self::write_list).
    ///
    /// Counts above `max_collection_len` are malformed. For countable elements the
    /// whole collection must fit in the remaining bytes before anything is allocated.
    pub fn read_list<T: 'static>(&self, container: &mut ByteContainer<'_>) -> CodecResult<Vec<T>> {
        let count = container.read_len()?;
        if count > self.config.max_collection_len {
            return Err(CodecError::malformed::<Vec<T>>(format!(
                "count {} exceeds limit {}",
                count, self.config.max_collection_len
            )));
        }
        if let Some(width) = self.fixed_width::<T>()? {
            let needed = count.saturating_mul(width);
            if needed > container.remaining() {
                return Err(CodecError::OutOfBounds {
                    offset: container.position(),
                    requested: needed,
                    remaining: container.remaining(),
                });
            }
        }

        // Every element takes at least one byte on the wire, except zero-width ones.
        let mut items = Vec::with_capacity(count.min(container.remaining()));
        for _ in 0..count {
            items.push(self.read::<T>(container)?);
        }
        Ok(items)
    }

    /// Skippable frame: `[u32 length][payload]`.
    pub fn write_framed<T: 'static>(&self, value: &T, params: &WriteParams) -> CodecResult<Bytable> {
        self.write(value, params)?.length_prefixed()
    }

    /// Decode a frame written by [`write_framed`](Self::write_framed).
    ///
    /// The payload must consume the frame exactly.
    pub fn read_framed<T: 'static>(&self, container: &mut ByteContainer<'_>) -> CodecResult<T> {
        let len = container.read_len()?;
        let mut frame = container.sub_container(len)?;
        let value = self.read::<T>(&mut frame)?;
        if !frame.is_eof() {
            return Err(CodecError::malformed::<T>(format!(
                "frame has {} unread bytes",
                frame.remaining()
            )));
        }
        Ok(value)
    }

    /// Jump over one frame without decoding it; returns the payload length.
    pub fn skip_framed(&self, container: &mut ByteContainer<'_>) -> CodecResult<usize> {
        let len = container.read_len()?;
        container.skip(len)?;
        Ok(len)
    }

    /// Encode a top-level message for the registry's protocol version.
    pub fn encode<T: 'static>(&self, value: &T) -> CodecResult<Vec<u8>> {
        self.encode_with(value, &WriteParams::for_version(self.config.protocol_version))
    }

    pub fn encode_with<T: 'static>(&self, value: &T, params: &WriteParams) -> CodecResult<Vec<u8>> {
        let bytes = self.write(value, params)?;
        let out = bytes.to_vec();
        log::trace!(
            "[registry] encoded {} ({} bytes, protocol {})",
            type_name::<T>(),
            out.len(),
            params.version()
        );
        Ok(out)
    }

    /// Decode a top-level message written for the registry's protocol version.
    pub fn decode<T: 'static>(&self, bytes: &[u8]) -> CodecResult<T> {
        self.decode_with_version(bytes, self.config.protocol_version)
    }

    pub fn decode_with_version<T: 'static>(
        &self,
        bytes: &[u8],
        version: ProtocolVersion,
    ) -> CodecResult<T> {
        let mut container = ByteContainer::with_version(bytes, version);
        let value = self.read::<T>(&mut container)?;
        if self.config.reject_trailing_bytes && !container.is_eof() {
            return Err(CodecError::malformed::<T>(format!(
                "{} trailing bytes after message",
                container.remaining()
            )));
        }
        log::trace!(
            "[registry] decoded {} ({} bytes, protocol {})",
            type_name::<T>(),
            container.position(),
            version
        );
        Ok(value)
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name).collect::<Vec<_>>(),
            )
            .field("types", &self.claims.len())
            .field("config", &self.config)
            .finish()
    }
}
