// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serialization modules and per-type codecs.
//!
//! A [`SerializationModule`] owns a family of types. At registry build time it
//! declares, through [`Claims`], one [`Codec`] per type it can encode/decode.
//! The registry resolves those claims into a lookup keyed by [`TypeId`].
//!
//! # Codec contract
//!
//! | Call | `Ok(Some(_))` | `Ok(None)` | `Err(_)` |
//! |------|---------------|------------|----------|
//! | `write` | encoded | not mine, nothing emitted | value cannot be encoded |
//! | `read` | decoded | bytes not recognised, cursor untouched | claimed but unreadable |
//!
//! Round-trip law: `read(write(v)) == v` for every value a codec accepts.

use crate::config::ProtocolVersion;
use crate::error::{CodecError, CodecResult};
use crate::registry::SerializerRegistry;
use crate::ser::{ByteContainer, Bytable};
use std::any::{type_name, Any, TypeId};
use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Encode/decode capability for one type.
pub trait Codec<T: 'static>: Send + Sync + 'static {
    /// Encoded width when it depends only on the type, never on the value.
    ///
    /// Returning `Some` for a variable-length encoding misaligns every reader.
    fn fixed_width(&self) -> Option<usize> {
        None
    }

    fn is_countable(&self) -> bool {
        self.fixed_width().is_some()
    }

    fn write(
        &self,
        value: &T,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>>;

    fn read(
        &self,
        container: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<T>>;
}

/// A pluggable unit owning a family of types.
pub trait SerializationModule: Send + Sync + 'static {
    /// Name used in logs and registry listings.
    fn name(&self) -> &'static str;

    /// Declare the codecs this module provides.
    fn claim(&self, claims: &mut Claims);
}

/// Closed sum type encoded as `[u32 tag][variant payload]`.
///
/// Codecs `match` over the enum to produce the payload, so every variant is
/// covered at compile time and no tag is emitted for an unhandled one.
pub trait TaggedFamily {
    fn tag(&self) -> u32;
}

/// Object-safe view of a `Codec<T>`.
pub(crate) trait ErasedCodec: Send + Sync {
    fn fixed_width(&self) -> Option<usize>;

    fn write_erased(
        &self,
        value: &dyn Any,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>>;

    /// Decode into `slot` (an `Option<T>`); returns false when the codec declined.
    fn read_erased(
        &self,
        container: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
        slot: &mut dyn Any,
    ) -> CodecResult<bool>;
}

struct Erased<T, C> {
    codec: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static, C: Codec<T>> ErasedCodec for Erased<T, C> {
    fn fixed_width(&self) -> Option<usize> {
        if self.codec.is_countable() {
            self.codec.fixed_width()
        } else {
            None
        }
    }

    fn write_erased(
        &self,
        value: &dyn Any,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        match value.downcast_ref::<T>() {
            Some(value) => self.codec.write(value, params, registry),
            None => Ok(None),
        }
    }

    fn read_erased(
        &self,
        container: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
        slot: &mut dyn Any,
    ) -> CodecResult<bool> {
        let Some(slot) = slot.downcast_mut::<Option<T>>() else {
            return Ok(false);
        };
        match self.codec.read(container, registry)? {
            Some(value) => {
                *slot = Some(value);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// One type claimed by one module.
pub(crate) struct ClaimEntry {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) codec: Arc<dyn ErasedCodec>,
}

/// Collector handed to [`SerializationModule::claim`].
pub struct Claims {
    module: &'static str,
    entries: Vec<ClaimEntry>,
}

impl Claims {
    pub(crate) fn new(module: &'static str) -> Self {
        Self {
            module,
            entries: Vec::new(),
        }
    }

    /// Name of the module currently claiming.
    pub fn module(&self) -> &'static str {
        self.module
    }

    /// Claim `T` with `codec`.
    pub fn claim<T: 'static, C: Codec<T>>(&mut self, codec: C) -> &mut Self {
        self.entries.push(ClaimEntry {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            codec: Arc::new(Erased {
                codec,
                _marker: PhantomData,
            }),
        });
        self
    }

    /// Claim `Vec<T>` as `[u32 count][T]*`, elements going back through the registry.
    pub fn claim_list<T: 'static>(&mut self) -> &mut Self {
        self.claim::<Vec<T>, _>(ListCodec::<T>::new())
    }

    /// Claim `Option<T>` as `[bool present][T]?`.
    pub fn claim_option<T: 'static>(&mut self) -> &mut Self {
        self.claim::<Option<T>, _>(OptionCodec::<T>::new())
    }

    pub(crate) fn into_entries(self) -> Vec<ClaimEntry> {
        self.entries
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Variable-length collection of registry-encoded elements.
pub struct ListCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> ListCodec<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for ListCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Codec<Vec<T>> for ListCodec<T> {
    fn write(
        &self,
        value: &Vec<T>,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        registry.write_list(value, params).map(Some)
    }

    fn read(
        &self,
        container: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Vec<T>>> {
        registry.read_list::<T>(container).map(Some)
    }
}

/// Optional value behind a one-byte presence flag.
pub struct OptionCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> OptionCodec<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for OptionCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Codec<Option<T>> for OptionCodec<T> {
    fn write(
        &self,
        value: &Option<T>,
        params: &WriteParams,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Bytable>> {
        let bytes = match value {
            Some(inner) => Bytable::primitive(true) + registry.write(inner, params)?,
            None => Bytable::primitive(false),
        };
        Ok(Some(bytes))
    }

    fn read(
        &self,
        container: &mut ByteContainer<'_>,
        registry: &SerializerRegistry,
    ) -> CodecResult<Option<Option<T>>> {
        if container.read_bool()? {
            Ok(Some(Some(registry.read::<T>(container)?)))
        } else {
            Ok(Some(None))
        }
    }
}

/// Caller-supplied encode options.
///
/// Carries the target protocol version plus any number of typed parameters,
/// one per type (`with` replaces an existing value of the same type).
///
/// Also tracks the nesting depth of the encode in progress, so one value is
/// used by one encode at a time.
pub struct WriteParams {
    version: ProtocolVersion,
    extras: Vec<(TypeId, Box<dyn Any + Send + Sync>)>,
    depth: Cell<u32>,
}

impl WriteParams {
    pub fn new() -> Self {
        Self {
            version: ProtocolVersion::CURRENT,
            extras: Vec::new(),
            depth: Cell::new(0),
        }
    }

    pub fn for_version(version: ProtocolVersion) -> Self {
        Self::new().with_version(version)
    }

    pub fn with_version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Attach a typed parameter.
    pub fn with<P: Any + Send + Sync>(mut self, param: P) -> Self {
        self.insert(param);
        self
    }

    pub fn insert<P: Any + Send + Sync>(&mut self, param: P) {
        let id = TypeId::of::<P>();
        let boxed: Box<dyn Any + Send + Sync> = Box::new(param);
        match self.extras.iter_mut().find(|(key, _)| *key == id) {
            Some(slot) => slot.1 = boxed,
            None => self.extras.push((id, boxed)),
        }
    }

    pub fn get<P: Any + Send + Sync>(&self) -> Option<&P> {
        let id = TypeId::of::<P>();
        self.extras
            .iter()
            .find(|(key, _)| *key == id)
            .and_then(|(_, value)| value.downcast_ref::<P>())
    }

    pub fn contains<P: Any + Send + Sync>(&self) -> bool {
        self.get::<P>().is_some()
    }

    /// Mirrors `ByteContainer::enter`: a value the reader would find too deep
    /// is refused here instead.
    pub(crate) fn enter<T: ?Sized>(&self, max_depth: u32) -> CodecResult<()> {
        let depth = self.depth.get();
        if depth >= max_depth {
            return Err(CodecError::limit_exceeded::<T>(
                "nesting depth",
                depth as usize + 1,
                max_depth as usize,
            ));
        }
        self.depth.set(depth + 1);
        Ok(())
    }

    pub(crate) fn leave(&self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

impl Default for WriteParams {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WriteParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteParams")
            .field("version", &self.version)
            .field("extras", &self.extras.len())
            .field("depth", &self.depth.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Precision(u8);

    #[derive(Debug, PartialEq)]
    struct OmitNames;

    #[test]
    fn test_write_params_typed_lookup() {
        let params = WriteParams::new().with(Precision(3)).with(OmitNames);
        assert_eq!(params.get::<Precision>(), Some(&Precision(3)));
        assert!(params.contains::<OmitNames>());
        assert!(!params.contains::<u32>());
    }

    #[test]
    fn test_write_params_replace_same_type() {
        let params = WriteParams::new().with(Precision(3)).with(Precision(5));
        assert_eq!(params.get::<Precision>(), Some(&Precision(5)));
        assert_eq!(params.extras.len(), 1);
    }

    #[test]
    fn test_write_params_version() {
        let v = ProtocolVersion::new(2, 6, 0);
        assert_eq!(WriteParams::for_version(v).version(), v);
        assert_eq!(WriteParams::default().version(), ProtocolVersion::CURRENT);
    }

    #[test]
    fn test_write_params_depth_tracking() {
        let params = WriteParams::new();
        params.enter::<u8>(2).expect("depth 1");
        params.enter::<u8>(2).expect("depth 2");
        let err = params.enter::<u8>(2).unwrap_err();
        assert!(matches!(
            err,
            CodecError::LimitExceeded {
                value: 3,
                max: 2,
                ..
            }
        ));
        params.leave();
        params.enter::<u8>(2).expect("depth 2 again");
        params.leave();
        params.leave();
        params.leave();
        assert_eq!(params.depth.get(), 0);
    }

    #[test]
    fn test_claims_collects_entries() {
        let mut claims = Claims::new("test");
        claims.claim_list::<u32>().claim_option::<u32>();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims.module(), "test");

        let entries = claims.into_entries();
        assert_eq!(entries[0].type_id, TypeId::of::<Vec<u32>>());
        assert_eq!(entries[1].type_id, TypeId::of::<Option<u32>>());
        assert!(entries[0].codec.fixed_width().is_none());
    }
}
