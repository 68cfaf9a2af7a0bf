// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # xrwire - binary wire codec for collaborative XR environments
//!
//! Converts strongly-typed DTOs (requests, poses, avatars, interactions) into
//! compact little-endian byte streams and back, through a registry of
//! pluggable serialization modules.
//!
//! ## Quick Start
//!
//! ```rust
//! use xrwire::dto::Request;
//! use xrwire::{CodecResult, SerializerRegistry};
//!
//! fn main() -> CodecResult<()> {
//!     let registry = SerializerRegistry::standard();
//!
//!     let request = Request::TriggerEmote { emote_id: 42, trigger: true };
//!     let bytes = registry.encode(&request)?;
//!     assert_eq!(bytes.len(), 13);
//!
//!     let back: Request = registry.decode(&bytes)?;
//!     assert_eq!(back, request);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |              Routing layer: encode(value) / decode(bytes)      |
//! +---------------------------------------------------------------+
//! |  SerializerRegistry   TypeId -> [Codec] in module priority     |
//! |                       order, depth/size limits, framing        |
//! +---------------------------------------------------------------+
//! |  Modules  primitives | math | avatar | pose | request | ...    |
//! +---------------------------------------------------------------+
//! |  ser      ByteContainer (read cursor) | Bytable (deferred write)|
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SerializerRegistry`] | Ordered modules; `encode`/`decode` entry points |
//! | [`SharedRegistry`] | Atomically replaceable registry handle |
//! | [`SerializationModule`] | Pluggable unit claiming a family of types |
//! | [`Codec`] | Encode/decode capability for one type |
//! | [`ByteContainer`] | Bounds-checked read cursor |
//! | [`Bytable`] | Size-known, composable pending write |
//! | [`CodecError`] | `OutOfBounds`, `UnsupportedType`, `MalformedPayload`, ... |

pub mod config;
pub mod dto;
pub mod error;
pub mod module;
pub mod primitives;
pub mod registry;
pub mod ser;

pub use config::{CodecConfig, ProtocolVersion};
pub use error::{CodecError, CodecResult, ErrorKind};
pub use module::{Claims, Codec, ListCodec, OptionCodec, SerializationModule, TaggedFamily, WriteParams};
pub use primitives::PrimitiveModule;
pub use registry::{RegistryBuilder, SerializerRegistry, SharedRegistry};
pub use ser::{ByteContainer, Bytable, Primitive};
