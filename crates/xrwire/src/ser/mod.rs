// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte-level building blocks: read cursor, deferred writes, scalar layout.
//!
//! All multi-byte scalars are little-endian. Variable-length fields carry a
//! `u32` length prefix; fixed-width fields carry none.

pub mod bytable;
pub mod container;
pub mod primitive;

pub use bytable::Bytable;
pub use container::ByteContainer;
pub use primitive::Primitive;
