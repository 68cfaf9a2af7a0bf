// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Application DTO families and their serialization modules.
//!
//! | Module | Priority | Families |
//! |--------|----------|----------|
//! | [`MathModule`] | 10 | `Vector3`, `Vector4`, `ColorRgba` |
//! | [`AvatarModule`] | 20 | `Bone`, `BoneBinding`, `AvatarMapping`, `UserTrackingFrame` |
//! | [`PoseModule`] | 30 | `PoseCondition`, `PoseClip`, `PoseAnimator` |
//! | [`RequestModule`] | 40 | `Request`, `InteractionRequest`, `ParameterValue` |
//! | [`InteractionModule`] | 50 | `InteractionDto`, `DofGroup` |
//!
//! Tag spaces do not overlap across families: `0x01xx` requests, `0x02xx`
//! pose conditions, `0x04xx` interactions.

pub mod avatar;
pub mod interaction;
pub mod math;
pub mod pose;
pub mod request;

pub use avatar::{
    AvatarMapping, AvatarModule, Bone, BoneBinding, CameraPose, OmitCamera, UserTrackingFrame,
    SYNC_SCALE_SINCE,
};
pub use interaction::{DofGroup, InteractionDto, InteractionModule};
pub use math::{ColorRgba, MathModule, Vector3, Vector4};
pub use pose::{ActivationMode, PoseAnimator, PoseClip, PoseCondition, PoseModule};
pub use request::{
    InteractionKind, InteractionRequest, ParameterSettingRequest, ParameterValue, Request,
    RequestModule, UserCameraProperties,
};
