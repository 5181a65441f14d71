// SPDX-License-Identifier: GPL-3.0-only

//! Mode resolution and pixel decoding core for depth cameras
//!
//! A depth camera exposes several independently configurable capture units
//! ("subdevices"), each offering a fixed menu of raw modes (resolution, raw
//! encoding, framerate). One raw mode yields one or more client-visible
//! streams (depth, color, infrared, second infrared) whose resolution and
//! pixel format may differ from the raw hardware encoding. This crate
//! answers the two questions at the center of that abstraction:
//!
//! - which concrete hardware mode, if any, satisfies a set of per-stream
//!   client requests while obeying the model's cross-stream rules
//!   ([`StaticCameraInfo::select_mode`]), and
//! - how to decode a raw frame buffer into each destination stream's
//!   client-visible format and extract its embedded hardware frame counter
//!   ([`SubdeviceMode::unpack`], [`SubdeviceMode::frame_number`]).
//!
//! # Architecture
//!
//! - [`formats`]: enumeration registry for streams, pixel formats, presets,
//!   distortion models, and device options
//! - [`math`]: 3-vectors, column-major 3x3 matrices, and rigid poses for
//!   stream extrinsics
//! - [`modes`]: the descriptor model, interstream rules, and mode selection
//! - [`calibration`]: per-device intrinsics, extrinsics, and depth scale
//! - [`unpack`]: raw-to-client pixel decoders and frame-counter extraction
//! - [`errors`]: catalog-registration error taxonomy
//!
//! Everything here is synchronous and allocation-free on the per-frame
//! paths. Descriptors and calibration are read-only after registration and
//! may be shared across threads without locking; the transport and any
//! capture coordination live in the owning device layer, not here.

pub mod calibration;
pub mod errors;
pub mod formats;
pub mod math;
pub mod modes;
pub mod unpack;

// Re-export the types that make up the public surface
pub use calibration::{CalibrationInfo, Intrinsics};
pub use errors::{CatalogError, CatalogResult};
pub use formats::{
    CameraOption, Distortion, Format, Preset, RawFormat, Stream, get_image_size,
};
pub use math::{Mat3, Pose, Vec3};
pub use modes::{
    InterstreamRule, RuleField, StaticCameraInfo, StreamMode, StreamRequest, SubdeviceMode,
};
pub use unpack::{FrameCounter, Unpacker};
