// SPDX-License-Identifier: GPL-3.0-only

//! Per-device calibration data
//!
//! Populated once per physical device from factory data by the owning
//! device layer, then read-only for the device's lifetime. This module
//! only stores and indexes calibration; producing it is out of scope.

use crate::errors::{CatalogError, CatalogResult};
use crate::formats::{Distortion, Stream};
use crate::math::Pose;
use crate::modes::{StaticCameraInfo, StreamMode};

/// Optical calibration for one exposed stream mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    /// Resolution the parameters were calibrated at
    pub width: u32,
    pub height: u32,
    /// Principal point, in pixels
    pub ppx: f32,
    pub ppy: f32,
    /// Focal length, in pixels
    pub fx: f32,
    pub fy: f32,
    pub model: Distortion,
    pub coeffs: [f32; 5],
}

/// Computed calibration for one physical device
#[derive(Debug, Clone)]
pub struct CalibrationInfo {
    /// Intrinsics table indexed by [`StreamMode::intrinsics_index`]
    pub intrinsics: Vec<Intrinsics>,
    /// Rigid transform from each stream's frame to the reference frame
    pub stream_poses: [Pose; Stream::COUNT],
    /// Scale from device depth units to meters
    pub depth_scale: f32,
}

impl CalibrationInfo {
    /// Intrinsics for one exposed stream mode.
    pub fn intrinsics_for(&self, mode: &StreamMode) -> Option<&Intrinsics> {
        self.intrinsics.get(mode.intrinsics_index)
    }

    /// Pose of stream `from` expressed in the frame of stream `to`.
    pub fn extrinsics(&self, from: Stream, to: Stream) -> Pose {
        self.stream_poses[to as usize].inverse() * self.stream_poses[from as usize]
    }

    /// Check that every intrinsics index the catalog references resolves
    /// into this table. Run once when the device is populated.
    pub fn validate_against(&self, info: &StaticCameraInfo) -> CatalogResult<()> {
        for (mode_index, mode) in info.subdevice_modes.iter().enumerate() {
            for stream_mode in &mode.streams {
                if stream_mode.intrinsics_index >= self.intrinsics.len() {
                    return Err(CatalogError::IntrinsicsIndexOutOfRange {
                        mode_index,
                        stream: stream_mode.stream,
                        index: stream_mode.intrinsics_index,
                        table_len: self.intrinsics.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Mat3, Vec3};

    fn sample_calibration() -> CalibrationInfo {
        let mut poses = [Pose::IDENTITY; Stream::COUNT];
        // Color imager sits 25mm to the side of the depth reference
        poses[Stream::Color as usize] = Pose {
            orientation: Mat3::IDENTITY,
            position: Vec3::new(0.025, 0.0, 0.0),
        };
        CalibrationInfo {
            intrinsics: vec![Intrinsics {
                width: 640,
                height: 480,
                ppx: 320.0,
                ppy: 240.0,
                fx: 600.0,
                fy: 600.0,
                model: Distortion::None,
                coeffs: [0.0; 5],
            }],
            stream_poses: poses,
            depth_scale: 0.001,
        }
    }

    #[test]
    fn test_extrinsics_between_streams() {
        let calibration = sample_calibration();
        let depth_to_color = calibration.extrinsics(Stream::Depth, Stream::Color);
        let origin = depth_to_color.transform(Vec3::ZERO);
        assert!((origin.x + 0.025).abs() < 1e-6);
        assert!(origin.y.abs() < 1e-6 && origin.z.abs() < 1e-6);
    }

    #[test]
    fn test_extrinsics_to_self_is_identity() {
        let calibration = sample_calibration();
        let pose = calibration.extrinsics(Stream::Color, Stream::Color);
        assert_eq!(pose.orientation, Mat3::IDENTITY);
        assert!(pose.position.x.abs() < 1e-6);
    }
}
