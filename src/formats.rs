// SPDX-License-Identifier: GPL-3.0-only

//! Enumeration registry for streams, pixel formats, presets, distortion
//! models, and device options
//!
//! Identifiers cross the device boundary as raw integers, so every
//! enumeration here carries a validity check (`from_raw`) and a name table.
//! The `describe_*` helpers render unknown values as their decimal form
//! instead of failing; diagnostics stay usable on firmware surprises.

use serde::{Deserialize, Serialize};

/// Logical client-visible stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stream {
    /// Depth image in device depth units
    Depth,
    /// Color image from the RGB imager
    Color,
    /// Infrared image (left imager on stereo modules)
    Infrared,
    /// Second infrared image (right imager on stereo modules)
    Infrared2,
}

impl Stream {
    pub const COUNT: usize = 4;

    pub const ALL: [Stream; Stream::COUNT] = [
        Stream::Depth,
        Stream::Color,
        Stream::Infrared,
        Stream::Infrared2,
    ];

    /// Parse a raw identifier; `None` if out of range.
    pub fn from_raw(value: i32) -> Option<Stream> {
        Self::ALL.get(usize::try_from(value).ok()?).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Stream::Depth => "depth",
            Stream::Color => "color",
            Stream::Infrared => "infrared",
            Stream::Infrared2 => "infrared2",
        }
    }
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Client-visible pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Format {
    /// Wildcard: any format satisfies the request
    #[default]
    Any,
    /// 16-bit depth, little-endian, in device depth units
    Z16,
    /// Packed 4:2:2 luma/chroma, 2 bytes per pixel
    Yuyv,
    /// 24-bit RGB
    Rgb8,
    /// 24-bit BGR
    Bgr8,
    /// 32-bit RGBA, alpha always 255
    Rgba8,
    /// 32-bit BGRA, alpha always 255
    Bgra8,
    /// 8-bit grayscale
    Y8,
    /// 16-bit grayscale, little-endian
    Y16,
}

impl Format {
    pub const COUNT: usize = 9;

    pub const ALL: [Format; Format::COUNT] = [
        Format::Any,
        Format::Z16,
        Format::Yuyv,
        Format::Rgb8,
        Format::Bgr8,
        Format::Rgba8,
        Format::Bgra8,
        Format::Y8,
        Format::Y16,
    ];

    /// Parse a raw identifier; `None` if out of range.
    pub fn from_raw(value: i32) -> Option<Format> {
        Self::ALL.get(usize::try_from(value).ok()?).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Any => "any",
            Format::Z16 => "z16",
            Format::Yuyv => "yuyv",
            Format::Rgb8 => "rgb8",
            Format::Bgr8 => "bgr8",
            Format::Rgba8 => "rgba8",
            Format::Bgra8 => "bgra8",
            Format::Y8 => "y8",
            Format::Y16 => "y16",
        }
    }

    /// Bytes per pixel. `Any` is a wildcard and has no defined size.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Format::Any => 0,
            Format::Y8 => 1,
            Format::Z16 | Format::Yuyv | Format::Y16 => 2,
            Format::Rgb8 | Format::Bgr8 => 3,
            Format::Rgba8 | Format::Bgra8 => 4,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Built-in stream preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    BestQuality,
    LargestImage,
    HighestFramerate,
}

impl Preset {
    pub const COUNT: usize = 3;

    pub const ALL: [Preset; Preset::COUNT] = [
        Preset::BestQuality,
        Preset::LargestImage,
        Preset::HighestFramerate,
    ];

    /// Parse a raw identifier; `None` if out of range.
    pub fn from_raw(value: i32) -> Option<Preset> {
        Self::ALL.get(usize::try_from(value).ok()?).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::BestQuality => "best_quality",
            Preset::LargestImage => "largest_image",
            Preset::HighestFramerate => "highest_framerate",
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Lens distortion model attached to a set of intrinsics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distortion {
    /// Image is already rectified; coefficients are unused
    None,
    /// Brown-Conrady variant applied to the projected image
    ModifiedBrownConrady,
    /// Brown-Conrady variant applied when deprojecting to 3D
    InverseBrownConrady,
}

impl Distortion {
    pub const COUNT: usize = 3;

    pub const ALL: [Distortion; Distortion::COUNT] = [
        Distortion::None,
        Distortion::ModifiedBrownConrady,
        Distortion::InverseBrownConrady,
    ];

    /// Parse a raw identifier; `None` if out of range.
    pub fn from_raw(value: i32) -> Option<Distortion> {
        Self::ALL.get(usize::try_from(value).ok()?).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Distortion::None => "none",
            Distortion::ModifiedBrownConrady => "modified_brown_conrady",
            Distortion::InverseBrownConrady => "inverse_brown_conrady",
        }
    }
}

impl std::fmt::Display for Distortion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Device option identifier
///
/// Color-imager controls first, then depth-module controls. Which entries a
/// given camera model honors is recorded in its static description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraOption {
    ColorBacklightCompensation,
    ColorBrightness,
    ColorContrast,
    ColorExposure,
    ColorGain,
    ColorGamma,
    ColorHue,
    ColorSaturation,
    ColorSharpness,
    ColorWhiteBalance,
    LaserPower,
    Accuracy,
    MotionRange,
    FilterOption,
    ConfidenceThreshold,
    EmitterEnabled,
    LrGain,
    LrExposure,
    LrAutoExposureEnabled,
    DepthUnits,
    DepthClampMin,
    DepthClampMax,
}

impl CameraOption {
    pub const COUNT: usize = 22;

    pub const ALL: [CameraOption; CameraOption::COUNT] = [
        CameraOption::ColorBacklightCompensation,
        CameraOption::ColorBrightness,
        CameraOption::ColorContrast,
        CameraOption::ColorExposure,
        CameraOption::ColorGain,
        CameraOption::ColorGamma,
        CameraOption::ColorHue,
        CameraOption::ColorSaturation,
        CameraOption::ColorSharpness,
        CameraOption::ColorWhiteBalance,
        CameraOption::LaserPower,
        CameraOption::Accuracy,
        CameraOption::MotionRange,
        CameraOption::FilterOption,
        CameraOption::ConfidenceThreshold,
        CameraOption::EmitterEnabled,
        CameraOption::LrGain,
        CameraOption::LrExposure,
        CameraOption::LrAutoExposureEnabled,
        CameraOption::DepthUnits,
        CameraOption::DepthClampMin,
        CameraOption::DepthClampMax,
    ];

    /// Parse a raw identifier; `None` if out of range.
    pub fn from_raw(value: i32) -> Option<CameraOption> {
        Self::ALL.get(usize::try_from(value).ok()?).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            CameraOption::ColorBacklightCompensation => "color_backlight_compensation",
            CameraOption::ColorBrightness => "color_brightness",
            CameraOption::ColorContrast => "color_contrast",
            CameraOption::ColorExposure => "color_exposure",
            CameraOption::ColorGain => "color_gain",
            CameraOption::ColorGamma => "color_gamma",
            CameraOption::ColorHue => "color_hue",
            CameraOption::ColorSaturation => "color_saturation",
            CameraOption::ColorSharpness => "color_sharpness",
            CameraOption::ColorWhiteBalance => "color_white_balance",
            CameraOption::LaserPower => "laser_power",
            CameraOption::Accuracy => "accuracy",
            CameraOption::MotionRange => "motion_range",
            CameraOption::FilterOption => "filter_option",
            CameraOption::ConfidenceThreshold => "confidence_threshold",
            CameraOption::EmitterEnabled => "emitter_enabled",
            CameraOption::LrGain => "lr_gain",
            CameraOption::LrExposure => "lr_exposure",
            CameraOption::LrAutoExposureEnabled => "lr_auto_exposure_enabled",
            CameraOption::DepthUnits => "depth_units",
            CameraOption::DepthClampMin => "depth_clamp_min",
            CameraOption::DepthClampMax => "depth_clamp_max",
        }
    }
}

impl std::fmt::Display for CameraOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Raw sensor encoding advertised by a subdevice over the transport
///
/// Discriminants are the transport's wire indices, which is why the range
/// is sparse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RawFormat {
    /// Wildcard used while negotiating
    Any = 0,
    /// Packed 4:2:2 luma/chroma from the color imager
    Yuy2 = 3,
    /// Interleaved 12-bit stereo infrared sample pairs
    Y12i = 5,
    /// 8-bit infrared from the stereo module
    Y8 = 7,
    /// 16-bit depth from the stereo module
    Z16 = 8,
    /// 8-bit infrared from the coded-light module
    Invi = 14,
    /// 16-bit depth from the coded-light module
    Invr = 16,
    /// Multiplexed 16-bit depth + 8-bit infrared from the coded-light module
    Inri = 18,
}

impl RawFormat {
    pub const ALL: [RawFormat; 8] = [
        RawFormat::Any,
        RawFormat::Yuy2,
        RawFormat::Y12i,
        RawFormat::Y8,
        RawFormat::Z16,
        RawFormat::Invi,
        RawFormat::Invr,
        RawFormat::Inri,
    ];

    /// Parse a wire index; `None` if it names no known encoding.
    pub fn from_raw(value: i32) -> Option<RawFormat> {
        Self::ALL.into_iter().find(|format| *format as i32 == value)
    }

    pub fn name(self) -> &'static str {
        match self {
            RawFormat::Any => "any",
            RawFormat::Yuy2 => "yuy2",
            RawFormat::Y12i => "y12i",
            RawFormat::Y8 => "y8",
            RawFormat::Z16 => "z16",
            RawFormat::Invi => "invi",
            RawFormat::Invr => "invr",
            RawFormat::Inri => "inri",
        }
    }

    /// Bytes per raw pixel as delivered on the wire.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            RawFormat::Any => 0,
            RawFormat::Y8 | RawFormat::Invi => 1,
            RawFormat::Yuy2 | RawFormat::Z16 | RawFormat::Invr => 2,
            RawFormat::Y12i | RawFormat::Inri => 3,
        }
    }
}

impl std::fmt::Display for RawFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Render a raw stream identifier; unknown values render as the integer.
pub fn describe_stream(value: i32) -> String {
    match Stream::from_raw(value) {
        Some(stream) => stream.name().to_string(),
        None => value.to_string(),
    }
}

/// Render a raw pixel-format identifier; unknown values render as the integer.
pub fn describe_format(value: i32) -> String {
    match Format::from_raw(value) {
        Some(format) => format.name().to_string(),
        None => value.to_string(),
    }
}

/// Render a raw preset identifier; unknown values render as the integer.
pub fn describe_preset(value: i32) -> String {
    match Preset::from_raw(value) {
        Some(preset) => preset.name().to_string(),
        None => value.to_string(),
    }
}

/// Render a raw distortion identifier; unknown values render as the integer.
pub fn describe_distortion(value: i32) -> String {
    match Distortion::from_raw(value) {
        Some(model) => model.name().to_string(),
        None => value.to_string(),
    }
}

/// Render a raw option identifier; unknown values render as the integer.
pub fn describe_option(value: i32) -> String {
    match CameraOption::from_raw(value) {
        Some(option) => option.name().to_string(),
        None => value.to_string(),
    }
}

/// Render a raw encoding's wire index; unknown values render as the integer.
pub fn describe_raw_format(value: i32) -> String {
    match RawFormat::from_raw(value) {
        Some(format) => format.name().to_string(),
        None => value.to_string(),
    }
}

/// Tight byte length of one image with the given client-visible format.
pub fn get_image_size(width: u32, height: u32, format: Format) -> usize {
    width as usize * height as usize * format.bytes_per_pixel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_covers_declared_range() {
        for (index, stream) in Stream::ALL.iter().enumerate() {
            assert_eq!(Stream::from_raw(index as i32), Some(*stream));
        }
        assert_eq!(Stream::from_raw(Stream::COUNT as i32), None);
        assert_eq!(Stream::from_raw(-1), None);
    }

    #[test]
    fn test_raw_format_wire_indices() {
        assert_eq!(RawFormat::from_raw(3), Some(RawFormat::Yuy2));
        assert_eq!(RawFormat::from_raw(18), Some(RawFormat::Inri));
        // Holes in the wire range are invalid, not clamped
        assert_eq!(RawFormat::from_raw(4), None);
        assert_eq!(RawFormat::from_raw(17), None);
    }

    #[test]
    fn test_describe_falls_back_to_decimal() {
        assert_eq!(describe_stream(1), "color");
        assert_eq!(describe_stream(17), "17");
        assert_eq!(describe_format(-3), "-3");
        assert_eq!(describe_option(99), "99");
        assert_eq!(describe_raw_format(4), "4");
    }

    #[test]
    fn test_image_sizes() {
        assert_eq!(get_image_size(640, 480, Format::Y8), 640 * 480);
        assert_eq!(get_image_size(640, 480, Format::Z16), 640 * 480 * 2);
        assert_eq!(get_image_size(640, 480, Format::Rgb8), 640 * 480 * 3);
        assert_eq!(get_image_size(640, 480, Format::Bgra8), 640 * 480 * 4);
        // A wildcard has no defined size
        assert_eq!(get_image_size(640, 480, Format::Any), 0);
    }
}
