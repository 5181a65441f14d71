// SPDX-License-Identifier: GPL-3.0-only

//! Descriptor model and mode selection
//!
//! A camera model is described declaratively: which subdevice serves each
//! logical stream, which hardware modes each subdevice offers, which
//! client-visible streams each mode produces, and which cross-stream rules
//! a request set must obey. `select_mode` resolves a client request set
//! against that catalog; it either names one concrete hardware mode or
//! reports that the request set is unserviceable.
//!
//! The catalog is built once at device-model registration and read-only
//! afterwards; it may be shared across threads without locking.

use crate::errors::{CatalogError, CatalogResult};
use crate::formats::{CameraOption, Format, Preset, RawFormat, Stream};
use crate::unpack::{FrameCounter, Unpacker};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One client-stated desire for a logical stream
///
/// Zero-valued numeric fields and `Format::Any` mean "don't care".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamRequest {
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub fps: u32,
}

impl StreamRequest {
    /// Value of the numeric field an interstream rule constrains.
    pub fn field(&self, field: RuleField) -> u32 {
        match field {
            RuleField::Width => self.width,
            RuleField::Height => self.height,
            RuleField::Fps => self.fps,
        }
    }
}

/// What a hardware mode exposes to the client for one logical stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamMode {
    pub stream: Stream,
    /// Resolution visible to the client
    pub width: u32,
    pub height: u32,
    /// Pixel format visible to the client
    pub format: Format,
    /// Framerate visible to the client
    pub fps: u32,
    /// Index into the device calibration intrinsics table
    pub intrinsics_index: usize,
}

impl StreamMode {
    /// Whether this exposed mode satisfies `request` field for field,
    /// honoring the request's don't-care sentinels.
    fn satisfies(&self, request: &StreamRequest) -> bool {
        (request.width == 0 || request.width == self.width)
            && (request.height == 0 || request.height == self.height)
            && (request.format == Format::Any || request.format == self.format)
            && (request.fps == 0 || request.fps == self.fps)
    }
}

/// One configurable state of one hardware capture unit
#[derive(Debug, Clone, PartialEq)]
pub struct SubdeviceMode {
    pub subdevice: usize,
    /// Resolution advertised over the transport
    pub width: u32,
    pub height: u32,
    /// Raw encoding advertised over the transport
    pub format: RawFormat,
    /// Framerate advertised over the transport
    pub fps: u32,
    /// Client-visible streams this mode produces from one raw buffer.
    /// Non-empty, one entry per distinct stream.
    pub streams: Vec<StreamMode>,
    pub unpacker: Unpacker,
    pub frame_counter: FrameCounter,
}

impl SubdeviceMode {
    /// Raw frame length in bytes as delivered by the transport.
    pub fn raw_frame_size(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    /// Decode one raw frame into one destination buffer per exposed stream.
    ///
    /// See [`Unpacker::unpack`] for the buffer contracts.
    pub fn unpack(&self, dests: &mut [&mut [u8]], raw: &[u8]) {
        self.unpacker.unpack(dests, self, raw);
    }

    /// Extract the hardware frame counter embedded in a raw frame.
    pub fn frame_number(&self, raw: &[u8]) -> u32 {
        self.frame_counter.decode(self, raw)
    }
}

/// Numeric request field an interstream rule constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleField {
    Width,
    Height,
    Fps,
}

/// Cross-stream consistency constraint:
/// `request[a].field + delta == request[b].field` whenever both streams are
/// enabled requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterstreamRule {
    pub a: Stream,
    pub b: Stream,
    pub field: RuleField,
    pub delta: i32,
}

impl InterstreamRule {
    /// Vacuously satisfied when either side is disabled.
    pub fn is_satisfied(&self, requests: &[StreamRequest; Stream::COUNT]) -> bool {
        let ra = &requests[self.a as usize];
        let rb = &requests[self.b as usize];
        if !ra.enabled || !rb.enabled {
            return true;
        }
        i64::from(ra.field(self.field)) + i64::from(self.delta) == i64::from(rb.field(self.field))
    }
}

/// Static description of everything one camera model can do
///
/// Built once at device-model registration; `validate` must pass before the
/// catalog is used.
#[derive(Debug, Clone)]
pub struct StaticCameraInfo {
    /// Model name shown to clients
    pub name: String,
    /// Subdevice serving each logical stream; `None` = stream unavailable
    pub stream_subdevices: [Option<usize>; Stream::COUNT],
    /// Every mode each subdevice can be put into, in preference order
    pub subdevice_modes: Vec<SubdeviceMode>,
    /// Rules constraining which request sets are serviceable
    pub interstream_rules: Vec<InterstreamRule>,
    /// Built-in request per (stream, preset)
    pub presets: [[StreamRequest; Preset::COUNT]; Stream::COUNT],
    /// Which device options this model honors
    pub option_supported: [bool; CameraOption::COUNT],
}

impl StaticCameraInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stream_subdevices: [None; Stream::COUNT],
            subdevice_modes: Vec::new(),
            interstream_rules: Vec::new(),
            presets: [[StreamRequest::default(); Preset::COUNT]; Stream::COUNT],
            option_supported: [false; CameraOption::COUNT],
        }
    }

    /// Built-in request for one (stream, preset) pair.
    pub fn preset(&self, stream: Stream, preset: Preset) -> StreamRequest {
        self.presets[stream as usize][preset as usize]
    }

    /// Whether this model honors a device option.
    pub fn supports_option(&self, option: CameraOption) -> bool {
        self.option_supported[option as usize]
    }

    /// Check the catalog invariants.
    ///
    /// A failure is a defect in the camera-model table; registration must
    /// not proceed past it.
    pub fn validate(&self) -> CatalogResult<()> {
        for (mode_index, mode) in self.subdevice_modes.iter().enumerate() {
            if mode.streams.is_empty() {
                return Err(CatalogError::EmptyStreamList { mode_index });
            }
            for (i, stream_mode) in mode.streams.iter().enumerate() {
                if mode.streams[..i]
                    .iter()
                    .any(|other| other.stream == stream_mode.stream)
                {
                    return Err(CatalogError::DuplicateStream {
                        mode_index,
                        stream: stream_mode.stream,
                    });
                }
            }
            if !mode.unpacker.supports(mode) {
                return Err(CatalogError::UnsupportedStreamLayout { mode_index });
            }
        }
        for stream in Stream::ALL {
            if let Some(subdevice) = self.stream_subdevices[stream as usize] {
                if !self
                    .subdevice_modes
                    .iter()
                    .any(|mode| mode.subdevice == subdevice)
                {
                    return Err(CatalogError::StreamSubdeviceUnknown { stream, subdevice });
                }
            }
        }
        for rule in &self.interstream_rules {
            for stream in [rule.a, rule.b] {
                if self.stream_subdevices[stream as usize].is_none() {
                    return Err(CatalogError::RuleStreamUnavailable { stream });
                }
            }
        }
        Ok(())
    }

    /// Resolve a request set to a hardware mode for one subdevice.
    ///
    /// Only requests whose stream is assigned to `subdevice_index` take part.
    /// The catalog is scanned in declaration order and the first entry whose
    /// exposed streams satisfy every participating request field for field
    /// (honoring the don't-care sentinels) wins, so a model author orders
    /// modes by preference. Returns `None` when the interstream rules reject
    /// the request set or no catalog entry satisfies it; the caller must
    /// adjust its requests and retry. No relaxation is attempted.
    pub fn select_mode(
        &self,
        requests: &[StreamRequest; Stream::COUNT],
        subdevice_index: usize,
    ) -> Option<&SubdeviceMode> {
        let relevant = |stream: Stream| {
            requests[stream as usize].enabled
                && self.stream_subdevices[stream as usize] == Some(subdevice_index)
        };

        // Rule satisfaction is a property of the request set alone, not of
        // any candidate, so check it once before scanning the catalog.
        for rule in &self.interstream_rules {
            if relevant(rule.a) && relevant(rule.b) && !rule.is_satisfied(requests) {
                debug!(
                    a = %rule.a,
                    b = %rule.b,
                    delta = rule.delta,
                    "request set violates an interstream rule"
                );
                return None;
            }
        }

        'candidates: for mode in self
            .subdevice_modes
            .iter()
            .filter(|mode| mode.subdevice == subdevice_index)
        {
            for stream in Stream::ALL.into_iter().filter(|&s| relevant(s)) {
                let request = &requests[stream as usize];
                let exposed = mode.streams.iter().find(|sm| sm.stream == stream);
                match exposed {
                    Some(stream_mode) if stream_mode.satisfies(request) => {}
                    _ => {
                        trace!(
                            stream = %stream,
                            width = mode.width,
                            height = mode.height,
                            raw = %mode.format,
                            fps = mode.fps,
                            "candidate rejected"
                        );
                        continue 'candidates;
                    }
                }
            }
            debug!(
                subdevice = subdevice_index,
                width = mode.width,
                height = mode.height,
                raw = %mode.format,
                fps = mode.fps,
                "selected subdevice mode"
            );
            return Some(mode);
        }

        debug!(
            subdevice = subdevice_index,
            "no subdevice mode satisfies the request set"
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requests_with(pairs: &[(Stream, StreamRequest)]) -> [StreamRequest; Stream::COUNT] {
        let mut requests = [StreamRequest::default(); Stream::COUNT];
        for (stream, request) in pairs {
            requests[*stream as usize] = *request;
        }
        requests
    }

    fn fps_rule() -> InterstreamRule {
        InterstreamRule {
            a: Stream::Depth,
            b: Stream::Infrared,
            field: RuleField::Fps,
            delta: 0,
        }
    }

    #[test]
    fn test_rule_vacuous_when_either_side_disabled() {
        let rule = fps_rule();
        let enabled = StreamRequest {
            enabled: true,
            fps: 30,
            ..Default::default()
        };
        let disabled = StreamRequest {
            enabled: false,
            fps: 90,
            ..Default::default()
        };

        assert!(rule.is_satisfied(&requests_with(&[(Stream::Depth, enabled)])));
        assert!(rule.is_satisfied(&requests_with(&[
            (Stream::Depth, enabled),
            (Stream::Infrared, disabled),
        ])));
        assert!(rule.is_satisfied(&requests_with(&[
            (Stream::Depth, disabled),
            (Stream::Infrared, enabled),
        ])));
    }

    #[test]
    fn test_rule_compares_selected_field_with_delta() {
        let rule = InterstreamRule {
            a: Stream::Depth,
            b: Stream::Color,
            field: RuleField::Width,
            delta: 12,
        };
        let depth = StreamRequest {
            enabled: true,
            width: 628,
            ..Default::default()
        };
        let color_ok = StreamRequest {
            enabled: true,
            width: 640,
            ..Default::default()
        };
        let color_bad = StreamRequest {
            enabled: true,
            width: 628,
            ..Default::default()
        };

        assert!(rule.is_satisfied(&requests_with(&[
            (Stream::Depth, depth),
            (Stream::Color, color_ok),
        ])));
        assert!(!rule.is_satisfied(&requests_with(&[
            (Stream::Depth, depth),
            (Stream::Color, color_bad),
        ])));
    }

    #[test]
    fn test_validate_rejects_empty_stream_list() {
        let mut info = StaticCameraInfo::new("test model");
        info.subdevice_modes.push(SubdeviceMode {
            subdevice: 0,
            width: 640,
            height: 480,
            format: RawFormat::Y8,
            fps: 30,
            streams: Vec::new(),
            unpacker: Unpacker::Strided,
            frame_counter: FrameCounter::Trailer,
        });
        assert_eq!(
            info.validate(),
            Err(CatalogError::EmptyStreamList { mode_index: 0 })
        );
    }

    #[test]
    fn test_validate_rejects_unknown_subdevice_assignment() {
        let mut info = StaticCameraInfo::new("test model");
        info.stream_subdevices[Stream::Depth as usize] = Some(2);
        assert_eq!(
            info.validate(),
            Err(CatalogError::StreamSubdeviceUnknown {
                stream: Stream::Depth,
                subdevice: 2
            })
        );
    }

    #[test]
    fn test_validate_rejects_rule_over_unserved_stream() {
        let mut info = StaticCameraInfo::new("test model");
        info.interstream_rules.push(fps_rule());
        assert_eq!(
            info.validate(),
            Err(CatalogError::RuleStreamUnavailable {
                stream: Stream::Depth
            })
        );
    }
}
