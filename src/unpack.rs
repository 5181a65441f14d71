// SPDX-License-Identifier: GPL-3.0-only

//! Pixel unpacking and frame-number decoding
//!
//! Every subdevice mode carries one [`Unpacker`] and one [`FrameCounter`]
//! tag. Both operate purely on caller-owned buffers: no allocation, no I/O,
//! no shared state, so the same mode may decode frames on any number of
//! threads concurrently.
//!
//! Buffer contracts (wrong destination count or length, short raw frame)
//! are caller bugs, checked with debug assertions rather than error paths.
//! Destinations for 16-bit formats must be 2-byte aligned.

use crate::formats::{Format, get_image_size};
use crate::modes::SubdeviceMode;

/// Raw-to-client pixel decoding strategy
///
/// A closed set, one tag per raw encoding family. The destination formats
/// are read from the mode's stream list, so a single tag covers e.g. both
/// the 8-bit and the 16-bit infrared widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unpacker {
    /// Raw layout already matches the destination; row-by-row copy honoring
    /// the padding between the raw stride and the tight destination stride
    Strided,
    /// Interleaved 12-bit stereo infrared sample pairs, one plane per imager
    StereoInterleaved12,
    /// Packed 4:2:2 luma/chroma to RGB/BGR/RGBA/BGRA (BT.601)
    Yuy2,
    /// Multiplexed 16-bit depth + 8-bit infrared per pixel
    DepthInfraredPacked,
}

impl Unpacker {
    /// Decode `raw` into one destination buffer per exposed stream.
    ///
    /// `dests` must hold `mode.streams.len()` buffers, each of the length
    /// `get_image_size` computes for its stream; `raw` must be one full
    /// frame for the mode.
    pub fn unpack(&self, dests: &mut [&mut [u8]], mode: &SubdeviceMode, raw: &[u8]) {
        debug_assert_eq!(dests.len(), mode.streams.len());
        debug_assert!(raw.len() >= mode.raw_frame_size());
        for (dest, stream) in dests.iter().zip(&mode.streams) {
            debug_assert_eq!(
                dest.len(),
                get_image_size(stream.width, stream.height, stream.format)
            );
        }

        match self {
            Unpacker::Strided => unpack_strided(dests, mode, raw),
            Unpacker::StereoInterleaved12 => unpack_stereo12(dests, mode, raw),
            Unpacker::Yuy2 => unpack_yuy2(dests, mode, raw),
            Unpacker::DepthInfraredPacked => unpack_depth_infrared(dests, mode, raw),
        }
    }

    /// Whether this strategy can produce the mode's exposed stream layout.
    ///
    /// Checked by catalog validation so the per-frame path never meets a
    /// layout it cannot serve.
    pub fn supports(&self, mode: &SubdeviceMode) -> bool {
        let streams = &mode.streams;
        match self {
            Unpacker::Strided => {
                streams.len() == 1
                    && streams[0].format.bytes_per_pixel() > 0
                    && streams[0].width as usize * streams[0].format.bytes_per_pixel()
                        <= mode.width as usize * mode.format.bytes_per_pixel()
                    && streams[0].height <= mode.height
            }
            Unpacker::StereoInterleaved12 => {
                streams.len() == 2
                    && streams
                        .iter()
                        .all(|s| matches!(s.format, Format::Y8 | Format::Y16))
            }
            Unpacker::Yuy2 => {
                streams.len() == 1
                    && matches!(
                        streams[0].format,
                        Format::Rgb8 | Format::Bgr8 | Format::Rgba8 | Format::Bgra8
                    )
            }
            Unpacker::DepthInfraredPacked => {
                streams.len() == 2
                    && streams[0].format == Format::Z16
                    && streams[1].format == Format::Y8
            }
        }
    }
}

/// Hardware frame-counter bit layout
///
/// The counter location differs per sensor family, which is why decoding is
/// a capability of the mode rather than a fixed byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCounter {
    /// Little-endian counter word in the final four bytes of the frame
    /// (stereo imager family)
    Trailer,
    /// One counter bit in the least-significant bit of each of the first
    /// 32 bytes, low bit first (4:2:2 color path)
    EmbeddedLsb,
    /// Little-endian counter word in the leading four bytes
    /// (coded-light imager family)
    Leading,
}

impl FrameCounter {
    /// Extract the counter from one raw frame.
    pub fn decode(&self, mode: &SubdeviceMode, raw: &[u8]) -> u32 {
        debug_assert!(raw.len() >= mode.raw_frame_size());

        match self {
            FrameCounter::Trailer => {
                let tail = &raw[raw.len() - 4..];
                u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]])
            }
            FrameCounter::EmbeddedLsb => {
                debug_assert!(raw.len() >= 32);
                raw[..32]
                    .iter()
                    .enumerate()
                    .fold(0u32, |number, (i, byte)| {
                        number | (u32::from(byte & 1) << i)
                    })
            }
            FrameCounter::Leading => u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
        }
    }
}

/// View a destination buffer as a little-endian 16-bit plane.
fn as_u16_plane(dest: &mut [u8]) -> &mut [u16] {
    bytemuck::cast_slice_mut(dest)
}

fn unpack_strided(dests: &mut [&mut [u8]], mode: &SubdeviceMode, raw: &[u8]) {
    let stream = &mode.streams[0];
    let row = stream.width as usize * stream.format.bytes_per_pixel();
    let src_stride = mode.width as usize * mode.format.bytes_per_pixel();
    for (dst_row, src_row) in dests[0]
        .chunks_exact_mut(row)
        .zip(raw.chunks_exact(src_stride))
    {
        dst_row.copy_from_slice(&src_row[..row]);
    }
}

/// Split one 3-byte interleaved sample pair into (left, right) 12-bit values.
///
/// Wire layout: byte 0 = right[7:0], byte 1 = left[3:0] << 4 | right[11:8],
/// byte 2 = left[11:4].
fn split_stereo12(px: &[u8]) -> (u16, u16) {
    let left = (u16::from(px[2]) << 4) | (u16::from(px[1]) >> 4);
    let right = (u16::from(px[1] & 0x0F) << 8) | u16::from(px[0]);
    (left, right)
}

fn unpack_stereo12(dests: &mut [&mut [u8]], mode: &SubdeviceMode, raw: &[u8]) {
    let pixels = mode.width as usize * mode.height as usize;
    let widen = mode.streams[0].format == Format::Y16;
    let [left_dest, right_dest] = dests else {
        debug_assert!(false, "stereo unpacker expects two destinations");
        return;
    };

    if widen {
        let left = as_u16_plane(left_dest);
        let right = as_u16_plane(right_dest);
        for (i, px) in raw.chunks_exact(3).enumerate().take(pixels) {
            let (l, r) = split_stereo12(px);
            left[i] = l << 4;
            right[i] = r << 4;
        }
    } else {
        for (i, px) in raw.chunks_exact(3).enumerate().take(pixels) {
            let (l, r) = split_stereo12(px);
            left_dest[i] = (l >> 4) as u8;
            right_dest[i] = (r >> 4) as u8;
        }
    }
}

fn unpack_yuy2(dests: &mut [&mut [u8]], mode: &SubdeviceMode, raw: &[u8]) {
    let stream = &mode.streams[0];
    let (swapped, alpha) = match stream.format {
        Format::Rgb8 => (false, false),
        Format::Bgr8 => (true, false),
        Format::Rgba8 => (false, true),
        Format::Bgra8 => (true, true),
        other => {
            debug_assert!(false, "yuy2 unpacker cannot produce {other}");
            return;
        }
    };
    let bpp = stream.format.bytes_per_pixel();

    // Each 4 raw bytes carry two luma samples sharing one chroma pair.
    for (src, dst) in raw.chunks_exact(4).zip(dests[0].chunks_exact_mut(bpp * 2)) {
        let u = f32::from(src[1]) - 128.0;
        let v = f32::from(src[3]) - 128.0;
        for (i, luma) in [src[0], src[2]].into_iter().enumerate() {
            let y = f32::from(luma);
            // BT.601
            let r = (y + 1.402 * v).clamp(0.0, 255.0) as u8;
            let g = (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8;
            let b = (y + 1.772 * u).clamp(0.0, 255.0) as u8;

            let px = &mut dst[i * bpp..(i + 1) * bpp];
            let (first, third) = if swapped { (b, r) } else { (r, b) };
            px[0] = first;
            px[1] = g;
            px[2] = third;
            if alpha {
                px[3] = 255;
            }
        }
    }
}

fn unpack_depth_infrared(dests: &mut [&mut [u8]], mode: &SubdeviceMode, raw: &[u8]) {
    let pixels = mode.width as usize * mode.height as usize;
    let [depth_dest, infrared_dest] = dests else {
        debug_assert!(false, "depth+infrared unpacker expects two destinations");
        return;
    };

    let depth = as_u16_plane(depth_dest);
    for (i, px) in raw.chunks_exact(3).enumerate().take(pixels) {
        depth[i] = u16::from_le_bytes([px[0], px[1]]);
        infrared_dest[i] = px[2];
    }
}
