//! Minimal chunk reader used by the integration tests to inspect containers

#![allow(dead_code)]

use bbvh_core::{ChannelKind, QuantizationMode};

pub const SCENARIO_BVH: &str = "HIERARCHY
ROOT Hips
{
\tOFFSET 0.0 0.0 0.0
\tCHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation
\tEnd Site
\t{
\t\tOFFSET 0.0 1.0 0.0
\t}
}
MOTION
Frames: 2
Frame Time: 0.0333
1.0 2.0 3.0 10.0 20.0 30.0
-1.5 0.25 12.0 -90.0 45.5 180.0
";

pub fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

pub fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}

pub fn f32_at(bytes: &[u8], at: usize) -> f32 {
    f32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}

#[derive(Debug)]
pub struct HierarchyView {
    pub end: usize,
    pub joint_count: u8,
    pub channel_count: u8,
    pub joints: Vec<Vec<ChannelKind>>,
}

/// Read the hierarchy chunk that follows the 64-byte header
pub fn read_hierarchy(bytes: &[u8]) -> HierarchyView {
    assert_eq!(&bytes[64..68], b"CRAH");
    let start = 68;
    let end = u16_at(bytes, start) as usize;
    let joint_count = bytes[start + 5];
    let channel_count = bytes[start + 6];

    let mut joints = Vec::new();
    let mut pos = start + 11;
    let mut seen_channels = 0usize;
    while seen_channels < channel_count as usize {
        let index = bytes[pos] as usize;
        assert_eq!(index, joints.len());
        let count = bytes[pos + 1] as usize;
        let kinds = bytes[pos + 2..pos + 2 + count]
            .iter()
            .map(|&code| ChannelKind::from_code(code))
            .collect();
        joints.push(kinds);
        pos += 2 + count;
        seen_channels += count;
    }

    HierarchyView {
        end,
        joint_count,
        channel_count,
        joints,
    }
}

#[derive(Debug)]
pub struct MotionView {
    pub end: usize,
    pub frame_count: u32,
    pub frame_time: f32,
    /// (prefix bytes, dequantized samples) per frame
    pub frames: Vec<(Vec<u8>, Vec<f64>)>,
}

/// Read the motion chunk at `pointer` for a schema of `channels` channels
pub fn read_motion(
    bytes: &[u8],
    pointer: usize,
    channels: usize,
    mode: QuantizationMode,
) -> MotionView {
    assert_eq!(&bytes[pointer..pointer + 4], b"NTOM");
    let end = u32_at(bytes, pointer + 4) as usize;
    let frame_count = u32_at(bytes, pointer + 8);
    let frame_time = f32_at(bytes, pointer + 12);

    let mut frames = Vec::new();
    let mut pos = pointer + 16;
    for _ in 0..frame_count {
        let prefix = bytes[pos..pos + mode.prefix_width()].to_vec();
        pos += mode.prefix_width();
        let mut samples = Vec::with_capacity(channels);
        for _ in 0..channels {
            let value = match mode {
                QuantizationMode::Int16 => i16::from_le_bytes([bytes[pos], bytes[pos + 1]]) as f64 / 100.0,
                QuantizationMode::Float32 => f32_at(bytes, pos) as f64,
                QuantizationMode::Int8 => bytes[pos] as i8 as f64 / 10.0,
            };
            samples.push(value);
            pos += mode.sample_width();
        }
        frames.push((prefix, samples));
    }

    MotionView {
        end,
        frame_count,
        frame_time,
        frames,
    }
}
