//! Core types shared by the extractor and the chunk writers

use crate::constants::{MAX_JOINT_CHANNELS, UNKNOWN_CHANNEL_CODE};
use crate::error::EncodeError;
use serde::{Deserialize, Serialize};

/// Kind of a single animation channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// `Xposition`
    PosX,
    /// `Yposition`
    PosY,
    /// `Zposition`
    PosZ,
    /// `Xrotation`
    RotX,
    /// `Yrotation`
    RotY,
    /// `Zrotation`
    RotZ,
    /// Any token not listed above
    Unknown,
}

impl ChannelKind {
    /// Map a channel token from a `CHANNELS` line to its kind
    pub fn from_token(token: &str) -> Self {
        match token {
            "Xposition" => ChannelKind::PosX,
            "Yposition" => ChannelKind::PosY,
            "Zposition" => ChannelKind::PosZ,
            "Xrotation" => ChannelKind::RotX,
            "Yrotation" => ChannelKind::RotY,
            "Zrotation" => ChannelKind::RotZ,
            _ => ChannelKind::Unknown,
        }
    }

    /// Byte code stored in the hierarchy chunk
    pub const fn code(&self) -> u8 {
        match self {
            ChannelKind::RotZ => 1,
            ChannelKind::RotY => 2,
            ChannelKind::RotX => 3,
            ChannelKind::PosX => 4,
            ChannelKind::PosY => 5,
            ChannelKind::PosZ => 6,
            ChannelKind::Unknown => UNKNOWN_CHANNEL_CODE,
        }
    }

    /// Inverse of [`ChannelKind::code`]; any unassigned byte reads as `Unknown`
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => ChannelKind::RotZ,
            2 => ChannelKind::RotY,
            3 => ChannelKind::RotX,
            4 => ChannelKind::PosX,
            5 => ChannelKind::PosY,
            6 => ChannelKind::PosZ,
            _ => ChannelKind::Unknown,
        }
    }
}

/// Channel declaration of one joint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointChannels {
    /// Declared channel count
    pub count: usize,

    /// Channel kinds in declaration order
    pub kinds: Vec<ChannelKind>,
}

impl JointChannels {
    /// Build a joint declaration from its count and raw tokens
    ///
    /// Extra tokens are dropped and missing ones are filled with
    /// [`ChannelKind::Unknown`], so `kinds.len() == count` for every count up
    /// to [`MAX_JOINT_CHANNELS`]. Larger declarations keep only that many
    /// kinds and are rejected by the hierarchy writer.
    pub fn from_tokens<'a, I>(count: usize, tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let width = count.min(MAX_JOINT_CHANNELS);
        let mut kinds: Vec<ChannelKind> = tokens
            .into_iter()
            .take(width)
            .map(ChannelKind::from_token)
            .collect();
        kinds.resize(width, ChannelKind::Unknown);
        Self { count, kinds }
    }

    /// Number of samples this joint contributes to every frame
    pub fn width(&self) -> usize {
        self.kinds.len()
    }

    /// Whether the declared count does not fit the hierarchy's count field
    pub fn is_over_limit(&self) -> bool {
        self.count > MAX_JOINT_CHANNELS
    }
}

/// Structured form of a BVH document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Number of `ROOT`/`JOINT` declarations
    pub joint_count: usize,

    /// One entry per `CHANNELS` block, in declaration order
    pub channel_schema: Vec<JointChannels>,

    /// Sum of all declared per-joint channel counts
    pub total_channel_count: usize,

    /// Value of the `Frames:` line
    pub frame_count: u32,

    /// Value of the `Frame Time:` line, in seconds
    pub frame_time: f64,

    /// Motion samples in order of appearance
    pub samples: Vec<f64>,
}

impl ParsedDocument {
    /// Create a document from a channel schema, deriving the total channel count
    pub fn new(
        joint_count: usize,
        channel_schema: Vec<JointChannels>,
        frame_count: u32,
        frame_time: f64,
        samples: Vec<f64>,
    ) -> Self {
        let total_channel_count = channel_schema
            .iter()
            .fold(0usize, |total, joint| total.saturating_add(joint.count));
        Self {
            joint_count,
            channel_schema,
            total_channel_count,
            frame_count,
            frame_time,
            samples,
        }
    }

    /// Samples per frame, taken from the channel kinds actually present
    pub fn channel_stride(&self) -> usize {
        self.channel_schema.iter().map(JointChannels::width).sum()
    }

    /// Number of samples the motion chunk consumes
    pub fn required_samples(&self) -> usize {
        (self.frame_count as usize).saturating_mul(self.channel_stride())
    }

    /// Check that the sample sequence covers every frame
    pub fn validate_samples(&self) -> Result<(), EncodeError> {
        let expected = self.required_samples();
        if self.samples.len() < expected {
            return Err(EncodeError::SampleCountMismatch {
                expected,
                actual: self.samples.len(),
            });
        }
        Ok(())
    }
}

/// Numeric encoding of motion samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantizationMode {
    /// Scaled by 100, truncated to i16, wrapping on overflow
    Int16,
    /// Stored as f32
    Float32,
    /// Scaled by 10, truncated and clamped to i8
    Int8,
}

impl QuantizationMode {
    /// Mode number used on the command line and in the conversion API
    pub const fn as_u8(&self) -> u8 {
        match self {
            QuantizationMode::Int16 => 1,
            QuantizationMode::Float32 => 2,
            QuantizationMode::Int8 => 3,
        }
    }

    /// Encoded width of one sample in bytes
    pub const fn sample_width(&self) -> usize {
        match self {
            QuantizationMode::Int16 => 2,
            QuantizationMode::Float32 => 4,
            QuantizationMode::Int8 => 1,
        }
    }

    /// Width of the per-frame length prefix in bytes
    pub const fn prefix_width(&self) -> usize {
        match self {
            QuantizationMode::Int16 | QuantizationMode::Int8 => 2,
            QuantizationMode::Float32 => 4,
        }
    }
}

impl TryFrom<u8> for QuantizationMode {
    type Error = EncodeError;

    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        match mode {
            1 => Ok(QuantizationMode::Int16),
            2 => Ok(QuantizationMode::Float32),
            3 => Ok(QuantizationMode::Int8),
            other => Err(EncodeError::UnsupportedMode(other)),
        }
    }
}
