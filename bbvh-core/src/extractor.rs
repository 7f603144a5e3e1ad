//! Best-effort extraction of a BVH text document
//!
//! The extractor never fails. Sections it cannot find leave the matching
//! [`ParsedDocument`] fields empty or zero.

use crate::types::{JointChannels, ParsedDocument};
use regex::Regex;
use std::sync::OnceLock;

#[cfg(feature = "logging")]
use tracing::debug;

/// Keyword that introduces the frame time line and the motion samples after it
const FRAME_TIME_KEY: &str = "Frame Time:";

struct Patterns {
    joint: Regex,
    channels: Regex,
    frames: Regex,
    frame_time: Regex,
    number: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        joint: compile(r"(?:JOINT|ROOT)\s+(\w+)"),
        channels: compile(r"CHANNELS\s+(\d+)\s+([^\n\r]+)"),
        frames: compile(r"Frames:\s*(\d+)"),
        frame_time: compile(r"Frame Time:\s*([\d.]+)"),
        number: compile(r"[-+]?\d*\.\d+(?:[eE][-+]?\d+)?|[-+]?\d+"),
    })
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern is valid")
}

/// Extract the joint/channel schema, frame metadata and motion samples from `text`
pub fn extract_document(text: &str) -> ParsedDocument {
    let patterns = patterns();

    let joint_count = patterns.joint.find_iter(text).count();
    let channel_schema = extract_channel_schema(patterns, text);

    let frame_count = patterns
        .frames
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .unwrap_or(0);

    let frame_time = patterns
        .frame_time
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .unwrap_or(0.0);

    let samples = extract_samples(patterns, motion_tail(text));

    let document = ParsedDocument::new(
        joint_count,
        channel_schema,
        frame_count,
        frame_time,
        samples,
    );

    #[cfg(feature = "logging")]
    debug!(
        "Extracted {} joints, {} channels, {} frames @ {}s, {} samples",
        document.joint_count,
        document.total_channel_count,
        document.frame_count,
        document.frame_time,
        document.samples.len()
    );

    document
}

fn extract_channel_schema(patterns: &Patterns, text: &str) -> Vec<JointChannels> {
    patterns
        .channels
        .captures_iter(text)
        .map(|caps| {
            // digits only, so the parse fails only on overflow
            let count = caps[1].parse::<usize>().unwrap_or(usize::MAX);
            let joint = JointChannels::from_tokens(count, caps[2].split_whitespace());

            #[cfg(feature = "logging")]
            if joint.is_over_limit() {
                debug!("CHANNELS block declares {} channels, over the limit", &caps[1]);
            }

            joint
        })
        .collect()
}

/// Text after the last frame time line, or nothing if there is no such line
fn motion_tail(text: &str) -> &str {
    let Some(key_pos) = text.rfind(FRAME_TIME_KEY) else {
        return "";
    };
    let after_key = &text[key_pos..];
    match after_key.find('\n') {
        Some(newline) => &after_key[newline + 1..],
        None => "",
    }
}

fn extract_samples(patterns: &Patterns, tail: &str) -> Vec<f64> {
    patterns
        .number
        .find_iter(tail)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}
