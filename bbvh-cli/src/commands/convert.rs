use anyhow::{bail, Context, Result};
use bbvh_core::encoder::{convert_with_layout, ContainerLayout};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tracing::info;

/// JSON report written by `--summary`
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversionSummary {
    pub input: String,
    pub output: String,
    pub joint_count: usize,
    pub channel_count: usize,
    pub frame_count: u32,
    pub frame_time: f64,
    pub sample_count: usize,
    pub bytes_written: usize,
    pub layout: ContainerLayout,
}

pub fn execute(
    input: &str,
    output: &str,
    mode: u8,
    end_marker: bool,
    summary: Option<&str>,
) -> Result<()> {
    info!("Converting {} to {} (mode {})", input, output, mode);

    if output.is_empty() {
        bail!("Please specify a BBVH output path");
    }

    // Read input file or stdin
    let mut reader: Box<dyn Read> = if input == "-" {
        Box::new(io::stdin())
    } else {
        if !Path::new(input).exists() {
            bail!("BVH file not found: {}", input);
        }
        Box::new(
            File::open(input)
                .with_context(|| format!("Failed to open input file: {}", input))?,
        )
    };

    let (doc, layout) = convert_with_layout(&mut reader, output, mode, end_marker)
        .with_context(|| format!("Failed to convert {} into {}", input, output))?;

    println!("\n=== Conversion Results ===");
    println!("Joints:            {}", doc.joint_count);
    println!("Channels:          {}", doc.total_channel_count);
    println!("Frames:            {}", doc.frame_count);
    println!("Frame time:        {}s", doc.frame_time);
    println!("Hierarchy chunk:   @{}", layout.hierarchy_pointer);
    println!("Motion chunk:      @{}", layout.motion_pointer);
    println!("Relocation chunk:  @{}", layout.relocation_pointer);
    println!("Container size:    {} bytes", layout.container_size);
    println!();

    if let Some(summary_path) = summary {
        let report = ConversionSummary {
            input: input.to_string(),
            output: output.to_string(),
            joint_count: doc.joint_count,
            channel_count: doc.total_channel_count,
            frame_count: doc.frame_count,
            frame_time: doc.frame_time,
            sample_count: doc.samples.len(),
            bytes_written: layout.total_len(),
            layout,
        };

        let json = serde_json::to_string_pretty(&report)
            .with_context(|| "Failed to serialize conversion summary")?;

        fs::write(summary_path, json)
            .with_context(|| format!("Failed to write summary file: {}", summary_path))?;

        info!("Summary written to: {}", summary_path);
    }

    println!("{} Conversion complete: {}", "✓".green(), output);

    Ok(())
}
